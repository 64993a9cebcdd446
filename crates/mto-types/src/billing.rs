//! Billing types for invoice generation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice record for a delivered sales order.
///
/// At most one non-void billing record exists per order; repeated
/// generation returns the existing record. The invoice number is a
/// cosmetic identifier, the record id is the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Billing {
	/// Unique identifier for this billing record.
	pub id: u64,
	/// Identifier of the billed sales order (unique per order).
	pub order_id: u64,
	/// Generated invoice number, `INV-{YYYY}-{rand4}` format.
	pub invoice_number: String,
	/// Invoiced amount, copied from the order's frozen total.
	pub amount: Decimal,
	/// Timestamp when the invoice was generated.
	pub billed_at: DateTime<Utc>,
}
