//! Sales order types for the fulfillment system.
//!
//! This module defines the order aggregate with its embedded lines and the
//! order status lifecycle used throughout the workflow engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sales order together with the line items it exclusively owns.
///
/// Orders are created atomically with their lines by the workflow engine
/// and are mutated only through status transitions. The total amount is
/// frozen at creation time and always equals the sum of line subtotals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: u64,
	/// Identifier of the customer that placed the order.
	pub customer_id: u64,
	/// Line items owned by this order. Deleted with the order.
	pub lines: Vec<OrderLine>,
	/// Sum of line subtotals, frozen at creation time.
	pub total_amount: Decimal,
	/// Current status in the order lifecycle.
	pub status: OrderStatus,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
}

/// One product/quantity pairing within an order.
///
/// The subtotal is computed from the product's unit price at order-creation
/// time and never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
	/// Identifier of the ordered product.
	pub product_id: u64,
	/// Ordered quantity, always greater than zero.
	pub quantity: u32,
	/// Frozen subtotal: quantity x unit price at creation time.
	pub subtotal: Decimal,
}

/// Incoming payload describing one line of an order to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
	/// Identifier of the product to order.
	pub product_id: u64,
	/// Requested quantity, must be greater than zero.
	pub quantity: u32,
}

/// Status of a sales order in the fulfillment lifecycle.
///
/// The allowed transitions between these statuses are enforced by a single
/// transition table in the workflow engine. `Billed` and `Cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Order has been placed but production has not started.
	Created,
	/// A production record exists and manufacturing is underway.
	InProduction,
	/// Production completed; the order awaits shipment.
	ReadyForDelivery,
	/// The delivery has been completed.
	Delivered,
	/// An invoice has been generated. Terminal.
	Billed,
	/// The order was cancelled. Terminal.
	Cancelled,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Created => write!(f, "created"),
			OrderStatus::InProduction => write!(f, "in_production"),
			OrderStatus::ReadyForDelivery => write!(f, "ready_for_delivery"),
			OrderStatus::Delivered => write!(f, "delivered"),
			OrderStatus::Billed => write!(f, "billed"),
			OrderStatus::Cancelled => write!(f, "cancelled"),
		}
	}
}
