//! Customer and product catalog entities.
//!
//! These entities are read, never mutated, by the workflow engine. Price
//! changes happen through a separate catalog-management path and do not
//! affect subtotals already frozen on persisted orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer that can place orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
	/// Unique identifier for this customer.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Contact email address.
	pub email: String,
	/// Role or category (e.g., "student", "faculty", "department").
	pub role: String,
}

/// A product offered in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
	/// Unique identifier for this product.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Unit price, non-negative.
	pub price: Decimal,
	/// On-hand stock quantity, if tracked for this product.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stock_qty: Option<u32>,
	/// Optional catalog image location.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}
