//! Composed read-side views assembled by the query layer.
//!
//! These structures join an order with its related records into shapes
//! convenient for callers. They are produced by pure reads and never fed
//! back into persistence.

use crate::{Billing, Delivery, OrderStatus, ProductionRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order header without line-item detail, as returned by order listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
	/// Order identifier.
	pub id: u64,
	/// Identifier of the owning customer.
	pub customer_id: u64,
	/// Resolved customer name, if the customer record still exists.
	pub customer_name: Option<String>,
	/// Current order status.
	pub status: OrderStatus,
	/// Frozen order total.
	pub total_amount: Decimal,
	/// Order creation timestamp.
	pub created_at: DateTime<Utc>,
}

/// One order line joined with its product name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineView {
	/// Identifier of the ordered product.
	pub product_id: u64,
	/// Resolved product name, if the product record still exists.
	pub product_name: Option<String>,
	/// Ordered quantity.
	pub quantity: u32,
	/// Frozen line subtotal.
	pub subtotal: Decimal,
}

/// Full composed view of an order and all its dependent records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
	/// Order header.
	pub summary: OrderSummary,
	/// Line items joined with product names.
	pub lines: Vec<OrderLineView>,
	/// All production records for this order, oldest first.
	pub production_records: Vec<ProductionRecord>,
	/// All deliveries for this order, oldest first.
	pub deliveries: Vec<Delivery>,
	/// The billing record, if the order has been invoiced.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub billing: Option<Billing>,
}

/// Aggregated counters and highlights for admin dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
	/// Total number of orders ever created.
	pub total_orders: usize,
	/// Number of production records currently in progress.
	pub in_production: usize,
	/// Number of orders awaiting delivery.
	pub ready_for_delivery: usize,
	/// Number of billed orders.
	pub billed: usize,
	/// Up to five products ranked by total ordered quantity.
	pub top_products: Vec<TopProduct>,
	/// Up to five most recently created orders.
	pub recent_orders: Vec<OrderSummary>,
}

/// Product ranking entry for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
	/// Product identifier.
	pub product_id: u64,
	/// Resolved product name, if the product record still exists.
	pub name: Option<String>,
	/// Total quantity ordered across all orders.
	pub ordered_qty: u64,
}
