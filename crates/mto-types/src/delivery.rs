//! Delivery types for order shipment tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipment record for a sales order that reached ready-for-delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
	/// Unique identifier for this delivery.
	pub id: u64,
	/// Identifier of the owning sales order (back-reference, not ownership).
	pub order_id: u64,
	/// Current status in the delivery lifecycle.
	pub status: DeliveryStatus,
	/// Scheduled or actual delivery time. Stamped on completion if unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivered_at: Option<DateTime<Utc>>,
}

/// Status of a delivery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
	/// Delivery created, shipment not completed.
	Pending,
	/// Shipment completed; the owning order advances to delivered.
	Delivered,
	/// Delivery was cancelled.
	Cancelled,
}

impl fmt::Display for DeliveryStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeliveryStatus::Pending => write!(f, "pending"),
			DeliveryStatus::Delivered => write!(f, "delivered"),
			DeliveryStatus::Cancelled => write!(f, "cancelled"),
		}
	}
}
