//! Production record types.
//!
//! A production record tracks the manufacturing lifecycle for one order.
//! Business flow normally creates exactly one record per order, but the
//! model allows several over an order's lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manufacturing record tied to a single sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecord {
	/// Unique identifier for this production record.
	pub id: u64,
	/// Identifier of the owning sales order (back-reference, not ownership).
	pub order_id: u64,
	/// Current status in the production lifecycle.
	pub status: ProductionStatus,
	/// Timestamp when work started, set when the record moves to in-progress.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub started_at: Option<DateTime<Utc>>,
	/// Timestamp when work finished, set when the record completes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ended_at: Option<DateTime<Utc>>,
}

/// Status of a production record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
	/// Record created, work not started.
	Planned,
	/// Work is underway.
	InProgress,
	/// Work finished; the owning order advances to ready-for-delivery.
	Completed,
	/// Production was cancelled.
	Cancelled,
}

impl fmt::Display for ProductionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProductionStatus::Planned => write!(f, "planned"),
			ProductionStatus::InProgress => write!(f, "in_progress"),
			ProductionStatus::Completed => write!(f, "completed"),
			ProductionStatus::Cancelled => write!(f, "cancelled"),
		}
	}
}
