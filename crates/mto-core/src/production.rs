//! Production workflow: manufacturing lifecycle for a single order.
//!
//! Creates and advances the production record tied to one order and gates
//! order advancement on production completion.

use crate::{OrderWorkflow, WorkflowError};
use chrono::Utc;
use mto_storage::StorageService;
use mto_types::{OrderStatus, ProductionRecord, ProductionStatus, StorageKey};
use std::sync::Arc;

/// Manages production records and their effect on the owning order.
#[derive(Clone)]
pub struct ProductionWorkflow {
	storage: Arc<StorageService>,
	orders: OrderWorkflow,
}

impl ProductionWorkflow {
	/// Creates a new workflow over the given entity store.
	pub fn new(storage: Arc<StorageService>, orders: OrderWorkflow) -> Self {
		Self { storage, orders }
	}

	/// Creates a production record for the order and moves it to in-production.
	///
	/// The order must still be in `Created`; the advancement itself goes
	/// through the order workflow's transition table.
	pub async fn start_production(&self, order_id: u64) -> Result<ProductionRecord, WorkflowError> {
		let order = self.orders.get_order(order_id).await?;
		if order.status != OrderStatus::Created {
			return Err(WorkflowError::invalid_transition(
				"order",
				order.status,
				OrderStatus::InProduction,
			));
		}

		let id = self
			.storage
			.next_id(StorageKey::Production.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		let record = ProductionRecord {
			id,
			order_id,
			status: ProductionStatus::Planned,
			started_at: None,
			ended_at: None,
		};
		self.storage
			.store(StorageKey::Production.as_str(), id, &record)
			.await
			.map_err(WorkflowError::storage)?;

		self.orders
			.transition_status(order_id, OrderStatus::InProduction)
			.await?;

		tracing::info!(production_id = id, order_id, "production started");
		Ok(record)
	}

	/// Sets the production record to in-progress and stamps the start time.
	pub async fn mark_in_progress(
		&self,
		production_id: u64,
	) -> Result<ProductionRecord, WorkflowError> {
		let mut record = self.get_record(production_id).await?;
		if record.status != ProductionStatus::Planned {
			return Err(WorkflowError::invalid_transition(
				"production",
				record.status,
				ProductionStatus::InProgress,
			));
		}

		record.status = ProductionStatus::InProgress;
		record.started_at = Some(Utc::now());
		self.storage
			.update(StorageKey::Production.as_str(), production_id, &record)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "production record", production_id))?;

		tracing::info!(production_id, "production in progress");
		Ok(record)
	}

	/// Finalizes production, stamps the end time, and advances the order.
	pub async fn mark_complete(
		&self,
		production_id: u64,
	) -> Result<ProductionRecord, WorkflowError> {
		let mut record = self.get_record(production_id).await?;
		if record.status != ProductionStatus::InProgress {
			return Err(WorkflowError::invalid_transition(
				"production",
				record.status,
				ProductionStatus::Completed,
			));
		}

		record.status = ProductionStatus::Completed;
		record.ended_at = Some(Utc::now());
		self.storage
			.update(StorageKey::Production.as_str(), production_id, &record)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "production record", production_id))?;

		self.orders
			.transition_status(record.order_id, OrderStatus::ReadyForDelivery)
			.await?;

		tracing::info!(
			production_id,
			order_id = record.order_id,
			"production completed; order ready for delivery"
		);
		Ok(record)
	}

	/// Loads a production record by id.
	pub async fn get_record(&self, production_id: u64) -> Result<ProductionRecord, WorkflowError> {
		self.storage
			.retrieve(StorageKey::Production.as_str(), production_id)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "production record", production_id))
	}

	/// Returns production records, optionally filtered by status, oldest first.
	pub async fn list_records(
		&self,
		status: Option<ProductionStatus>,
	) -> Result<Vec<ProductionRecord>, WorkflowError> {
		let mut records: Vec<ProductionRecord> = self
			.storage
			.retrieve_all(StorageKey::Production.as_str())
			.await
			.map_err(WorkflowError::storage)?;

		if let Some(status) = status {
			records.retain(|r| r.status == status);
		}
		records.sort_by_key(|r| r.id);
		Ok(records)
	}
}
