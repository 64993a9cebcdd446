//! Order workflow: creation, manual status transitions, and deletion.
//!
//! This is the sole writer of `Order.status`. The sub-workflows (production,
//! delivery, billing) advance orders exclusively through
//! [`OrderWorkflow::transition_status`], so the transition table stays the
//! single enforcement point.

use crate::{transitions, WorkflowError};
use chrono::Utc;
use mto_storage::StorageService;
use mto_types::{Customer, Order, OrderLine, OrderLineInput, OrderStatus, Product, StorageKey};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Validates and applies order lifecycle operations.
#[derive(Clone)]
pub struct OrderWorkflow {
	storage: Arc<StorageService>,
}

impl OrderWorkflow {
	/// Creates a new workflow over the given entity store.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Creates a sales order together with its lines.
	///
	/// Subtotals are computed from the current unit price and frozen; the
	/// order total is their sum. Validation and product resolution happen
	/// before anything is written, so a failure persists no order.
	pub async fn create_order(
		&self,
		customer_id: u64,
		lines: &[OrderLineInput],
	) -> Result<Order, WorkflowError> {
		if lines.is_empty() {
			return Err(WorkflowError::Validation(
				"at least one line is required to create an order".into(),
			));
		}

		let _customer: Customer = self
			.storage
			.retrieve(StorageKey::Customers.as_str(), customer_id)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "customer", customer_id))?;

		let mut order_lines = Vec::with_capacity(lines.len());
		let mut total_amount = Decimal::ZERO;

		for line in lines {
			if line.quantity == 0 {
				return Err(WorkflowError::Validation(
					"line quantity must be greater than zero".into(),
				));
			}

			let product: Product = self
				.storage
				.retrieve(StorageKey::Products.as_str(), line.product_id)
				.await
				.map_err(|e| WorkflowError::from_storage(e, "product", line.product_id))?;

			let subtotal = product.price * Decimal::from(line.quantity);
			total_amount += subtotal;
			order_lines.push(OrderLine {
				product_id: product.id,
				quantity: line.quantity,
				subtotal,
			});
		}

		let id = self
			.storage
			.next_id(StorageKey::Orders.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		let order = Order {
			id,
			customer_id,
			lines: order_lines,
			total_amount,
			status: OrderStatus::Created,
			created_at: Utc::now(),
		};

		self.storage
			.store(StorageKey::Orders.as_str(), id, &order)
			.await
			.map_err(WorkflowError::storage)?;

		tracing::info!(order_id = id, lines = order.lines.len(), "created order");
		Ok(order)
	}

	/// Loads an order by id.
	pub async fn get_order(&self, order_id: u64) -> Result<Order, WorkflowError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "order", order_id))
	}

	/// Transitions an order to a new status if the table allows the change.
	///
	/// This is the manual/admin path (direct override or cancellation); it
	/// creates no dependent records. A rejected transition mutates nothing.
	pub async fn transition_status(
		&self,
		order_id: u64,
		target: OrderStatus,
	) -> Result<Order, WorkflowError> {
		let mut order = self.get_order(order_id).await?;

		if !transitions::is_allowed(order.status, target) {
			return Err(WorkflowError::invalid_transition(
				"order",
				order.status,
				target,
			));
		}

		let from = order.status;
		order.status = target;
		self.storage
			.update(StorageKey::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "order", order_id))?;

		tracing::info!(order_id, %from, to = %target, "order status changed");
		Ok(order)
	}

	/// Deletes an order and the lines it owns.
	///
	/// A correction path, not a status transition: the aggregate is removed
	/// outright, lines included.
	pub async fn delete_order(&self, order_id: u64) -> Result<(), WorkflowError> {
		// Ensure the order exists before deleting.
		let order = self.get_order(order_id).await?;

		self.storage
			.remove(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(WorkflowError::storage)?;

		tracing::info!(order_id, lines = order.lines.len(), "deleted order");
		Ok(())
	}
}
