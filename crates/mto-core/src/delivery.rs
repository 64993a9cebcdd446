//! Delivery workflow: shipment lifecycle for a single order.

use crate::{OrderWorkflow, WorkflowError};
use chrono::{DateTime, Utc};
use mto_storage::StorageService;
use mto_types::{Delivery, DeliveryStatus, OrderStatus, StorageKey};
use std::sync::Arc;

/// Manages deliveries and their effect on the owning order.
#[derive(Clone)]
pub struct DeliveryWorkflow {
	storage: Arc<StorageService>,
	orders: OrderWorkflow,
}

impl DeliveryWorkflow {
	/// Creates a new workflow over the given entity store.
	pub fn new(storage: Arc<StorageService>, orders: OrderWorkflow) -> Self {
		Self { storage, orders }
	}

	/// Creates a pending delivery for an order that is ready for delivery.
	///
	/// The delivery date may be supplied up front (scheduled shipment) or
	/// left unset to be stamped on completion.
	pub async fn create_delivery(
		&self,
		order_id: u64,
		delivery_date: Option<DateTime<Utc>>,
	) -> Result<Delivery, WorkflowError> {
		let order = self.orders.get_order(order_id).await?;
		if order.status != OrderStatus::ReadyForDelivery {
			return Err(WorkflowError::invalid_transition(
				"order",
				order.status,
				OrderStatus::ReadyForDelivery,
			));
		}

		let id = self
			.storage
			.next_id(StorageKey::Deliveries.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		let delivery = Delivery {
			id,
			order_id,
			status: DeliveryStatus::Pending,
			delivered_at: delivery_date,
		};
		self.storage
			.store(StorageKey::Deliveries.as_str(), id, &delivery)
			.await
			.map_err(WorkflowError::storage)?;

		tracing::info!(delivery_id = id, order_id, "created delivery");
		Ok(delivery)
	}

	/// Marks the delivery as delivered and advances the owning order.
	///
	/// Stamps the delivery time with the current time only when no date was
	/// supplied at creation.
	pub async fn mark_delivered(&self, delivery_id: u64) -> Result<Delivery, WorkflowError> {
		let mut delivery = self.get_delivery(delivery_id).await?;
		if delivery.status != DeliveryStatus::Pending {
			return Err(WorkflowError::invalid_transition(
				"delivery",
				delivery.status,
				DeliveryStatus::Delivered,
			));
		}

		delivery.status = DeliveryStatus::Delivered;
		if delivery.delivered_at.is_none() {
			delivery.delivered_at = Some(Utc::now());
		}
		self.storage
			.update(StorageKey::Deliveries.as_str(), delivery_id, &delivery)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "delivery", delivery_id))?;

		self.orders
			.transition_status(delivery.order_id, OrderStatus::Delivered)
			.await?;

		tracing::info!(
			delivery_id,
			order_id = delivery.order_id,
			"delivery completed"
		);
		Ok(delivery)
	}

	/// Loads a delivery by id.
	pub async fn get_delivery(&self, delivery_id: u64) -> Result<Delivery, WorkflowError> {
		self.storage
			.retrieve(StorageKey::Deliveries.as_str(), delivery_id)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "delivery", delivery_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::{line, seed_customer, seed_product, service};
	use mto_types::Delivery;
	use rust_decimal::Decimal;

	async fn setup() -> (DeliveryWorkflow, OrderWorkflow, Arc<StorageService>, u64) {
		let storage = service();
		let customer = seed_customer(&storage).await;
		let product = seed_product(&storage, Decimal::ONE).await;
		let orders = OrderWorkflow::new(storage.clone());
		let order = orders
			.create_order(customer, &[line(product, 1)])
			.await
			.unwrap();
		let delivery = DeliveryWorkflow::new(storage.clone(), orders.clone());
		(delivery, orders, storage, order.id)
	}

	#[tokio::test]
	async fn create_delivery_requires_ready_order() {
		let (deliveries, orders, storage, order_id) = setup().await;

		// Order is still Created; no delivery row may appear.
		let result = deliveries.create_delivery(order_id, None).await;
		assert!(matches!(
			result,
			Err(WorkflowError::InvalidTransition { entity: "order", .. })
		));
		let rows: Vec<Delivery> = storage
			.retrieve_all(StorageKey::Deliveries.as_str())
			.await
			.unwrap();
		assert!(rows.is_empty());

		orders
			.transition_status(order_id, OrderStatus::InProduction)
			.await
			.unwrap();
		orders
			.transition_status(order_id, OrderStatus::ReadyForDelivery)
			.await
			.unwrap();

		let delivery = deliveries.create_delivery(order_id, None).await.unwrap();
		assert_eq!(delivery.status, DeliveryStatus::Pending);
		assert!(delivery.delivered_at.is_none());
	}

	#[tokio::test]
	async fn mark_delivered_stamps_time_and_advances_order() {
		let (deliveries, orders, _, order_id) = setup().await;
		orders
			.transition_status(order_id, OrderStatus::InProduction)
			.await
			.unwrap();
		orders
			.transition_status(order_id, OrderStatus::ReadyForDelivery)
			.await
			.unwrap();
		let delivery = deliveries.create_delivery(order_id, None).await.unwrap();

		let done = deliveries.mark_delivered(delivery.id).await.unwrap();
		assert_eq!(done.status, DeliveryStatus::Delivered);
		assert!(done.delivered_at.is_some());

		let order = orders.get_order(order_id).await.unwrap();
		assert_eq!(order.status, OrderStatus::Delivered);

		// Completing twice is rejected.
		assert!(matches!(
			deliveries.mark_delivered(delivery.id).await,
			Err(WorkflowError::InvalidTransition {
				entity: "delivery",
				..
			})
		));
	}

	#[tokio::test]
	async fn scheduled_date_is_not_overwritten_on_completion() {
		let (deliveries, orders, _, order_id) = setup().await;
		orders
			.transition_status(order_id, OrderStatus::InProduction)
			.await
			.unwrap();
		orders
			.transition_status(order_id, OrderStatus::ReadyForDelivery)
			.await
			.unwrap();

		let scheduled = "2026-09-01T08:00:00Z".parse::<DateTime<Utc>>().unwrap();
		let delivery = deliveries
			.create_delivery(order_id, Some(scheduled))
			.await
			.unwrap();

		let done = deliveries.mark_delivered(delivery.id).await.unwrap();
		assert_eq!(done.delivered_at, Some(scheduled));
	}

	#[tokio::test]
	async fn mark_delivered_for_missing_delivery_fails() {
		let (deliveries, _, _, _) = setup().await;

		assert!(matches!(
			deliveries.mark_delivered(404).await,
			Err(WorkflowError::NotFound {
				entity: "delivery",
				id: 404
			})
		));
	}
}
