//! Billing workflow: idempotent invoice generation for delivered orders.
//!
//! At most one billing record exists per order, enforced through the
//! billing-by-order index; repeated generation returns the existing record
//! unchanged.

use crate::{OrderWorkflow, WorkflowError};
use chrono::{DateTime, Datelike, Utc};
use mto_storage::{StorageError, StorageService};
use mto_types::{Billing, OrderStatus, StorageKey};
use rand::Rng;
use std::sync::Arc;

/// Generates invoices and tracks billing records.
#[derive(Clone)]
pub struct BillingWorkflow {
	storage: Arc<StorageService>,
	orders: OrderWorkflow,
}

impl BillingWorkflow {
	/// Creates a new workflow over the given entity store.
	pub fn new(storage: Arc<StorageService>, orders: OrderWorkflow) -> Self {
		Self { storage, orders }
	}

	/// Generates a billing record for a delivered order and marks it billed.
	///
	/// Idempotent: if a billing record already exists for the order it is
	/// returned unchanged, with no duplicate and no error.
	pub async fn generate_invoice(&self, order_id: u64) -> Result<Billing, WorkflowError> {
		let order = self.orders.get_order(order_id).await?;

		if let Some(existing) = find_billing(&self.storage, order_id).await? {
			return Ok(existing);
		}

		if order.status != OrderStatus::Delivered {
			return Err(WorkflowError::invalid_transition(
				"order",
				order.status,
				OrderStatus::Billed,
			));
		}

		let billed_at = Utc::now();
		let invoice_number = invoice_number(billed_at);
		let id = self
			.storage
			.next_id(StorageKey::Billings.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		let billing = Billing {
			id,
			order_id,
			invoice_number,
			amount: order.total_amount,
			billed_at,
		};

		self.storage
			.store(StorageKey::Billings.as_str(), id, &billing)
			.await
			.map_err(WorkflowError::storage)?;
		self.storage
			.store(StorageKey::BillingByOrder.as_str(), order_id, &id)
			.await
			.map_err(WorkflowError::storage)?;

		self.orders
			.transition_status(order_id, OrderStatus::Billed)
			.await?;

		tracing::info!(
			order_id,
			invoice = %billing.invoice_number,
			"generated invoice"
		);
		Ok(billing)
	}

	/// Returns the billing record for the order, if any.
	pub async fn billing_for_order(&self, order_id: u64) -> Result<Option<Billing>, WorkflowError> {
		find_billing(&self.storage, order_id).await
	}

	/// Loads a billing record by id.
	pub async fn get_billing(&self, billing_id: u64) -> Result<Billing, WorkflowError> {
		self.storage
			.retrieve(StorageKey::Billings.as_str(), billing_id)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "billing", billing_id))
	}

	/// Returns all billing records, oldest first.
	pub async fn list_billings(&self) -> Result<Vec<Billing>, WorkflowError> {
		let mut billings: Vec<Billing> = self
			.storage
			.retrieve_all(StorageKey::Billings.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		billings.sort_by_key(|b| b.id);
		Ok(billings)
	}
}

/// Looks up the billing record for an order through the billing-by-order index.
pub(crate) async fn find_billing(
	storage: &StorageService,
	order_id: u64,
) -> Result<Option<Billing>, WorkflowError> {
	let billing_id: u64 = match storage
		.retrieve(StorageKey::BillingByOrder.as_str(), order_id)
		.await
	{
		Ok(id) => id,
		Err(StorageError::NotFound) => return Ok(None),
		Err(e) => return Err(WorkflowError::storage(e)),
	};

	storage
		.retrieve(StorageKey::Billings.as_str(), billing_id)
		.await
		.map(Some)
		.map_err(|e| WorkflowError::from_storage(e, "billing", billing_id))
}

/// Returns an invoice number following the `INV-{YYYY}-{rand4}` format.
///
/// The 4-digit suffix is random and not re-checked for uniqueness; the
/// number is a cosmetic identifier, the billing row id is the key.
fn invoice_number(timestamp: DateTime<Utc>) -> String {
	let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
	format!("INV-{}-{:04}", timestamp.year(), suffix)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::{line, seed_customer, seed_product, service};
	use rust_decimal::Decimal;

	async fn delivered_order() -> (BillingWorkflow, OrderWorkflow, u64) {
		let storage = service();
		let customer = seed_customer(&storage).await;
		let product = seed_product(&storage, Decimal::new(15000, 2)).await;
		let orders = OrderWorkflow::new(storage.clone());
		let order = orders
			.create_order(customer, &[line(product, 2)])
			.await
			.unwrap();
		for status in [
			OrderStatus::InProduction,
			OrderStatus::ReadyForDelivery,
			OrderStatus::Delivered,
		] {
			orders.transition_status(order.id, status).await.unwrap();
		}
		let billing = BillingWorkflow::new(storage, orders.clone());
		(billing, orders, order.id)
	}

	#[tokio::test]
	async fn generates_invoice_from_frozen_total_and_bills_order() {
		let (billing, orders, order_id) = delivered_order().await;

		let invoice = billing.generate_invoice(order_id).await.unwrap();
		assert_eq!(invoice.amount, Decimal::new(30000, 2));
		assert_eq!(invoice.order_id, order_id);
		let year = Utc::now().year().to_string();
		assert!(invoice.invoice_number.starts_with(&format!("INV-{}-", year)));
		assert_eq!(invoice.invoice_number.len(), 4 + year.len() + 1 + 4);

		let order = orders.get_order(order_id).await.unwrap();
		assert_eq!(order.status, OrderStatus::Billed);
	}

	#[tokio::test]
	async fn generation_is_idempotent() {
		let (billing, _, order_id) = delivered_order().await;

		let first = billing.generate_invoice(order_id).await.unwrap();
		let second = billing.generate_invoice(order_id).await.unwrap();

		assert_eq!(first.id, second.id);
		assert_eq!(first.invoice_number, second.invoice_number);
		assert_eq!(first.amount, second.amount);

		// Exactly one billing row exists afterwards.
		assert_eq!(billing.list_billings().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn requires_delivered_order() {
		let storage = service();
		let customer = seed_customer(&storage).await;
		let product = seed_product(&storage, Decimal::ONE).await;
		let orders = OrderWorkflow::new(storage.clone());
		let order = orders
			.create_order(customer, &[line(product, 1)])
			.await
			.unwrap();
		let billing = BillingWorkflow::new(storage, orders);

		let result = billing.generate_invoice(order.id).await;
		match result {
			Err(WorkflowError::InvalidTransition { entity, from, to }) => {
				assert_eq!(entity, "order");
				assert_eq!(from, "created");
				assert_eq!(to, "billed");
			},
			other => panic!("expected InvalidTransition, got {:?}", other),
		}

		assert!(billing
			.billing_for_order(order.id)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn missing_order_is_reported() {
		let (billing, _, _) = delivered_order().await;

		assert!(matches!(
			billing.generate_invoice(999).await,
			Err(WorkflowError::NotFound { entity: "order", .. })
		));
	}
}
