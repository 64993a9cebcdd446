//! Order composition service: read-side assembly of order aggregates.
//!
//! Pure queries with no persistence side effects, safe to call concurrently
//! at any point in the lifecycle. Missing customer or product records
//! degrade to absent names rather than failing the whole view.

use crate::{billing::find_billing, WorkflowError};
use mto_storage::{StorageError, StorageService};
use mto_types::{
	Customer, DashboardSummary, Delivery, Order, OrderDetail, OrderLineView, OrderStatus,
	OrderSummary, Product, ProductionRecord, ProductionStatus, StorageKey, TopProduct,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Number of entries shown in dashboard rankings and recent-order lists.
const DASHBOARD_LIMIT: usize = 5;

/// Assembles composed read views over the entity store.
#[derive(Clone)]
pub struct OrderQueries {
	storage: Arc<StorageService>,
}

impl OrderQueries {
	/// Creates a new query service over the given entity store.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Returns the composed view of an order and all its dependent records.
	pub async fn get_order_detail(&self, order_id: u64) -> Result<OrderDetail, WorkflowError> {
		let order: Order = self
			.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| WorkflowError::from_storage(e, "order", order_id))?;

		let mut lines = Vec::with_capacity(order.lines.len());
		for line in &order.lines {
			lines.push(OrderLineView {
				product_id: line.product_id,
				product_name: self.product_name(line.product_id).await?,
				quantity: line.quantity,
				subtotal: line.subtotal,
			});
		}

		let mut production_records: Vec<ProductionRecord> = self
			.storage
			.retrieve_all(StorageKey::Production.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		production_records.retain(|r| r.order_id == order_id);
		production_records.sort_by_key(|r| r.id);

		let mut deliveries: Vec<Delivery> = self
			.storage
			.retrieve_all(StorageKey::Deliveries.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		deliveries.retain(|d| d.order_id == order_id);
		deliveries.sort_by_key(|d| d.id);

		let billing = find_billing(&self.storage, order_id).await?;
		let summary = self.summarize(&order).await?;

		Ok(OrderDetail {
			summary,
			lines,
			production_records,
			deliveries,
			billing,
		})
	}

	/// Returns order summaries matching zero, one, or both filters.
	///
	/// An empty result is a valid non-error return.
	pub async fn list_orders(
		&self,
		status: Option<OrderStatus>,
		customer_id: Option<u64>,
	) -> Result<Vec<OrderSummary>, WorkflowError> {
		let mut orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(WorkflowError::storage)?;

		if let Some(status) = status {
			orders.retain(|o| o.status == status);
		}
		if let Some(customer_id) = customer_id {
			orders.retain(|o| o.customer_id == customer_id);
		}
		orders.sort_by_key(|o| o.id);

		let mut summaries = Vec::with_capacity(orders.len());
		for order in &orders {
			summaries.push(self.summarize(order).await?);
		}
		Ok(summaries)
	}

	/// Returns aggregated counters and highlights for admin dashboards.
	pub async fn dashboard_summary(&self) -> Result<DashboardSummary, WorkflowError> {
		let orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(WorkflowError::storage)?;
		let production: Vec<ProductionRecord> = self
			.storage
			.retrieve_all(StorageKey::Production.as_str())
			.await
			.map_err(WorkflowError::storage)?;

		let in_production = production
			.iter()
			.filter(|r| r.status == ProductionStatus::InProgress)
			.count();
		let ready_for_delivery = orders
			.iter()
			.filter(|o| o.status == OrderStatus::ReadyForDelivery)
			.count();
		let billed = orders
			.iter()
			.filter(|o| o.status == OrderStatus::Billed)
			.count();

		// Rank products by total ordered quantity across all orders.
		let mut ordered_by_product: HashMap<u64, u64> = HashMap::new();
		for order in &orders {
			for line in &order.lines {
				*ordered_by_product.entry(line.product_id).or_insert(0) += u64::from(line.quantity);
			}
		}
		let mut ranked: Vec<(u64, u64)> = ordered_by_product.into_iter().collect();
		ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
		ranked.truncate(DASHBOARD_LIMIT);

		let mut top_products = Vec::with_capacity(ranked.len());
		for (product_id, ordered_qty) in ranked {
			top_products.push(TopProduct {
				product_id,
				name: self.product_name(product_id).await?,
				ordered_qty,
			});
		}

		let mut recent: Vec<&Order> = orders.iter().collect();
		recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
		recent.truncate(DASHBOARD_LIMIT);
		let mut recent_orders = Vec::with_capacity(recent.len());
		for order in recent {
			recent_orders.push(self.summarize(order).await?);
		}

		Ok(DashboardSummary {
			total_orders: orders.len(),
			in_production,
			ready_for_delivery,
			billed,
			top_products,
			recent_orders,
		})
	}

	/// Builds the summary header for one order, resolving the customer name.
	async fn summarize(&self, order: &Order) -> Result<OrderSummary, WorkflowError> {
		Ok(OrderSummary {
			id: order.id,
			customer_id: order.customer_id,
			customer_name: self.customer_name(order.customer_id).await?,
			status: order.status,
			total_amount: order.total_amount,
			created_at: order.created_at,
		})
	}

	/// Resolves a customer name, tolerating a missing record.
	async fn customer_name(&self, customer_id: u64) -> Result<Option<String>, WorkflowError> {
		match self
			.storage
			.retrieve::<Customer>(StorageKey::Customers.as_str(), customer_id)
			.await
		{
			Ok(customer) => Ok(Some(customer.name)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(WorkflowError::storage(e)),
		}
	}

	/// Resolves a product name, tolerating a missing record.
	async fn product_name(&self, product_id: u64) -> Result<Option<String>, WorkflowError> {
		match self
			.storage
			.retrieve::<Product>(StorageKey::Products.as_str(), product_id)
			.await
		{
			Ok(product) => Ok(Some(product.name)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(WorkflowError::storage(e)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::{line, seed_customer, seed_product, service};
	use crate::{BillingWorkflow, DeliveryWorkflow, OrderWorkflow, ProductionWorkflow};
	use rust_decimal::Decimal;

	struct Fixture {
		orders: OrderWorkflow,
		production: ProductionWorkflow,
		deliveries: DeliveryWorkflow,
		billing: BillingWorkflow,
		queries: OrderQueries,
	}

	fn fixture(storage: Arc<StorageService>) -> Fixture {
		let orders = OrderWorkflow::new(storage.clone());
		Fixture {
			production: ProductionWorkflow::new(storage.clone(), orders.clone()),
			deliveries: DeliveryWorkflow::new(storage.clone(), orders.clone()),
			billing: BillingWorkflow::new(storage.clone(), orders.clone()),
			queries: OrderQueries::new(storage),
			orders,
		}
	}

	#[tokio::test]
	async fn detail_composes_all_related_records() {
		let storage = service();
		let customer = seed_customer(&storage).await;
		let product = seed_product(&storage, Decimal::new(15000, 2)).await;
		let f = fixture(storage);

		let order = f
			.orders
			.create_order(customer, &[line(product, 2)])
			.await
			.unwrap();
		let record = f.production.start_production(order.id).await.unwrap();
		f.production.mark_in_progress(record.id).await.unwrap();
		f.production.mark_complete(record.id).await.unwrap();
		let delivery = f.deliveries.create_delivery(order.id, None).await.unwrap();
		f.deliveries.mark_delivered(delivery.id).await.unwrap();
		let invoice = f.billing.generate_invoice(order.id).await.unwrap();

		let detail = f.queries.get_order_detail(order.id).await.unwrap();
		assert_eq!(detail.summary.status, OrderStatus::Billed);
		assert!(detail.summary.customer_name.is_some());
		assert_eq!(detail.lines.len(), 1);
		assert!(detail.lines[0].product_name.is_some());
		assert_eq!(detail.production_records.len(), 1);
		assert_eq!(detail.deliveries.len(), 1);
		assert_eq!(
			detail.billing.as_ref().map(|b| b.invoice_number.clone()),
			Some(invoice.invoice_number)
		);
	}

	#[tokio::test]
	async fn detail_before_any_workflow_has_empty_sections() {
		let storage = service();
		let customer = seed_customer(&storage).await;
		let product = seed_product(&storage, Decimal::ONE).await;
		let f = fixture(storage);

		let order = f
			.orders
			.create_order(customer, &[line(product, 1)])
			.await
			.unwrap();

		let detail = f.queries.get_order_detail(order.id).await.unwrap();
		assert!(detail.production_records.is_empty());
		assert!(detail.deliveries.is_empty());
		assert!(detail.billing.is_none());
	}

	#[tokio::test]
	async fn detail_of_missing_order_fails() {
		let f = fixture(service());

		assert!(matches!(
			f.queries.get_order_detail(404).await,
			Err(WorkflowError::NotFound { entity: "order", .. })
		));
	}

	#[tokio::test]
	async fn list_orders_applies_both_filters() {
		let storage = service();
		let alice = seed_customer(&storage).await;
		let bob = seed_customer(&storage).await;
		let product = seed_product(&storage, Decimal::ONE).await;
		let f = fixture(storage);

		let first = f
			.orders
			.create_order(alice, &[line(product, 1)])
			.await
			.unwrap();
		f.orders
			.create_order(bob, &[line(product, 1)])
			.await
			.unwrap();
		f.orders
			.transition_status(first.id, OrderStatus::Cancelled)
			.await
			.unwrap();

		let all = f.queries.list_orders(None, None).await.unwrap();
		assert_eq!(all.len(), 2);

		let cancelled = f
			.queries
			.list_orders(Some(OrderStatus::Cancelled), None)
			.await
			.unwrap();
		assert_eq!(cancelled.len(), 1);
		assert_eq!(cancelled[0].id, first.id);

		let bobs_cancelled = f
			.queries
			.list_orders(Some(OrderStatus::Cancelled), Some(bob))
			.await
			.unwrap();
		assert!(bobs_cancelled.is_empty());
	}

	#[tokio::test]
	async fn dashboard_counts_and_rankings() {
		let storage = service();
		let customer = seed_customer(&storage).await;
		let widget = seed_product(&storage, Decimal::ONE).await;
		let gadget = seed_product(&storage, Decimal::TWO).await;
		let f = fixture(storage);

		let big = f
			.orders
			.create_order(customer, &[line(widget, 5), line(gadget, 1)])
			.await
			.unwrap();
		f.orders
			.create_order(customer, &[line(gadget, 2)])
			.await
			.unwrap();
		let record = f.production.start_production(big.id).await.unwrap();
		f.production.mark_in_progress(record.id).await.unwrap();

		let summary = f.queries.dashboard_summary().await.unwrap();
		assert_eq!(summary.total_orders, 2);
		assert_eq!(summary.in_production, 1);
		assert_eq!(summary.ready_for_delivery, 0);
		assert_eq!(summary.billed, 0);
		assert_eq!(summary.top_products.len(), 2);
		assert_eq!(summary.top_products[0].product_id, widget);
		assert_eq!(summary.top_products[0].ordered_qty, 5);
		assert_eq!(summary.recent_orders.len(), 2);
	}
}
