//! Core workflow engine for the MTO fulfillment system.
//!
//! Coordinates the order lifecycle across its sub-workflows: order creation
//! and manual transitions, production, delivery, and billing. All status
//! changes funnel through one transition table, so no service can move an
//! order along a path the table does not allow.

pub mod billing;
pub mod delivery;
pub mod error;
pub mod orders;
pub mod production;
pub mod queries;
pub mod transitions;

pub use billing::BillingWorkflow;
pub use delivery::DeliveryWorkflow;
pub use error::WorkflowError;
pub use orders::OrderWorkflow;
pub use production::ProductionWorkflow;
pub use queries::OrderQueries;

use mto_config::Config;
use mto_storage::StorageService;
use std::sync::Arc;

/// The assembled fulfillment engine.
///
/// Owns one storage service and hands out the workflow services built over
/// it. All services share the same backend, so records written by one are
/// immediately visible to the others.
pub struct FulfillmentEngine {
	storage: Arc<StorageService>,
	orders: OrderWorkflow,
	production: ProductionWorkflow,
	deliveries: DeliveryWorkflow,
	billing: BillingWorkflow,
	queries: OrderQueries,
}

impl FulfillmentEngine {
	/// Assembles the engine over an already-constructed storage service.
	pub fn new(storage: Arc<StorageService>) -> Self {
		let orders = OrderWorkflow::new(storage.clone());
		Self {
			production: ProductionWorkflow::new(storage.clone(), orders.clone()),
			deliveries: DeliveryWorkflow::new(storage.clone(), orders.clone()),
			billing: BillingWorkflow::new(storage.clone(), orders.clone()),
			queries: OrderQueries::new(storage.clone()),
			orders,
			storage,
		}
	}

	/// Builds the engine from configuration.
	///
	/// Selects the storage backend named by `storage.primary`, validates its
	/// implementation config against the backend's schema, and assembles the
	/// workflow services over it.
	pub fn from_config(config: &Config) -> Result<Self, WorkflowError> {
		let primary = &config.storage.primary;
		let factory = mto_storage::get_all_implementations()
			.into_iter()
			.find(|(name, _)| name == primary)
			.map(|(_, factory)| factory)
			.ok_or_else(|| {
				WorkflowError::Configuration(format!("Unknown storage backend: {}", primary))
			})?;

		let backend_config = config
			.storage
			.implementations
			.get(primary)
			.cloned()
			.unwrap_or(toml::Value::Table(Default::default()));

		let backend = factory(&backend_config)
			.map_err(|e| WorkflowError::Configuration(e.to_string()))?;
		backend
			.config_schema()
			.validate(&backend_config)
			.map_err(|e| WorkflowError::Configuration(e.to_string()))?;

		tracing::info!(service_id = %config.service.id, backend = %primary, "fulfillment engine ready");
		Ok(Self::new(Arc::new(StorageService::new(backend))))
	}

	/// The shared storage service.
	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}

	/// The order workflow service.
	pub fn orders(&self) -> &OrderWorkflow {
		&self.orders
	}

	/// The production workflow service.
	pub fn production(&self) -> &ProductionWorkflow {
		&self.production
	}

	/// The delivery workflow service.
	pub fn deliveries(&self) -> &DeliveryWorkflow {
		&self.deliveries
	}

	/// The billing workflow service.
	pub fn billing(&self) -> &BillingWorkflow {
		&self.billing
	}

	/// The read-side query service.
	pub fn queries(&self) -> &OrderQueries {
		&self.queries
	}
}

#[cfg(test)]
pub(crate) mod testutil {
	//! Shared fixtures for workflow tests: an in-memory storage service and
	//! seeded catalog entities.

	use mto_storage::{implementations::memory::MemoryStorage, StorageService};
	use mto_types::{Customer, OrderLineInput, Product, StorageKey};
	use rust_decimal::Decimal;
	use std::sync::Arc;

	pub fn service() -> Arc<StorageService> {
		Arc::new(StorageService::new(Box::new(MemoryStorage::new())))
	}

	pub async fn seed_customer(storage: &StorageService) -> u64 {
		let id = storage
			.next_id(StorageKey::Customers.as_str())
			.await
			.unwrap();
		let customer = Customer {
			id,
			name: format!("Customer {}", id),
			email: format!("customer{}@example.com", id),
			role: "department".into(),
		};
		storage
			.store(StorageKey::Customers.as_str(), id, &customer)
			.await
			.unwrap();
		id
	}

	pub async fn seed_product(storage: &StorageService, price: Decimal) -> u64 {
		let id = storage
			.next_id(StorageKey::Products.as_str())
			.await
			.unwrap();
		let product = Product {
			id,
			name: format!("Product {}", id),
			description: "made to order".into(),
			price,
			stock_qty: None,
			image_url: None,
		};
		storage
			.store(StorageKey::Products.as_str(), id, &product)
			.await
			.unwrap();
		id
	}

	pub fn line(product_id: u64, quantity: u32) -> OrderLineInput {
		OrderLineInput {
			product_id,
			quantity,
		}
	}
}
