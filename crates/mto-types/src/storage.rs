//! Storage-related types for the fulfillment system.

use std::str::FromStr;

/// Storage namespaces for the persisted entity kinds.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace for customer records.
	Customers,
	/// Namespace for product records.
	Products,
	/// Namespace for sales order aggregates.
	Orders,
	/// Namespace for production records.
	Production,
	/// Namespace for delivery records.
	Deliveries,
	/// Namespace for billing records.
	Billings,
	/// Index mapping order ids to billing ids, enforcing one billing per order.
	BillingByOrder,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Customers => "customers",
			StorageKey::Products => "products",
			StorageKey::Orders => "orders",
			StorageKey::Production => "production",
			StorageKey::Deliveries => "deliveries",
			StorageKey::Billings => "billings",
			StorageKey::BillingByOrder => "billing_by_order",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Customers,
			Self::Products,
			Self::Orders,
			Self::Production,
			Self::Deliveries,
			Self::Billings,
			Self::BillingByOrder,
		]
		.into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"customers" => Ok(Self::Customers),
			"products" => Ok(Self::Products),
			"orders" => Ok(Self::Orders),
			"production" => Ok(Self::Production),
			"deliveries" => Ok(Self::Deliveries),
			"billings" => Ok(Self::Billings),
			"billing_by_order" => Ok(Self::BillingByOrder),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
