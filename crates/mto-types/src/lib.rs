//! Common types module for the MTO fulfillment system.
//!
//! This module defines the core data types and structures used throughout
//! the fulfillment backend. It provides a centralized location for shared
//! types to ensure consistency across all workspace crates.

/// Billing entity for generated invoices.
pub mod billing;
/// Customer and product catalog entities.
pub mod catalog;
/// Delivery entity and its status lifecycle.
pub mod delivery;
/// Sales order aggregate, order lines, and order status lifecycle.
pub mod order;
/// Production record entity and its status lifecycle.
pub mod production;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Storage namespace keys for persisted entity kinds.
pub mod storage;
/// Configuration validation types for backend TOML sections.
pub mod validation;
/// Composed read-side views assembled by the query layer.
pub mod views;

// Re-export all types for convenient access
pub use billing::*;
pub use catalog::*;
pub use delivery::*;
pub use order::*;
pub use production::*;
pub use registry::*;
pub use storage::*;
pub use validation::*;
pub use views::*;
