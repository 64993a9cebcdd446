//! Error taxonomy for workflow operations.
//!
//! Workflow operations fail fast: either the full validate-mutate-persist
//! sequence succeeds, or nothing is visible. Business failures (missing
//! entities, bad input, disallowed transitions) are distinct from opaque
//! infrastructure failures surfaced by the storage layer.

use mto_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during fulfillment workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
	/// A referenced entity does not exist.
	#[error("{entity} {id} not found")]
	NotFound { entity: &'static str, id: u64 },
	/// Malformed input to a creation operation.
	#[error("Validation error: {0}")]
	Validation(String),
	/// The requested status change is not permitted from the current state.
	#[error("Invalid status transition for {entity}: {from} -> {to}")]
	InvalidTransition {
		entity: &'static str,
		from: String,
		to: String,
	},
	/// Error during engine construction from configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// Opaque infrastructure failure in the storage layer.
	#[error("Storage error: {0}")]
	Storage(String),
}

impl WorkflowError {
	/// Maps a storage failure while loading one entity: NotFound becomes the
	/// business-level NotFound for that entity, everything else stays opaque.
	pub(crate) fn from_storage(err: StorageError, entity: &'static str, id: u64) -> Self {
		match err {
			StorageError::NotFound => WorkflowError::NotFound { entity, id },
			other => WorkflowError::Storage(other.to_string()),
		}
	}

	/// Maps a storage failure with no single entity in play.
	pub(crate) fn storage(err: StorageError) -> Self {
		WorkflowError::Storage(err.to_string())
	}

	/// Builds an InvalidTransition carrying current and attempted states.
	pub(crate) fn invalid_transition(
		entity: &'static str,
		from: impl ToString,
		to: impl ToString,
	) -> Self {
		WorkflowError::InvalidTransition {
			entity,
			from: from.to_string(),
			to: to.to_string(),
		}
	}
}
