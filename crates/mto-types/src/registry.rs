//! Registry trait for self-registering implementations.
//!
//! Pluggable modules (currently storage backends) register themselves with
//! their configuration name and a factory function.

/// Base trait for implementation registries.
///
/// Each pluggable implementation provides a Registry struct that implements
/// this trait, declaring the name used to reference it in configuration
/// files and a factory to construct it.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "memory" for `storage.implementations.memory`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
