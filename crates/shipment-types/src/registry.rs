//! Registry trait for self-registering implementations.
//!
//! Pluggable backends implement this trait to declare the name they are
//! referenced by in configuration together with their factory function.

/// Base trait for implementation registries.
///
/// Each implementation module provides a `Registry` struct implementing this
/// trait, for example the `memory` and `file` storage backends.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "memory" for `[storage.implementations.memory]`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
