//! Factory registry for pluggable implementations.
//!
//! Storage backends register themselves through
//! `shipment_storage::get_all_implementations`; the registry maps the names
//! used in `[storage.implementations.<name>]` to their factories.

use shipment_config::Config;
use shipment_core::{CoordinatorBuilder, ShipmentCoordinator};
use shipment_storage::StorageFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Registry of every available implementation factory.
pub struct FactoryRegistry {
	pub storage: HashMap<String, StorageFactory>,
}

impl FactoryRegistry {
	fn new() -> Self {
		Self {
			storage: HashMap::new(),
		}
	}

	fn register_storage(&mut self, name: impl Into<String>, factory: StorageFactory) {
		self.storage.insert(name.into(), factory);
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Get the global factory registry, initializing it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();
		for (name, factory) in shipment_storage::get_all_implementations() {
			tracing::debug!("Registering storage implementation: {}", name);
			registry.register_storage(name, factory);
		}
		registry
	})
}

/// Builds the coordinator for `config` from the registered factories.
///
/// Every configured storage implementation must be known, even when it is not
/// the primary one.
pub fn build_coordinator_from_config(
	config: Config,
) -> Result<ShipmentCoordinator, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let mut storage_factories = HashMap::new();
	for name in config.storage.implementations.keys() {
		let Some(factory) = registry.storage.get(name) else {
			let mut available: Vec<_> = registry.storage.keys().cloned().collect();
			available.sort();
			return Err(format!(
				"Unknown storage implementation '{}'. Available: [{}]",
				name,
				available.join(", ")
			)
			.into());
		};
		storage_factories.insert(name.clone(), *factory);
	}

	Ok(CoordinatorBuilder::new(config).build(storage_factories)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_registry_knows_storage_backends() {
		let registry = get_registry();
		assert!(registry.storage.contains_key("memory"));
		assert!(registry.storage.contains_key("file"));
	}

	#[test]
	fn test_unknown_storage_implementation() {
		let mut config = shipment_config::test_config();
		config
			.storage
			.implementations
			.insert("postgres".into(), toml::Value::Table(Default::default()));

		let err = build_coordinator_from_config(config).err().unwrap();
		assert!(err.to_string().contains("postgres"));
		assert!(err.to_string().contains("file, memory"));
	}

	#[test]
	fn test_builds_memory_coordinator() {
		assert!(build_coordinator_from_config(shipment_config::test_config()).is_ok());
	}
}
