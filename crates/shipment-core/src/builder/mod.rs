//! Builder for constructing a [`ShipmentCoordinator`] from configuration.
//!
//! Storage backends are created through factory functions keyed by the
//! implementation name used in `[storage.implementations.<name>]`.

use shipment_config::Config;
use shipment_storage::{ShipmentRepository, StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::metrics::{CounterMetrics, Metrics};
use crate::ShipmentCoordinator;

/// Errors that can occur during coordinator construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Builder for a [`ShipmentCoordinator`] with a pluggable storage backend.
pub struct CoordinatorBuilder {
	config: Config,
	metrics: Option<Arc<dyn Metrics>>,
}

impl CoordinatorBuilder {
	/// Creates a new builder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			metrics: None,
		}
	}

	/// Uses `metrics` instead of a fresh [`CounterMetrics`].
	pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
		self.metrics = Some(metrics);
		self
	}

	/// Builds the coordinator, creating the primary storage backend from
	/// `storage_factories`.
	pub fn build<SF>(
		self,
		storage_factories: HashMap<String, SF>,
	) -> Result<ShipmentCoordinator, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let primary = &self.config.storage.primary;
		let backend_config = self.config.storage.implementations.get(primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' not found in implementations",
				primary
			))
		})?;
		let factory = storage_factories.get(primary).ok_or_else(|| {
			BuilderError::Config(format!("Unknown storage implementation '{}'", primary))
		})?;

		let backend = match factory(backend_config) {
			Ok(backend) => match backend.config_schema().validate(backend_config) {
				Ok(_) => {
					tracing::info!(component = "storage", implementation = %primary, "Loaded");
					backend
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %primary,
						error = %e,
						"Invalid configuration for storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Invalid configuration for storage implementation '{}': {}",
						primary, e
					)));
				},
			},
			Err(e) => {
				tracing::error!(
					component = "storage",
					implementation = %primary,
					error = %e,
					"Failed to create storage implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create storage implementation '{}': {}",
					primary, e
				)));
			},
		};

		let storage = Arc::new(StorageService::new(backend));
		let repository = Arc::new(ShipmentRepository::new(storage));
		let metrics = self
			.metrics
			.unwrap_or_else(|| Arc::new(CounterMetrics::new()) as Arc<dyn Metrics>);

		Ok(ShipmentCoordinator::new(
			repository.clone(),
			repository.clone(),
			repository,
			metrics,
		))
	}
}
