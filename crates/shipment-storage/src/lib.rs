//! Storage module for the shipment coordinator.
//!
//! This module provides abstractions for persistent storage of orders,
//! carriers and contracts. A byte-level [`StorageInterface`] is implemented by
//! pluggable backends (in-memory, file-based), [`StorageService`] layers typed
//! JSON access on top of it, and [`ShipmentRepository`] implements the domain
//! store traits consumed by the core.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shipment_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

pub mod repository;
pub mod stores;

pub use repository::ShipmentRepository;
pub use stores::{CarrierStore, ContractStore, OrderStore};

#[cfg(any(test, feature = "testing"))]
pub use stores::{MockCarrierStore, MockContractStore, MockOrderStore};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs when a conditional write finds unexpected data.
	#[error("Conflict: {0}")]
	Conflict(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// This trait must be implemented by any storage backend that wants to
/// integrate with the coordinator. It provides basic key-value operations.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level storage service that provides typed operations.
///
/// The StorageService wraps a low-level storage backend and stores values as
/// JSON under `namespace:id` keys.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: &str, id: &str) -> String {
		format!("{}:{}", namespace, id)
	}

	/// Stores a serializable value, creating or overwriting it.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&Self::key(namespace, id), bytes).await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Removes a value from storage.
	pub async fn remove(&self, namespace: &str, id: &str) -> Result<(), StorageError> {
		self.backend.delete(&Self::key(namespace, id)).await
	}

	/// Updates an existing value in storage.
	///
	/// Unlike [`StorageService::store`], this returns `NotFound` when the key
	/// does not exist yet.
	pub async fn update<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let key = Self::key(namespace, id);

		if !self.backend.exists(&key).await? {
			return Err(StorageError::NotFound);
		}

		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&key, bytes).await
	}

	/// Checks if a value exists in storage.
	pub async fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&Self::key(namespace, id)).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::memory::MemoryStorage;
	use serde::Deserialize;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Record {
		name: String,
		count: u32,
	}

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_typed_round_trip_is_namespaced() {
		let storage = service();
		let record = Record {
			name: "a".into(),
			count: 1,
		};

		storage.store("orders", "1", &record).await.unwrap();
		let loaded: Record = storage.retrieve("orders", "1").await.unwrap();
		assert_eq!(loaded, record);

		assert!(storage.exists("orders", "1").await.unwrap());
		assert!(!storage.exists("carriers", "1").await.unwrap());
	}

	#[tokio::test]
	async fn test_update_requires_existing_key() {
		let storage = service();
		let record = Record {
			name: "a".into(),
			count: 1,
		};

		let result = storage.update("orders", "missing", &record).await;
		assert!(matches!(result, Err(StorageError::NotFound)));

		storage.store("orders", "1", &record).await.unwrap();
		let updated = Record {
			name: "a".into(),
			count: 2,
		};
		storage.update("orders", "1", &updated).await.unwrap();
		let loaded: Record = storage.retrieve("orders", "1").await.unwrap();
		assert_eq!(loaded.count, 2);
	}

	#[tokio::test]
	async fn test_retrieve_wrong_shape_is_serialization_error() {
		let storage = service();
		storage.store("orders", "1", &"plain string").await.unwrap();

		let result: Result<Record, _> = storage.retrieve("orders", "1").await;
		assert!(matches!(result, Err(StorageError::Serialization(_))));
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<&str> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}
}
