//! Domain store traits consumed by the shipment core.
//!
//! Each trait covers one aggregate. Ids are generated by the store on insert.

use async_trait::async_trait;
use shipment_types::{Carrier, Contract, NewCarrier, Order, OrderStatus, Region};

use crate::StorageError;

/// Persistence of orders.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
	/// Persists a new order and returns its generated id.
	///
	/// The `id` field of the given order is ignored.
	async fn insert(&self, order: Order) -> Result<String, StorageError>;

	/// Loads an order, failing with `NotFound` when it does not exist.
	async fn get_by_id(&self, id: &str) -> Result<Order, StorageError>;

	/// Sets the status of an order only if its current status is `expected`.
	///
	/// Returns the updated order, `NotFound` for an unknown id and `Conflict`
	/// when the stored status differs from `expected`.
	async fn update_status(
		&self,
		id: &str,
		expected: OrderStatus,
		status: OrderStatus,
	) -> Result<Order, StorageError>;
}

/// Persistence of carriers and their policies.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CarrierStore: Send + Sync {
	/// Persists a carrier with its policies, assigning ids and timestamps.
	async fn insert(&self, carrier: NewCarrier) -> Result<Carrier, StorageError>;

	/// Loads a carrier, failing with `NotFound` when it does not exist.
	async fn get_by_id(&self, id: &str) -> Result<Carrier, StorageError>;

	/// Lists carriers with at least one policy in `region`, in insertion order.
	async fn list_by_region(&self, region: Region) -> Result<Vec<Carrier>, StorageError>;
}

/// Persistence of contracts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContractStore: Send + Sync {
	/// Persists a new contract and returns its generated id.
	async fn insert(&self, contract: Contract) -> Result<String, StorageError>;

	/// Removes a contract. Unknown ids are ignored.
	async fn delete(&self, id: &str) -> Result<(), StorageError>;
}
