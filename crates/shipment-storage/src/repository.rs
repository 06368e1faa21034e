//! Repository implementing the domain stores on top of [`StorageService`].
//!
//! Orders, carriers and contracts are stored as JSON documents under their
//! [`StorageKey`] namespace. Carriers are additionally indexed by region: the
//! `carriers_by_region:<Region>` document holds carrier ids in insertion
//! order, which is the order `list_by_region` returns them in.
//!
//! Read-modify-write sequences run under a single async mutex, so a
//! conditional status update can never interleave with another one.

use async_trait::async_trait;
use chrono::Utc;
use shipment_types::{
	truncate_id, Carrier, Contract, NewCarrier, Order, OrderStatus, Policy, Region, StorageKey,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{CarrierStore, ContractStore, OrderStore, StorageError, StorageService};

/// Store implementation shared by every aggregate.
pub struct ShipmentRepository {
	storage: Arc<StorageService>,
	write_lock: Mutex<()>,
}

impl ShipmentRepository {
	/// Creates a repository over the given storage service.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			write_lock: Mutex::new(()),
		}
	}

	fn new_id() -> String {
		Uuid::new_v4().to_string()
	}

	async fn region_index(&self, region: Region) -> Result<Vec<String>, StorageError> {
		match self
			.storage
			.retrieve(StorageKey::CarriersByRegion.as_str(), region.name())
			.await
		{
			Ok(ids) => Ok(ids),
			Err(StorageError::NotFound) => Ok(Vec::new()),
			Err(e) => Err(e),
		}
	}

	/// Stores `carrier` and appends it to the index of every region it serves.
	///
	/// Each index is pushed onto `touched` as it was before the append, so a
	/// failed insert can put it back. Must be called under `write_lock`.
	async fn index_carrier(
		&self,
		carrier: &Carrier,
		touched: &mut Vec<(Region, Vec<String>)>,
	) -> Result<(), StorageError> {
		self.storage
			.store(StorageKey::Carriers.as_str(), &carrier.id, carrier)
			.await?;

		for region in carrier.regions() {
			let previous = self.region_index(region).await?;
			let mut ids = previous.clone();
			ids.push(carrier.id.clone());
			self.storage
				.store(StorageKey::CarriersByRegion.as_str(), region.name(), &ids)
				.await?;
			touched.push((region, previous));
		}
		Ok(())
	}

	/// Undoes a partial [`Self::index_carrier`]. Failures here are logged only.
	async fn unindex_carrier(&self, carrier_id: &str, touched: Vec<(Region, Vec<String>)>) {
		for (region, previous) in touched.into_iter().rev() {
			if let Err(e) = self
				.storage
				.store(StorageKey::CarriersByRegion.as_str(), region.name(), &previous)
				.await
			{
				tracing::error!(
					carrier_id = %truncate_id(carrier_id),
					region = %region,
					error = %e,
					"Failed to restore region index, needs reconciliation"
				);
			}
		}

		if let Err(e) = self
			.storage
			.remove(StorageKey::Carriers.as_str(), carrier_id)
			.await
		{
			tracing::error!(
				carrier_id = %truncate_id(carrier_id),
				error = %e,
				"Failed to remove carrier document, needs reconciliation"
			);
		}
	}
}

#[async_trait]
impl OrderStore for ShipmentRepository {
	async fn insert(&self, mut order: Order) -> Result<String, StorageError> {
		order.id = Self::new_id();
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, &order)
			.await?;
		Ok(order.id)
	}

	async fn get_by_id(&self, id: &str) -> Result<Order, StorageError> {
		self.storage.retrieve(StorageKey::Orders.as_str(), id).await
	}

	async fn update_status(
		&self,
		id: &str,
		expected: OrderStatus,
		status: OrderStatus,
	) -> Result<Order, StorageError> {
		let _guard = self.write_lock.lock().await;

		let mut order: Order = self.storage.retrieve(StorageKey::Orders.as_str(), id).await?;
		if order.status != expected {
			return Err(StorageError::Conflict(format!(
				"order {} is {}, expected {}",
				truncate_id(id),
				order.status,
				expected
			)));
		}

		order.status = status;
		order.updated_at = Utc::now();
		self.storage
			.update(StorageKey::Orders.as_str(), id, &order)
			.await?;
		Ok(order)
	}
}

#[async_trait]
impl CarrierStore for ShipmentRepository {
	async fn insert(&self, carrier: NewCarrier) -> Result<Carrier, StorageError> {
		let now = Utc::now();
		let carrier_id = Self::new_id();
		let policies = carrier
			.policies
			.into_iter()
			.map(|policy| Policy {
				id: Self::new_id(),
				carrier_id: carrier_id.clone(),
				region: policy.region,
				estimated_days: policy.estimated_days,
				price_per_kg: policy.price_per_kg,
				created_at: now,
				updated_at: now,
			})
			.collect();
		let carrier = Carrier {
			id: carrier_id,
			name: carrier.name,
			policies,
			created_at: now,
			updated_at: now,
		};

		let _guard = self.write_lock.lock().await;

		let mut touched = Vec::new();
		if let Err(e) = self.index_carrier(&carrier, &mut touched).await {
			tracing::error!(
				carrier_id = %truncate_id(&carrier.id),
				error = %e,
				"Failed to store carrier, rolling back"
			);
			self.unindex_carrier(&carrier.id, touched).await;
			return Err(e);
		}

		Ok(carrier)
	}

	async fn get_by_id(&self, id: &str) -> Result<Carrier, StorageError> {
		self.storage.retrieve(StorageKey::Carriers.as_str(), id).await
	}

	async fn list_by_region(&self, region: Region) -> Result<Vec<Carrier>, StorageError> {
		let ids = self.region_index(region).await?;

		let mut carriers = Vec::with_capacity(ids.len());
		for id in ids {
			match self
				.storage
				.retrieve::<Carrier>(StorageKey::Carriers.as_str(), &id)
				.await
			{
				Ok(carrier) => carriers.push(carrier),
				Err(StorageError::NotFound) => {
					tracing::warn!(
						carrier_id = %truncate_id(&id),
						region = %region,
						"Region index references a missing carrier"
					);
				},
				Err(e) => return Err(e),
			}
		}
		Ok(carriers)
	}
}

#[async_trait]
impl ContractStore for ShipmentRepository {
	async fn insert(&self, mut contract: Contract) -> Result<String, StorageError> {
		contract.id = Self::new_id();
		self.storage
			.store(StorageKey::Contracts.as_str(), &contract.id, &contract)
			.await?;
		Ok(contract.id)
	}

	async fn delete(&self, id: &str) -> Result<(), StorageError> {
		self.storage.remove(StorageKey::Contracts.as_str(), id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::memory::MemoryStorage;
	use crate::StorageInterface;
	use rust_decimal::Decimal;
	use shipment_types::{states, ConfigSchema, NewPolicy};

	fn repository() -> ShipmentRepository {
		ShipmentRepository::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	fn order() -> Order {
		let now = Utc::now();
		Order {
			id: String::new(),
			product: "Notebook".into(),
			weight_kg: Decimal::new(2, 0),
			destination: *states::resolve("SP").unwrap(),
			status: OrderStatus::Created,
			created_at: now,
			updated_at: now,
		}
	}

	fn new_carrier(name: &str, regions: &[Region]) -> NewCarrier {
		NewCarrier {
			name: name.into(),
			policies: regions
				.iter()
				.map(|region| NewPolicy {
					region: *region,
					estimated_days: 3,
					price_per_kg: Decimal::new(500, 2),
				})
				.collect(),
		}
	}

	#[tokio::test]
	async fn test_order_insert_assigns_id() {
		let repo = repository();

		let id = OrderStore::insert(&repo, order()).await.unwrap();
		assert!(Uuid::parse_str(&id).is_ok());

		let loaded = OrderStore::get_by_id(&repo, &id).await.unwrap();
		assert_eq!(loaded.id, id);
		assert_eq!(loaded.destination.code, "SP");

		assert!(matches!(
			OrderStore::get_by_id(&repo, "missing").await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_update_status_is_conditional() {
		let repo = repository();
		let id = OrderStore::insert(&repo, order()).await.unwrap();

		let updated = repo
			.update_status(&id, OrderStatus::Created, OrderStatus::AwaitingPickup)
			.await
			.unwrap();
		assert_eq!(updated.status, OrderStatus::AwaitingPickup);
		assert!(updated.updated_at >= updated.created_at);

		// Second writer still expecting `created` loses
		let result = repo
			.update_status(&id, OrderStatus::Created, OrderStatus::AwaitingPickup)
			.await;
		assert!(matches!(result, Err(StorageError::Conflict(_))));

		let stored = OrderStore::get_by_id(&repo, &id).await.unwrap();
		assert_eq!(stored.status, OrderStatus::AwaitingPickup);

		assert!(matches!(
			repo.update_status("missing", OrderStatus::Created, OrderStatus::Shipped)
				.await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_concurrent_conditional_updates_have_one_winner() {
		let repo = Arc::new(repository());
		let id = OrderStore::insert(repo.as_ref(), order()).await.unwrap();

		let mut handles = Vec::new();
		for _ in 0..8 {
			let repo = repo.clone();
			let id = id.clone();
			handles.push(tokio::spawn(async move {
				repo.update_status(&id, OrderStatus::Created, OrderStatus::AwaitingPickup)
					.await
					.is_ok()
			}));
		}

		let mut winners = 0;
		for handle in handles {
			if handle.await.unwrap() {
				winners += 1;
			}
		}
		assert_eq!(winners, 1);
	}

	#[tokio::test]
	async fn test_carrier_insert_assigns_policy_ids() {
		let repo = repository();
		let carrier = CarrierStore::insert(
			&repo,
			new_carrier("Rapida", &[Region::Sudeste, Region::Sul]),
		)
		.await
		.unwrap();

		assert_eq!(carrier.policies.len(), 2);
		assert!(carrier.policies.iter().all(|p| p.carrier_id == carrier.id));
		assert_ne!(carrier.policies[0].id, carrier.policies[1].id);
		assert_eq!(carrier.policies[0].region, Region::Sudeste);

		let loaded = CarrierStore::get_by_id(&repo, &carrier.id).await.unwrap();
		assert_eq!(loaded, carrier);
	}

	#[tokio::test]
	async fn test_list_by_region_keeps_insertion_order() {
		let repo = repository();
		let first = CarrierStore::insert(&repo, new_carrier("A", &[Region::Sudeste]))
			.await
			.unwrap();
		let _other = CarrierStore::insert(&repo, new_carrier("B", &[Region::Norte]))
			.await
			.unwrap();
		// Two policies for the same region index the carrier once
		let third = CarrierStore::insert(
			&repo,
			new_carrier("C", &[Region::Sudeste, Region::Sudeste, Region::Norte]),
		)
		.await
		.unwrap();

		let names: Vec<String> = repo
			.list_by_region(Region::Sudeste)
			.await
			.unwrap()
			.into_iter()
			.map(|c| c.name)
			.collect();
		assert_eq!(names, vec![first.name, third.name]);

		assert_eq!(repo.list_by_region(Region::Norte).await.unwrap().len(), 2);
		assert!(repo.list_by_region(Region::Sul).await.unwrap().is_empty());
	}

	/// Memory backend that refuses every write to one key.
	struct RefusingWrites {
		inner: MemoryStorage,
		refused_key: &'static str,
	}

	#[async_trait]
	impl StorageInterface for RefusingWrites {
		async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
			self.inner.get_bytes(key).await
		}

		async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
			if key == self.refused_key {
				return Err(StorageError::Backend("write refused".into()));
			}
			self.inner.set_bytes(key, value).await
		}

		async fn delete(&self, key: &str) -> Result<(), StorageError> {
			self.inner.delete(key).await
		}

		async fn exists(&self, key: &str) -> Result<bool, StorageError> {
			self.inner.exists(key).await
		}

		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			self.inner.config_schema()
		}
	}

	#[tokio::test]
	async fn test_failed_carrier_insert_leaves_no_trace() {
		let repo = ShipmentRepository::new(Arc::new(StorageService::new(Box::new(
			RefusingWrites {
				inner: MemoryStorage::new(),
				refused_key: "carriers_by_region:Sul",
			},
		))));

		let existing = CarrierStore::insert(&repo, new_carrier("A", &[Region::Sudeste]))
			.await
			.unwrap();

		// Sudeste is indexed before the Sul write fails
		let result =
			CarrierStore::insert(&repo, new_carrier("B", &[Region::Sudeste, Region::Sul])).await;
		assert!(matches!(result, Err(StorageError::Backend(_))));

		let sudeste = repo.list_by_region(Region::Sudeste).await.unwrap();
		assert_eq!(sudeste, vec![existing]);
		assert!(repo.list_by_region(Region::Sul).await.unwrap().is_empty());

		let index: Vec<String> = repo
			.storage
			.retrieve(StorageKey::CarriersByRegion.as_str(), Region::Sudeste.name())
			.await
			.unwrap();
		assert_eq!(index.len(), 1);
	}

	#[tokio::test]
	async fn test_contract_insert_and_delete() {
		let repo = repository();
		let now = Utc::now();
		let contract = Contract {
			id: String::new(),
			order_id: "o".into(),
			carrier_id: "c".into(),
			price: Decimal::new(1400, 2),
			estimated_days: 5,
			contracted_at: now,
			created_at: now,
			updated_at: now,
		};

		let id = ContractStore::insert(&repo, contract).await.unwrap();
		assert!(repo
			.storage
			.exists(StorageKey::Contracts.as_str(), &id)
			.await
			.unwrap());

		ContractStore::delete(&repo, &id).await.unwrap();
		assert!(!repo
			.storage
			.exists(StorageKey::Contracts.as_str(), &id)
			.await
			.unwrap());
	}
}
