//! Shipping handler for quoting and contracting carriers.
//!
//! Contracting writes twice: the contract first, then the conditional
//! `created -> awaiting_pickup` status change. When the second write fails the
//! contract is deleted again, so an order never ends up with a contract while
//! still open for another one.

use chrono::Utc;
use shipment_storage::{CarrierStore, ContractStore, OrderStore, StorageError};
use shipment_types::{truncate_id, Contract, OrderStatus, Quote};
use std::sync::Arc;
use tracing::instrument;

use crate::metrics::{Counter, Metrics};
use crate::policy::match_policy;
use crate::quote::{price_for, quote_all};
use crate::state::OrderStatusMachine;
use crate::ShipmentError;

/// Handler for quotes and carrier contracting.
pub struct ShippingHandler {
	orders: Arc<dyn OrderStore>,
	carriers: Arc<dyn CarrierStore>,
	contracts: Arc<dyn ContractStore>,
	metrics: Arc<dyn Metrics>,
}

impl ShippingHandler {
	pub fn new(
		orders: Arc<dyn OrderStore>,
		carriers: Arc<dyn CarrierStore>,
		contracts: Arc<dyn ContractStore>,
		metrics: Arc<dyn Metrics>,
	) -> Self {
		Self {
			orders,
			carriers,
			contracts,
			metrics,
		}
	}

	/// Quotes every carrier that serves the destination region of an order.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn get_quotes(&self, order_id: &str) -> Result<Vec<Quote>, ShipmentError> {
		let order = self
			.orders
			.get_by_id(order_id)
			.await
			.map_err(|e| not_found_as(e, || ShipmentError::OrderNotFound(order_id.to_string())))?;

		let region = order.destination.region;
		let carriers = self.carriers.list_by_region(region).await.map_err(|e| {
			tracing::error!(region = %region, error = %e, "Failed to list carriers");
			ShipmentError::from(e)
		})?;

		let quotes = quote_all(&order, &carriers);
		tracing::debug!(
			region = %region,
			carriers = carriers.len(),
			quotes = quotes.len(),
			"Quotes computed"
		);
		Ok(quotes)
	}

	/// Contracts `carrier_id` to ship `order_id`.
	///
	/// The order must still be `created`. On success the order is
	/// `awaiting_pickup` and the stored contract is returned.
	#[instrument(skip_all, fields(
		order_id = %truncate_id(order_id),
		carrier_id = %truncate_id(carrier_id)
	))]
	pub async fn contract_carrier(
		&self,
		order_id: &str,
		carrier_id: &str,
	) -> Result<Contract, ShipmentError> {
		let order = self
			.orders
			.get_by_id(order_id)
			.await
			.map_err(|e| not_found_as(e, || ShipmentError::OrderNotFound(order_id.to_string())))?;

		if order.status != OrderStatus::Created {
			return Err(ShipmentError::InvalidStatusTransition {
				from: order.status,
				to: OrderStatus::AwaitingPickup,
			});
		}

		let carrier = self.carriers.get_by_id(carrier_id).await.map_err(|e| {
			not_found_as(e, || ShipmentError::CarrierNotFound(carrier_id.to_string()))
		})?;

		let region = order.destination.region;
		let policy =
			match_policy(&carrier.policies, region).ok_or_else(|| ShipmentError::NoValidPolicy {
				carrier_id: carrier.id.clone(),
				region,
			})?;

		let price = price_for(policy, order.weight_kg)
			.ok_or_else(|| ShipmentError::InvalidInput("shipment price overflows".into()))?;
		let status = OrderStatusMachine::transition(order.status, OrderStatus::AwaitingPickup)?;

		let now = Utc::now();
		let mut contract = Contract {
			id: String::new(),
			order_id: order.id.clone(),
			carrier_id: carrier.id.clone(),
			price,
			estimated_days: policy.estimated_days,
			contracted_at: now,
			created_at: now,
			updated_at: now,
		};

		contract.id = self.contracts.insert(contract.clone()).await.map_err(|e| {
			tracing::error!(error = %e, "Failed to store contract");
			ShipmentError::from(e)
		})?;

		if let Err(e) = self
			.orders
			.update_status(&order.id, OrderStatus::Created, status)
			.await
		{
			return Err(self.compensate(&contract, e).await);
		}

		self.metrics.increment(Counter::ContractCreated);
		tracing::info!(
			contract_id = %truncate_id(&contract.id),
			price = %contract.price,
			estimated_days = contract.estimated_days,
			"Carrier contracted"
		);
		Ok(contract)
	}

	/// Deletes a contract whose order could not be advanced and maps the
	/// status update failure for the caller.
	async fn compensate(&self, contract: &Contract, error: StorageError) -> ShipmentError {
		if let Err(delete_error) = self.contracts.delete(&contract.id).await {
			tracing::error!(
				contract_id = %truncate_id(&contract.id),
				error = %error,
				delete_error = %delete_error,
				"Order status not advanced and contract could not be removed, needs reconciliation"
			);
		} else {
			tracing::error!(
				contract_id = %truncate_id(&contract.id),
				error = %error,
				"Order status not advanced, contract removed"
			);
		}

		match error {
			StorageError::Conflict(_) => ShipmentError::InvalidStatusTransition {
				from: OrderStatus::Created,
				to: OrderStatus::AwaitingPickup,
			},
			StorageError::NotFound => ShipmentError::OrderNotFound(contract.order_id.clone()),
			e => e.into(),
		}
	}
}

fn not_found_as(error: StorageError, not_found: impl FnOnce() -> ShipmentError) -> ShipmentError {
	match error {
		StorageError::NotFound => not_found(),
		e => e.into(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metrics::testing::record;
	use crate::metrics::CounterMetrics;
	use rust_decimal::Decimal;
	use shipment_storage::{MockCarrierStore, MockContractStore, MockOrderStore};
	use shipment_types::{states, Carrier, Order, Policy, Region};
	use std::str::FromStr;

	fn dec(value: &str) -> Decimal {
		Decimal::from_str(value).unwrap()
	}

	fn order(status: OrderStatus) -> Order {
		let now = Utc::now();
		Order {
			id: "order-1".into(),
			product: "Chair".into(),
			weight_kg: dec("5.00"),
			destination: *states::resolve("MG").unwrap(),
			status,
			created_at: now,
			updated_at: now,
		}
	}

	fn carrier(regions: &[(Region, &str, u32)]) -> Carrier {
		let now = Utc::now();
		Carrier {
			id: "carrier-1".into(),
			name: "Veloz".into(),
			policies: regions
				.iter()
				.map(|(region, price, days)| Policy {
					id: format!("policy-{}", region),
					carrier_id: "carrier-1".into(),
					region: *region,
					estimated_days: *days,
					price_per_kg: dec(price),
					created_at: now,
					updated_at: now,
				})
				.collect(),
			created_at: now,
			updated_at: now,
		}
	}

	struct Stores {
		orders: MockOrderStore,
		carriers: MockCarrierStore,
		contracts: MockContractStore,
	}

	impl Stores {
		fn new() -> Self {
			Self {
				orders: MockOrderStore::new(),
				carriers: MockCarrierStore::new(),
				contracts: MockContractStore::new(),
			}
		}

		fn handler(self) -> ShippingHandler {
			ShippingHandler::new(
				Arc::new(self.orders),
				Arc::new(self.carriers),
				Arc::new(self.contracts),
				Arc::new(CounterMetrics::new()),
			)
		}

		/// Expectations for a `created` order and a carrier serving its
		/// region, whose status update loses to a concurrent writer.
		fn losing_race(mut self) -> Self {
			self.orders
				.expect_get_by_id()
				.returning(|_| Ok(order(OrderStatus::Created)));
			self.carriers
				.expect_get_by_id()
				.returning(|_| Ok(carrier(&[(Region::Sudeste, "1.00", 1)])));
			self.contracts
				.expect_insert()
				.returning(|_| Ok("contract-1".to_string()));
			self.orders
				.expect_update_status()
				.returning(|_, _, _| Err(StorageError::Conflict("awaiting_pickup".into())));
			self
		}
	}

	#[test]
	fn test_contract_prices_with_first_matching_policy() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Ok(order(OrderStatus::Created)));
		stores.carriers.expect_get_by_id().returning(|_| {
			Ok(carrier(&[
				(Region::Sul, "1.00", 1),
				(Region::Sudeste, "10.00", 4),
				(Region::Sudeste, "2.00", 1),
			]))
		});
		stores
			.contracts
			.expect_insert()
			.withf(|contract| contract.price == Decimal::from_str("50").unwrap())
			.times(1)
			.returning(|_| Ok("contract-1".to_string()));
		stores
			.orders
			.expect_update_status()
			.withf(|id, expected, status| {
				id == "order-1"
					&& *expected == OrderStatus::Created
					&& *status == OrderStatus::AwaitingPickup
			})
			.times(1)
			.returning(|_, _, _| Ok(order(OrderStatus::AwaitingPickup)));
		let handler = stores.handler();

		let (contract, recorded) = record(handler.contract_carrier("order-1", "carrier-1"));
		let contract = contract.unwrap();
		assert_eq!(contract.id, "contract-1");
		assert_eq!(contract.price, dec("50.00"));
		assert_eq!(contract.estimated_days, 4);
		assert_eq!(contract.contracted_at, contract.created_at);
		assert_eq!(recorded.get(Counter::ContractCreated), 1);
	}

	#[test]
	fn test_contract_requires_created_order() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Ok(order(OrderStatus::Shipped)));
		stores.carriers.expect_get_by_id().never();
		stores.contracts.expect_insert().never();
		stores.orders.expect_update_status().never();
		let handler = stores.handler();

		let (result, recorded) = record(handler.contract_carrier("order-1", "carrier-1"));
		assert!(matches!(
			result,
			Err(ShipmentError::InvalidStatusTransition {
				from: OrderStatus::Shipped,
				..
			})
		));
		assert_eq!(recorded.get(Counter::ContractCreated), 0);
	}

	#[tokio::test]
	async fn test_contract_without_policy_persists_nothing() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Ok(order(OrderStatus::Created)));
		stores
			.carriers
			.expect_get_by_id()
			.returning(|_| Ok(carrier(&[(Region::Norte, "1.00", 1)])));
		stores.contracts.expect_insert().never();
		stores.orders.expect_update_status().never();
		let handler = stores.handler();

		let result = handler.contract_carrier("order-1", "carrier-1").await;
		assert!(matches!(
			result,
			Err(ShipmentError::NoValidPolicy {
				region: Region::Sudeste,
				..
			})
		));
	}

	#[tokio::test]
	async fn test_contract_unknown_carrier() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Ok(order(OrderStatus::Created)));
		stores
			.carriers
			.expect_get_by_id()
			.returning(|_| Err(StorageError::NotFound));
		let handler = stores.handler();

		let result = handler.contract_carrier("order-1", "nope").await;
		assert!(matches!(result, Err(ShipmentError::CarrierNotFound(id)) if id == "nope"));
	}

	#[tokio::test]
	async fn test_contract_insert_failure_leaves_order_untouched() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Ok(order(OrderStatus::Created)));
		stores
			.carriers
			.expect_get_by_id()
			.returning(|_| Ok(carrier(&[(Region::Sudeste, "1.00", 1)])));
		stores
			.contracts
			.expect_insert()
			.returning(|_| Err(StorageError::Backend("unavailable".into())));
		stores.orders.expect_update_status().never();
		let handler = stores.handler();

		let result = handler.contract_carrier("order-1", "carrier-1").await;
		assert!(matches!(result, Err(ShipmentError::Storage(_))));
	}

	#[test]
	fn test_lost_race_removes_contract() {
		let mut stores = Stores::new().losing_race();
		stores
			.contracts
			.expect_delete()
			.withf(|id| id == "contract-1")
			.times(1)
			.returning(|_| Ok(()));
		let handler = stores.handler();

		let (result, recorded) = record(handler.contract_carrier("order-1", "carrier-1"));
		assert!(matches!(
			result,
			Err(ShipmentError::InvalidStatusTransition { .. })
		));
		assert_eq!(recorded.get(Counter::ContractCreated), 0);
	}

	#[test]
	fn test_lost_race_with_failed_removal_still_reports_conflict() {
		let mut stores = Stores::new().losing_race();
		stores
			.contracts
			.expect_delete()
			.withf(|id| id == "contract-1")
			.times(1)
			.returning(|_| Err(StorageError::Backend("unavailable".into())));
		let handler = stores.handler();

		let (result, recorded) = record(handler.contract_carrier("order-1", "carrier-1"));
		// The removal failure is only logged, the caller still sees the lost race
		assert!(matches!(
			result,
			Err(ShipmentError::InvalidStatusTransition {
				from: OrderStatus::Created,
				to: OrderStatus::AwaitingPickup,
			})
		));
		assert_eq!(recorded.get(Counter::ContractCreated), 0);
	}

	#[tokio::test]
	async fn test_quotes_use_destination_region() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Ok(order(OrderStatus::Created)));
		stores
			.carriers
			.expect_list_by_region()
			.withf(|region| *region == Region::Sudeste)
			.times(1)
			.returning(|_| Ok(vec![carrier(&[(Region::Sudeste, "0.10", 8)])]));
		let handler = stores.handler();

		let quotes = handler.get_quotes("order-1").await.unwrap();
		assert_eq!(quotes.len(), 1);
		assert_eq!(quotes[0].price, dec("0.5"));
		assert_eq!(quotes[0].carrier_name, "Veloz");
	}

	#[tokio::test]
	async fn test_quotes_for_unknown_order() {
		let mut stores = Stores::new();
		stores
			.orders
			.expect_get_by_id()
			.returning(|_| Err(StorageError::NotFound));
		stores.carriers.expect_list_by_region().never();
		let handler = stores.handler();

		assert!(matches!(
			handler.get_quotes("missing").await,
			Err(ShipmentError::OrderNotFound(_))
		));
	}
}
