//! Core shipping-decision logic for the shipment coordinator.
//!
//! This crate ties the order status machine, the policy matcher and the quote
//! engine together behind [`ShipmentCoordinator`]. Persistence and metrics are
//! consumed through the store traits of `shipment-storage` and the
//! [`Metrics`] trait, so the coordinator never touches a backend directly.

use shipment_storage::{CarrierStore, ContractStore, OrderStore, StorageError};
use shipment_types::{
	Carrier, Contract, NewCarrier, NewOrder, Order, OrderStatus, Quote, Region,
};
use std::sync::Arc;
use thiserror::Error;

pub mod builder;
pub mod handlers;
pub mod metrics;
pub mod policy;
pub mod quote;
pub mod state;

pub use builder::{BuilderError, CoordinatorBuilder};
pub use handlers::{CarrierHandler, OrderHandler, ShippingHandler};
pub use metrics::{Counter, CounterMetrics, Metrics};
pub use state::{OrderStatusMachine, TransitionError};

/// Errors returned by coordinator operations.
#[derive(Debug, Error)]
pub enum ShipmentError {
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Carrier not found: {0}")]
	CarrierNotFound(String),
	#[error("Order status is already {0}")]
	StatusAlreadySet(OrderStatus),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
	#[error("Carrier {carrier_id} has no policy for region {region}")]
	NoValidPolicy { carrier_id: String, region: Region },
	/// The order status changed between reading it and writing the new one.
	#[error("Order {0} was updated concurrently")]
	ConcurrentUpdate(String),
	#[error("Invalid input: {0}")]
	InvalidInput(String),
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<TransitionError> for ShipmentError {
	fn from(err: TransitionError) -> Self {
		match err {
			TransitionError::AlreadySet(status) => ShipmentError::StatusAlreadySet(status),
			TransitionError::InvalidTransition { from, to } => {
				ShipmentError::InvalidStatusTransition { from, to }
			},
		}
	}
}

impl From<StorageError> for ShipmentError {
	fn from(err: StorageError) -> Self {
		ShipmentError::Storage(err.to_string())
	}
}

/// Entry point for every shipment operation.
///
/// Cheap to clone; all state lives behind the shared stores.
#[derive(Clone)]
pub struct ShipmentCoordinator {
	orders: Arc<OrderHandler>,
	carriers: Arc<CarrierHandler>,
	shipping: Arc<ShippingHandler>,
}

impl ShipmentCoordinator {
	/// Creates a coordinator over the given stores and metrics sink.
	pub fn new(
		order_store: Arc<dyn OrderStore>,
		carrier_store: Arc<dyn CarrierStore>,
		contract_store: Arc<dyn ContractStore>,
		metrics: Arc<dyn Metrics>,
	) -> Self {
		Self {
			orders: Arc::new(OrderHandler::new(order_store.clone(), metrics.clone())),
			carriers: Arc::new(CarrierHandler::new(carrier_store.clone(), metrics.clone())),
			shipping: Arc::new(ShippingHandler::new(
				order_store,
				carrier_store,
				contract_store,
				metrics,
			)),
		}
	}

	/// Registers a new order in `created` status.
	pub async fn create_order(&self, order: NewOrder) -> Result<Order, ShipmentError> {
		self.orders.create(order).await
	}

	/// Loads an order by id.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, ShipmentError> {
		self.orders.get(order_id).await
	}

	/// Moves an order to `status` if the status machine allows it.
	pub async fn update_order_status(
		&self,
		order_id: &str,
		status: OrderStatus,
	) -> Result<Order, ShipmentError> {
		self.orders.update_status(order_id, status).await
	}

	/// Registers a carrier together with its regional policies.
	pub async fn create_carrier(&self, carrier: NewCarrier) -> Result<Carrier, ShipmentError> {
		self.carriers.create(carrier).await
	}

	/// Quotes every carrier serving the destination region of an order.
	pub async fn get_quotes(&self, order_id: &str) -> Result<Vec<Quote>, ShipmentError> {
		self.shipping.get_quotes(order_id).await
	}

	/// Contracts a carrier for an order still in `created` status.
	pub async fn contract_carrier(
		&self,
		order_id: &str,
		carrier_id: &str,
	) -> Result<Contract, ShipmentError> {
		self.shipping.contract_carrier(order_id, carrier_id).await
	}
}
