//! Order handler for creating orders and advancing their status.

use chrono::Utc;
use rust_decimal::Decimal;
use shipment_storage::{OrderStore, StorageError};
use shipment_types::{truncate_id, NewOrder, Order, OrderStatus};
use std::sync::Arc;
use tracing::instrument;

use crate::metrics::{Counter, Metrics};
use crate::state::OrderStatusMachine;
use crate::ShipmentError;

/// Handler for order creation, lookup and status changes.
pub struct OrderHandler {
	store: Arc<dyn OrderStore>,
	metrics: Arc<dyn Metrics>,
}

impl OrderHandler {
	pub fn new(store: Arc<dyn OrderStore>, metrics: Arc<dyn Metrics>) -> Self {
		Self { store, metrics }
	}

	/// Validates and persists a new order in `created` status.
	#[instrument(skip_all, fields(destination = %new_order.destination.code))]
	pub async fn create(&self, new_order: NewOrder) -> Result<Order, ShipmentError> {
		if new_order.product.trim().is_empty() {
			return Err(ShipmentError::InvalidInput(
				"product cannot be empty".into(),
			));
		}
		if new_order.weight_kg <= Decimal::ZERO {
			return Err(ShipmentError::InvalidInput(
				"weight_kg must be greater than zero".into(),
			));
		}

		let now = Utc::now();
		let mut order = Order {
			id: String::new(),
			product: new_order.product,
			weight_kg: new_order.weight_kg,
			destination: new_order.destination,
			status: OrderStatus::Created,
			created_at: now,
			updated_at: now,
		};

		order.id = self.store.insert(order.clone()).await.map_err(|e| {
			tracing::error!(error = %e, "Failed to store order");
			ShipmentError::from(e)
		})?;

		self.metrics.increment(Counter::OrderCreated);
		tracing::info!(order_id = %truncate_id(&order.id), "Order created");
		Ok(order)
	}

	/// Loads an order by id.
	pub async fn get(&self, order_id: &str) -> Result<Order, ShipmentError> {
		self.store
			.get_by_id(order_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => ShipmentError::OrderNotFound(order_id.to_string()),
				e => e.into(),
			})
	}

	/// Applies a status change after checking it against the status machine.
	///
	/// The write is conditional on the status read at the start, so a
	/// concurrent change surfaces as [`ShipmentError::ConcurrentUpdate`].
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id), status = %requested))]
	pub async fn update_status(
		&self,
		order_id: &str,
		requested: OrderStatus,
	) -> Result<Order, ShipmentError> {
		let order = self.get(order_id).await?;
		let status = OrderStatusMachine::transition(order.status, requested)?;

		let updated = self
			.store
			.update_status(order_id, order.status, status)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => ShipmentError::OrderNotFound(order_id.to_string()),
				StorageError::Conflict(_) => {
					tracing::warn!(error = %e, "Order changed during status update");
					ShipmentError::ConcurrentUpdate(order_id.to_string())
				},
				e => {
					tracing::error!(error = %e, "Failed to update order status");
					e.into()
				},
			})?;

		self.metrics.increment(Counter::OrderUpdated);
		tracing::info!(from = %order.status, to = %updated.status, "Order status updated");
		Ok(updated)
	}
}
