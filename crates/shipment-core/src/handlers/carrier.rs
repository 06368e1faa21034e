//! Carrier handler for registering carriers and their regional policies.

use rust_decimal::Decimal;
use shipment_storage::CarrierStore;
use shipment_types::{truncate_id, Carrier, NewCarrier};
use std::sync::Arc;
use tracing::instrument;

use crate::metrics::{Counter, Metrics};
use crate::ShipmentError;

/// Handler for carrier registration.
pub struct CarrierHandler {
	store: Arc<dyn CarrierStore>,
	metrics: Arc<dyn Metrics>,
}

impl CarrierHandler {
	pub fn new(store: Arc<dyn CarrierStore>, metrics: Arc<dyn Metrics>) -> Self {
		Self { store, metrics }
	}

	/// Validates and persists a carrier with its policies.
	#[instrument(skip_all, fields(policies = new_carrier.policies.len()))]
	pub async fn create(&self, new_carrier: NewCarrier) -> Result<Carrier, ShipmentError> {
		validate(&new_carrier)?;

		let carrier = self.store.insert(new_carrier).await.map_err(|e| {
			tracing::error!(error = %e, "Failed to store carrier");
			ShipmentError::from(e)
		})?;

		self.metrics.increment(Counter::CarrierCreated);
		tracing::info!(
			carrier_id = %truncate_id(&carrier.id),
			regions = ?carrier.regions(),
			"Carrier registered"
		);
		Ok(carrier)
	}
}

fn validate(carrier: &NewCarrier) -> Result<(), ShipmentError> {
	if carrier.name.trim().is_empty() {
		return Err(ShipmentError::InvalidInput("name cannot be empty".into()));
	}
	if carrier.policies.is_empty() {
		return Err(ShipmentError::InvalidInput(
			"at least one policy is required".into(),
		));
	}
	for (index, policy) in carrier.policies.iter().enumerate() {
		if policy.estimated_days == 0 {
			return Err(ShipmentError::InvalidInput(format!(
				"policies[{}].estimated_days must be greater than zero",
				index
			)));
		}
		if policy.price_per_kg < Decimal::ZERO {
			return Err(ShipmentError::InvalidInput(format!(
				"policies[{}].price_per_kg cannot be negative",
				index
			)));
		}
	}
	Ok(())
}
