//! Carrier registration endpoint.

use shipment_core::ShipmentCoordinator;
use shipment_types::{
	APIError, CarrierResponse, CreateCarrierRequest, NewCarrier, NewPolicy, Region,
};

use super::to_api_error;

/// Handles `POST /api/carriers`.
pub async fn create_carrier(
	request: CreateCarrierRequest,
	coordinator: &ShipmentCoordinator,
) -> Result<CarrierResponse, APIError> {
	let policies = request
		.policies
		.into_iter()
		.map(|policy| {
			let region = Region::from_name(&policy.region).ok_or_else(|| {
				APIError::bad_request(
					"INVALID_REGION",
					format!("Unknown region: {}", policy.region),
				)
			})?;
			Ok(NewPolicy {
				region,
				estimated_days: policy.estimated_days,
				price_per_kg: policy.price_per_kg,
			})
		})
		.collect::<Result<Vec<_>, APIError>>()?;

	let carrier = coordinator
		.create_carrier(NewCarrier {
			name: request.name,
			policies,
		})
		.await
		.map_err(to_api_error)?;

	Ok(CarrierResponse::from(&carrier))
}
