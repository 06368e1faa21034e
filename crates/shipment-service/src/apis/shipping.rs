//! Quote and contract endpoints.

use shipment_core::ShipmentCoordinator;
use shipment_types::{APIError, ContractCarrierRequest, ContractResponse, QuoteResponse};

use super::{to_api_error, validate_id};

/// Handles `GET /api/quotes/{order_id}`.
pub async fn get_quotes(
	order_id: &str,
	coordinator: &ShipmentCoordinator,
) -> Result<Vec<QuoteResponse>, APIError> {
	validate_id(order_id, "INVALID_ORDER_ID", "Order ID")?;

	let quotes = coordinator.get_quotes(order_id).await.map_err(to_api_error)?;
	Ok(quotes.iter().map(QuoteResponse::from).collect())
}

/// Handles `POST /api/contracts`.
pub async fn contract_carrier(
	request: ContractCarrierRequest,
	coordinator: &ShipmentCoordinator,
) -> Result<ContractResponse, APIError> {
	validate_id(&request.order_id, "INVALID_ORDER_ID", "Order ID")?;
	validate_id(&request.carrier_id, "INVALID_CARRIER_ID", "Carrier ID")?;

	let contract = coordinator
		.contract_carrier(&request.order_id, &request.carrier_id)
		.await
		.map_err(to_api_error)?;
	Ok(ContractResponse::from(&contract))
}
