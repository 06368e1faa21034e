//! Order endpoints: creation, lookup and status updates.

use shipment_core::ShipmentCoordinator;
use shipment_types::{
	states, APIError, CreateOrderRequest, NewOrder, OrderResponse, OrderStatus,
	UpdateOrderStatusRequest,
};

use super::{to_api_error, validate_id};

/// Handles `POST /api/orders`.
pub async fn create_order(
	request: CreateOrderRequest,
	coordinator: &ShipmentCoordinator,
) -> Result<OrderResponse, APIError> {
	let destination = states::resolve(&request.destination_uf).ok_or_else(|| {
		APIError::bad_request(
			"INVALID_DESTINATION",
			format!("Unknown destination state: {}", request.destination_uf),
		)
	})?;

	let order = coordinator
		.create_order(NewOrder {
			product: request.product,
			weight_kg: request.weight_kg,
			destination: *destination,
		})
		.await
		.map_err(to_api_error)?;

	Ok(OrderResponse::from(&order))
}

/// Handles `GET /api/orders/{id}`.
pub async fn get_order_by_id(
	id: &str,
	coordinator: &ShipmentCoordinator,
) -> Result<OrderResponse, APIError> {
	validate_id(id, "INVALID_ORDER_ID", "Order ID")?;

	let order = coordinator.get_order(id).await.map_err(to_api_error)?;
	Ok(OrderResponse::from(&order))
}

/// Handles `PATCH /api/orders/{id}`.
pub async fn update_order_status(
	id: &str,
	request: UpdateOrderStatusRequest,
	coordinator: &ShipmentCoordinator,
) -> Result<OrderResponse, APIError> {
	validate_id(id, "INVALID_ORDER_ID", "Order ID")?;
	let status: OrderStatus = request
		.status
		.parse()
		.map_err(|e: shipment_types::ParseStatusError| {
			APIError::bad_request("INVALID_STATUS", e.to_string())
		})?;

	let order = coordinator
		.update_order_status(id, status)
		.await
		.map_err(to_api_error)?;
	Ok(OrderResponse::from(&order))
}
