//! HTTP server for the shipment coordinator API.
//!
//! All routes live under `/api`. Handlers only translate between HTTP and the
//! coordinator; validation of enumerated values happens in [`crate::apis`].

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::Json,
	routing::{get, post},
	Router,
};
use shipment_config::ApiConfig;
use shipment_core::ShipmentCoordinator;
use shipment_types::{
	APIError, CarrierResponse, ContractCarrierRequest, ContractResponse, CreateCarrierRequest,
	CreateOrderRequest, OrderResponse, QuoteResponse, UpdateOrderStatusRequest,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub coordinator: ShipmentCoordinator,
}

/// Builds the API router.
pub fn router(coordinator: ShipmentCoordinator, timeout: Duration) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", post(handle_create_order))
				.route(
					"/orders/{id}",
					get(handle_get_order).patch(handle_update_order_status),
				)
				.route("/carriers", post(handle_create_carrier))
				.route("/quotes/{order_id}", get(handle_get_quotes))
				.route("/contracts", post(handle_contract_carrier)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(timeout))
				.layer(CorsLayer::permissive()),
		)
		.with_state(AppState { coordinator })
}

/// Starts the HTTP server and serves until it fails.
pub async fn start_server(
	api_config: ApiConfig,
	coordinator: ShipmentCoordinator,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(coordinator, Duration::from_secs(api_config.timeout_seconds));

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Shipment API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Unwraps a JSON body, rendering malformed or mistyped bodies in the API
/// error shape instead of axum's plain-text rejection.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, APIError> {
	payload.map(|Json(body)| body).map_err(|rejection| {
		tracing::warn!("Request body rejected: {}", rejection.body_text());
		APIError::from(rejection)
	})
}

/// Handles POST /api/orders requests.
async fn handle_create_order(
	State(state): State<AppState>,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), APIError> {
	let request = json_body(payload)?;
	match crate::apis::order::create_order(request, &state.coordinator).await {
		Ok(response) => Ok((StatusCode::CREATED, Json(response))),
		Err(e) => {
			tracing::warn!("Order creation failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<OrderResponse>, APIError> {
	match crate::apis::order::get_order_by_id(&id, &state.coordinator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order retrieval failed: {}", e);
			Err(e)
		},
	}
}

/// Handles PATCH /api/orders/{id} requests.
async fn handle_update_order_status(
	Path(id): Path<String>,
	State(state): State<AppState>,
	payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, APIError> {
	let request = json_body(payload)?;
	match crate::apis::order::update_order_status(&id, request, &state.coordinator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order status update failed: {}", e);
			Err(e)
		},
	}
}

/// Handles POST /api/carriers requests.
async fn handle_create_carrier(
	State(state): State<AppState>,
	payload: Result<Json<CreateCarrierRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CarrierResponse>), APIError> {
	let request = json_body(payload)?;
	match crate::apis::carrier::create_carrier(request, &state.coordinator).await {
		Ok(response) => Ok((StatusCode::CREATED, Json(response))),
		Err(e) => {
			tracing::warn!("Carrier creation failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/quotes/{order_id} requests.
async fn handle_get_quotes(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Vec<QuoteResponse>>, APIError> {
	match crate::apis::shipping::get_quotes(&order_id, &state.coordinator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Quote request failed: {}", e);
			Err(e)
		},
	}
}

/// Handles POST /api/contracts requests.
async fn handle_contract_carrier(
	State(state): State<AppState>,
	payload: Result<Json<ContractCarrierRequest>, JsonRejection>,
) -> Result<Json<ContractResponse>, APIError> {
	let request = json_body(payload)?;
	match crate::apis::shipping::contract_carrier(request, &state.coordinator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Contracting failed: {}", e);
			Err(e)
		},
	}
}
