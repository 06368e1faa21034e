//! API types for the shipment coordinator HTTP endpoints.
//!
//! Request bodies carry raw strings for enumerated values (destination code,
//! region, status) so the API layer can reject unknown values with a proper
//! error before anything reaches the core. Response bodies render decimal
//! amounts as two-digit strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{format_decimal, Carrier, Contract, Order, OrderStatus, Policy, Quote};

/// Request body for `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	/// Product description.
	pub product: String,
	/// Weight in kilograms, as a JSON number or decimal string.
	pub weight_kg: Decimal,
	/// Two-letter destination state code.
	pub destination_uf: String,
}

/// Order representation returned by the order endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
	pub id: String,
	pub product: String,
	pub weight_kg: String,
	pub destination_uf: String,
	pub status: OrderStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
	fn from(order: &Order) -> Self {
		Self {
			id: order.id.clone(),
			product: order.product.clone(),
			weight_kg: format_decimal(order.weight_kg),
			destination_uf: order.destination.code.to_string(),
			status: order.status,
			created_at: order.created_at,
			updated_at: order.updated_at,
		}
	}
}

/// Request body for `PATCH /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
	/// Requested status, e.g. "awaiting_pickup".
	pub status: String,
}

/// One policy in a carrier registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierPolicyRequest {
	/// Region name, e.g. "Nordeste".
	pub region: String,
	pub estimated_days: u32,
	pub price_per_kg: Decimal,
}

/// Request body for `POST /api/carriers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCarrierRequest {
	pub name: String,
	pub policies: Vec<CarrierPolicyRequest>,
}

/// Policy representation inside [`CarrierResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierPolicyResponse {
	pub region: String,
	pub estimated_days: u32,
	/// Price per kilogram as a decimal string.
	pub price_per_kg: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Policy> for CarrierPolicyResponse {
	fn from(policy: &Policy) -> Self {
		Self {
			region: policy.region.name().to_string(),
			estimated_days: policy.estimated_days,
			price_per_kg: format_decimal(policy.price_per_kg),
			created_at: policy.created_at,
			updated_at: policy.updated_at,
		}
	}
}

/// Carrier representation returned by `POST /api/carriers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierResponse {
	pub id: String,
	pub name: String,
	pub policies: Vec<CarrierPolicyResponse>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Carrier> for CarrierResponse {
	fn from(carrier: &Carrier) -> Self {
		Self {
			id: carrier.id.clone(),
			name: carrier.name.clone(),
			policies: carrier
				.policies
				.iter()
				.map(CarrierPolicyResponse::from)
				.collect(),
			created_at: carrier.created_at,
			updated_at: carrier.updated_at,
		}
	}
}

/// One entry of the `GET /api/quotes/{order_id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
	pub carrier_id: String,
	pub carrier_name: String,
	pub price: String,
	pub estimated_days: u32,
}

impl From<&Quote> for QuoteResponse {
	fn from(quote: &Quote) -> Self {
		Self {
			carrier_id: quote.carrier_id.clone(),
			carrier_name: quote.carrier_name.clone(),
			price: format_decimal(quote.price),
			estimated_days: quote.estimated_days,
		}
	}
}

/// Request body for `POST /api/contracts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractCarrierRequest {
	pub order_id: String,
	pub carrier_id: String,
}

/// Contract representation returned by `POST /api/contracts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractResponse {
	pub id: String,
	pub order_id: String,
	pub carrier_id: String,
	pub price: String,
	pub estimated_days: u32,
	pub contracted_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Contract> for ContractResponse {
	fn from(contract: &Contract) -> Self {
		Self {
			id: contract.id.clone(),
			order_id: contract.order_id.clone(),
			carrier_id: contract.carrier_id.clone(),
			price: format_decimal(contract.price),
			estimated_days: contract.estimated_days,
			contracted_at: contract.contracted_at,
			created_at: contract.created_at,
			updated_at: contract.updated_at,
		}
	}
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Additional error context
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Bad request with validation errors (400)
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Requested resource does not exist (404)
	NotFound { error_type: String, message: String },
	/// Resource changed concurrently (409)
	Conflict { error_type: String, message: String },
	/// Unprocessable entity for business logic failures (422)
	UnprocessableEntity {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Shorthand for a [`APIError::BadRequest`] without details.
	pub fn bad_request(error_type: &str, message: impl Into<String>) -> Self {
		APIError::BadRequest {
			error_type: error_type.to_string(),
			message: message.into(),
			details: None,
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::Conflict { .. } => 409,
			APIError::UnprocessableEntity { .. } => 422,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::BadRequest {
				error_type,
				message,
				details,
			}
			| APIError::UnprocessableEntity {
				error_type,
				message,
				details,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: details.clone(),
			},
			APIError::NotFound {
				error_type,
				message,
			}
			| APIError::Conflict {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
			APIError::UnprocessableEntity { message, .. } => {
				write!(f, "Unprocessable Entity: {}", message)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl From<axum::extract::rejection::JsonRejection> for APIError {
	fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
		APIError::bad_request("INVALID_REQUEST_BODY", rejection.body_text())
	}
}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::states;
	use std::str::FromStr;

	#[test]
	fn test_order_response_formats_weight() {
		let now = Utc::now();
		let order = Order {
			id: "o-1".into(),
			product: "Notebook".into(),
			weight_kg: Decimal::from_str("2.5").unwrap(),
			destination: *states::resolve("BA").unwrap(),
			status: OrderStatus::Created,
			created_at: now,
			updated_at: now,
		};

		let response = OrderResponse::from(&order);
		assert_eq!(response.weight_kg, "2.50");
		assert_eq!(response.destination_uf, "BA");

		let json = serde_json::to_value(&response).unwrap();
		assert_eq!(json["status"], "created");
	}

	#[test]
	fn test_create_order_accepts_number_or_string_weight() {
		let from_number: CreateOrderRequest = serde_json::from_str(
			r#"{"product":"Book","weight_kg":1.5,"destination_uf":"SP"}"#,
		)
		.unwrap();
		let from_string: CreateOrderRequest = serde_json::from_str(
			r#"{"product":"Book","weight_kg":"1.5","destination_uf":"SP"}"#,
		)
		.unwrap();
		assert_eq!(from_number.weight_kg, from_string.weight_kg);
	}

	#[test]
	fn test_api_error_status_codes() {
		let err = APIError::bad_request("INVALID_STATUS", "unknown status");
		assert_eq!(err.status_code(), 400);
		assert_eq!(err.to_error_response().error, "INVALID_STATUS");

		let err = APIError::Conflict {
			error_type: "CONCURRENT_UPDATE".into(),
			message: "retry".into(),
		};
		assert_eq!(err.status_code(), 409);
		assert!(err.to_string().starts_with("Conflict"));
	}
}
