//! HTTP endpoint implementations.
//!
//! Each module parses and validates its request at the boundary, calls the
//! coordinator and renders the response. Unknown state codes, regions and
//! status names never reach the core.

pub mod carrier;
pub mod order;
pub mod shipping;

use shipment_core::ShipmentError;
use shipment_types::APIError;
use uuid::Uuid;

/// Rejects ids that are not UUIDs.
pub(crate) fn validate_id(id: &str, error_type: &str, label: &str) -> Result<(), APIError> {
	Uuid::parse_str(id)
		.map(|_| ())
		.map_err(|_| APIError::bad_request(error_type, format!("{} must be a valid UUID: {}", label, id)))
}

/// Maps a coordinator error to its HTTP representation.
pub(crate) fn to_api_error(error: ShipmentError) -> APIError {
	match error {
		ShipmentError::OrderNotFound(_) => APIError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: error.to_string(),
		},
		ShipmentError::CarrierNotFound(_) => APIError::NotFound {
			error_type: "CARRIER_NOT_FOUND".to_string(),
			message: error.to_string(),
		},
		ShipmentError::StatusAlreadySet(_) => {
			APIError::bad_request("STATUS_ALREADY_SET", error.to_string())
		},
		ShipmentError::InvalidStatusTransition { .. } => {
			APIError::bad_request("INVALID_STATUS_TRANSITION", error.to_string())
		},
		ShipmentError::InvalidInput(_) => APIError::bad_request("INVALID_INPUT", error.to_string()),
		ShipmentError::NoValidPolicy { .. } => APIError::UnprocessableEntity {
			error_type: "NO_VALID_POLICY".to_string(),
			message: error.to_string(),
			details: None,
		},
		ShipmentError::ConcurrentUpdate(_) => APIError::Conflict {
			error_type: "CONCURRENT_UPDATE".to_string(),
			message: error.to_string(),
		},
		ShipmentError::Storage(_) => {
			tracing::error!(error = %error, "Request failed in storage");
			APIError::InternalServerError {
				error_type: "STORAGE_ERROR".to_string(),
				message: "Internal storage error".to_string(),
			}
		},
	}
}
