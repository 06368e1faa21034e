//! Order status machine.
//!
//! Orders move forward through `created -> awaiting_pickup -> picked_up ->
//! shipped -> delivered -> lost`. Any forward jump is allowed, moving back is
//! not, and requesting the current status again is rejected as a re-submission.

use shipment_types::OrderStatus;
use thiserror::Error;

/// Reasons a status transition is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
	#[error("Order status is already {0}")]
	AlreadySet(OrderStatus),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
}

/// Validates order status transitions.
pub struct OrderStatusMachine;

impl OrderStatusMachine {
	/// Returns the status to apply when moving from `current` to `requested`.
	pub fn transition(
		current: OrderStatus,
		requested: OrderStatus,
	) -> Result<OrderStatus, TransitionError> {
		if requested == current {
			return Err(TransitionError::AlreadySet(current));
		}
		if requested.rank() < current.rank() {
			return Err(TransitionError::InvalidTransition {
				from: current,
				to: requested,
			});
		}
		Ok(requested)
	}
}
