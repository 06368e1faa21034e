//! Order types for the shipment coordinator.
//!
//! An order describes a package to be shipped to a destination state. After
//! creation only its status (and the matching `updated_at`) changes, moving
//! monotonically through [`OrderStatus`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::State;

/// A package order awaiting or undergoing shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier, assigned by the order store on insert.
	pub id: String,
	/// Free-form product description.
	pub product: String,
	/// Package weight in kilograms.
	pub weight_kg: Decimal,
	/// Destination state.
	pub destination: State,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
	/// Timestamp when this order was last updated.
	pub updated_at: DateTime<Utc>,
}

/// Input for creating an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
	pub product: String,
	pub weight_kg: Decimal,
	pub destination: State,
}

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0}")]
pub struct ParseStatusError(pub String);

/// Status of an order.
///
/// Variants are declared in lifecycle order; [`OrderStatus::rank`] is the only
/// input used to decide whether a transition is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Order registered, no carrier contracted yet.
	Created,
	/// A carrier has been contracted and the package awaits pickup.
	AwaitingPickup,
	/// The carrier collected the package.
	PickedUp,
	/// The package is in transit.
	Shipped,
	/// The package reached its destination.
	Delivered,
	/// The package was lost.
	Lost,
}

impl OrderStatus {
	/// Position of the status in the lifecycle, starting at 1.
	pub fn rank(&self) -> u8 {
		match self {
			OrderStatus::Created => 1,
			OrderStatus::AwaitingPickup => 2,
			OrderStatus::PickedUp => 3,
			OrderStatus::Shipped => 4,
			OrderStatus::Delivered => 5,
			OrderStatus::Lost => 6,
		}
	}

	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Created => "created",
			OrderStatus::AwaitingPickup => "awaiting_pickup",
			OrderStatus::PickedUp => "picked_up",
			OrderStatus::Shipped => "shipped",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Lost => "lost",
		}
	}

	/// Returns an iterator over all statuses in rank order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Created,
			Self::AwaitingPickup,
			Self::PickedUp,
			Self::Shipped,
			Self::Delivered,
			Self::Lost,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = ParseStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| ParseStatusError(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ranks_follow_declaration_order() {
		let ranks: Vec<u8> = OrderStatus::all().map(|s| s.rank()).collect();
		assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
	}

	#[test]
	fn test_parse_status() {
		assert_eq!(
			"awaiting_pickup".parse::<OrderStatus>(),
			Ok(OrderStatus::AwaitingPickup)
		);
		assert_eq!("lost".parse::<OrderStatus>(), Ok(OrderStatus::Lost));
		assert_eq!(
			"Shipped".parse::<OrderStatus>(),
			Err(ParseStatusError("Shipped".into()))
		);
		assert!("cancelled".parse::<OrderStatus>().is_err());
	}

	#[test]
	fn test_serde_matches_display() {
		for status in OrderStatus::all() {
			let json = serde_json::to_string(&status).unwrap();
			assert_eq!(json, format!("\"{}\"", status));
		}
	}
}
