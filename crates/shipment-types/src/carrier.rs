//! Carrier types.
//!
//! A carrier ships to one or more regions, each governed by a [`Policy`] that
//! fixes the price per kilogram and the delivery estimate. Policies keep the
//! order in which they were registered.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Region;

/// A shipping company and its regional policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
	/// Unique identifier, assigned by the carrier store on insert.
	pub id: String,
	/// Carrier display name.
	pub name: String,
	/// Regional policies in registration order.
	pub policies: Vec<Policy>,
	/// Timestamp when this carrier was created.
	pub created_at: DateTime<Utc>,
	/// Timestamp when this carrier was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Carrier {
	/// Distinct regions served by this carrier, in first-seen order.
	pub fn regions(&self) -> Vec<Region> {
		let mut regions = Vec::new();
		for policy in &self.policies {
			if !regions.contains(&policy.region) {
				regions.push(policy.region);
			}
		}
		regions
	}
}

/// Pricing and delivery terms of a carrier for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
	/// Unique identifier of the policy.
	pub id: String,
	/// Owning carrier.
	pub carrier_id: String,
	/// Region the policy applies to.
	pub region: Region,
	/// Estimated delivery time in days.
	pub estimated_days: u32,
	/// Price charged per kilogram.
	pub price_per_kg: Decimal,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Input for registering a carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarrier {
	pub name: String,
	pub policies: Vec<NewPolicy>,
}

/// Input for one policy of a carrier being registered.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolicy {
	pub region: Region,
	pub estimated_days: u32,
	pub price_per_kg: Decimal,
}
