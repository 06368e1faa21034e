//! Quote and contract types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price and delivery estimate offered by one carrier for one order.
///
/// Quotes are computed on demand and never persisted. The price keeps full
/// decimal precision; rounding happens only when it is formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
	pub carrier_id: String,
	pub carrier_name: String,
	pub price: Decimal,
	pub estimated_days: u32,
}

/// Agreement binding a carrier to ship an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
	/// Unique identifier, assigned by the contract store on insert.
	pub id: String,
	/// Contracted order.
	pub order_id: String,
	/// Contracted carrier.
	pub carrier_id: String,
	/// Total price for the shipment.
	pub price: Decimal,
	/// Delivery estimate taken from the matched policy.
	pub estimated_days: u32,
	/// Moment the carrier was contracted.
	pub contracted_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
