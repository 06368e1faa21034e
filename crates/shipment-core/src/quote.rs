//! Quote engine.
//!
//! Prices are `price_per_kg * weight_kg` in exact decimal arithmetic. Nothing
//! is rounded here; rounding to cents happens when a price is formatted.

use rust_decimal::Decimal;
use shipment_types::{truncate_id, Carrier, Order, Policy, Quote};

use crate::policy::match_policy;

/// Total price of shipping `weight_kg` under `policy`.
///
/// Returns `None` only when the product overflows the decimal range.
pub fn price_for(policy: &Policy, weight_kg: Decimal) -> Option<Decimal> {
	policy.price_per_kg.checked_mul(weight_kg)
}

/// Quotes one carrier for an order, if it has a policy for the destination.
pub fn quote_for(order: &Order, carrier: &Carrier) -> Option<Quote> {
	let policy = match_policy(&carrier.policies, order.destination.region)?;
	let Some(price) = price_for(policy, order.weight_kg) else {
		tracing::warn!(
			order_id = %truncate_id(&order.id),
			carrier_id = %truncate_id(&carrier.id),
			"Price overflow, skipping carrier"
		);
		return None;
	};

	Some(Quote {
		carrier_id: carrier.id.clone(),
		carrier_name: carrier.name.clone(),
		price,
		estimated_days: policy.estimated_days,
	})
}

/// Quotes every carrier for an order, keeping the carrier order.
///
/// Carriers without a policy for the destination region are left out.
pub fn quote_all(order: &Order, carriers: &[Carrier]) -> Vec<Quote> {
	carriers
		.iter()
		.filter_map(|carrier| quote_for(order, carrier))
		.collect()
}
