//! String formatting utilities.
//!
//! Provides helpers for rendering identifiers in log lines and decimal
//! amounts for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Utility function to truncate an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((idx, _)) => format!("{}..", &id[..idx]),
		None => id.to_string(),
	}
}

/// Formats a decimal with exactly two fractional digits.
///
/// Midpoints round away from zero (half-up for positive amounts). Only use
/// this for display; computations keep the unrounded value.
pub fn format_decimal(value: Decimal) -> String {
	let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
	rounded.rescale(2);
	rounded.to_string()
}
