//! Utility functions for common value formatting.

pub mod formatting;

pub use formatting::{format_decimal, truncate_id};
