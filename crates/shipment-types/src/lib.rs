//! Common types module for the shipment coordinator.
//!
//! This module defines the data types shared by every crate in the workspace:
//! the static state/region registry, orders, carriers and their policies,
//! quotes and contracts, storage keys and the HTTP-facing request/response
//! structures.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Carrier and regional pricing policy types.
pub mod carrier;
/// Order types and the order status lifecycle.
pub mod order;
/// Registry trait for pluggable implementations.
pub mod registry;
/// Quote and contract types produced by the shipping workflow.
pub mod shipping;
/// Static registry of states and regions.
pub mod states;
/// Storage types for managing persistent data.
pub mod storage;
/// Utility functions for formatting values for display.
pub mod utils;
/// Configuration validation types for backend configuration tables.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use carrier::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use shipping::*;
pub use states::{Region, RegistryError, State};
pub use storage::*;
pub use utils::{format_decimal, truncate_id};
pub use validation::*;
