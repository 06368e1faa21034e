//! Handlers for the coordinator operations.
//!
//! Each handler owns the stores it needs: orders and their status, carrier
//! registration, and the quote/contract workflow.

pub mod carrier;
pub mod order;
pub mod shipping;

pub use carrier::CarrierHandler;
pub use order::OrderHandler;
pub use shipping::ShippingHandler;
