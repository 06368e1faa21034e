//! State management for orders.
//!
//! This module provides the order status machine that decides which status
//! changes are legal. Persisting the result is left to the order store.

pub mod order;

pub use order::{OrderStatusMachine, TransitionError};
