//! Business counters emitted by the coordinator.
//!
//! Recording is best-effort: it never fails and never blocks the caller.
//! Counters go through the `metrics` facade, so whichever recorder the process
//! installs decides where they end up. Without one they are dropped.

use std::fmt;

/// Counters incremented by the coordinator operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
	OrderCreated,
	OrderUpdated,
	CarrierCreated,
	ContractCreated,
}

impl Counter {
	/// Returns the exported counter name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Counter::OrderCreated => "order_created_total",
			Counter::OrderUpdated => "order_updated_total",
			Counter::CarrierCreated => "carrier_created_total",
			Counter::ContractCreated => "contract_created_total",
		}
	}
}

impl fmt::Display for Counter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Sink for business counters.
pub trait Metrics: Send + Sync {
	/// Increments `counter` by one.
	fn increment(&self, counter: Counter);
}

/// Forwards counters to the `metrics` facade.
///
/// Every increment is also emitted as a `tracing` debug event so counters show
/// up in the logs without a scraping endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterMetrics;

impl CounterMetrics {
	pub fn new() -> Self {
		Self
	}
}

impl Metrics for CounterMetrics {
	fn increment(&self, counter: Counter) {
		metrics::counter!(counter.as_str()).increment(1);
		tracing::debug!(counter = %counter, "Counter incremented");
	}
}
