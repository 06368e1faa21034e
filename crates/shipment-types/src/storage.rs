//! Storage-related types for the shipment coordinator.

/// Storage keys for different data collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Key for storing order data
	Orders,
	/// Key for storing carrier data, policies included
	Carriers,
	/// Key for mapping a region name to the ids of carriers serving it
	CarriersByRegion,
	/// Key for storing contract data
	Contracts,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::Carriers => "carriers",
			StorageKey::CarriersByRegion => "carriers_by_region",
			StorageKey::Contracts => "contracts",
		}
	}
}
