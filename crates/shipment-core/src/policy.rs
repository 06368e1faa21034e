//! Carrier policy matching.

use shipment_types::{Policy, Region};

/// Returns the first policy covering `region`, in stored order.
///
/// Price and delivery time play no part in the choice.
pub fn match_policy(policies: &[Policy], region: Region) -> Option<&Policy> {
	policies.iter().find(|policy| policy.region == region)
}
