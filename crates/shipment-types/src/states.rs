//! Static registry of Brazilian states (UFs) and their geographic regions.
//!
//! Both tables are defined once and never mutated, so lookups need no
//! synchronization. Orders reference a [`State`] as their destination and
//! carrier policies are keyed by [`Region`].

use once_cell::sync::Lazy;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when resolving registry input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	#[error("Unknown state code: {0}")]
	UnknownState(String),
	#[error("Unknown region: {0}")]
	UnknownRegion(String),
}

/// Geographic region grouping a set of states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
	Norte,
	Nordeste,
	CentroOeste,
	Sudeste,
	Sul,
}

impl Region {
	/// Returns the display name used on the wire and in storage.
	pub fn name(&self) -> &'static str {
		match self {
			Region::Norte => "Norte",
			Region::Nordeste => "Nordeste",
			Region::CentroOeste => "Centro-Oeste",
			Region::Sudeste => "Sudeste",
			Region::Sul => "Sul",
		}
	}

	/// Returns an iterator over all regions.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Norte,
			Self::Nordeste,
			Self::CentroOeste,
			Self::Sudeste,
			Self::Sul,
		]
		.into_iter()
	}

	/// Looks a region up by its exact display name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::all().find(|region| region.name() == name)
	}

	/// Returns the member states of this region, in registry order.
	pub fn states(self) -> impl Iterator<Item = &'static State> {
		STATES.iter().filter(move |state| state.region == self)
	}
}

impl fmt::Display for Region {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Region {
	type Err = RegistryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_name(s).ok_or_else(|| RegistryError::UnknownRegion(s.to_string()))
	}
}

impl Serialize for Region {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.name())
	}
}

impl<'de> Deserialize<'de> for Region {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let name = String::deserialize(deserializer)?;
		name.parse().map_err(D::Error::custom)
	}
}

/// A federative unit identified by its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
	/// Two-letter code, e.g. "SP".
	pub code: &'static str,
	/// Full display name.
	pub name: &'static str,
	/// Region the state belongs to.
	pub region: Region,
}

const fn state(code: &'static str, name: &'static str, region: Region) -> State {
	State { code, name, region }
}

/// Every state known to the registry.
pub static STATES: [State; 27] = [
	state("AC", "Acre", Region::Norte),
	state("AL", "Alagoas", Region::Nordeste),
	state("AP", "Amapá", Region::Norte),
	state("AM", "Amazonas", Region::Norte),
	state("BA", "Bahia", Region::Nordeste),
	state("CE", "Ceará", Region::Nordeste),
	state("DF", "Distrito Federal", Region::CentroOeste),
	state("ES", "Espírito Santo", Region::Sudeste),
	state("GO", "Goiás", Region::CentroOeste),
	state("MA", "Maranhão", Region::Nordeste),
	state("MT", "Mato Grosso", Region::CentroOeste),
	state("MS", "Mato Grosso do Sul", Region::CentroOeste),
	state("MG", "Minas Gerais", Region::Sudeste),
	state("PA", "Pará", Region::Norte),
	state("PB", "Paraíba", Region::Nordeste),
	state("PR", "Paraná", Region::Sul),
	state("PE", "Pernambuco", Region::Nordeste),
	state("PI", "Piauí", Region::Nordeste),
	state("RJ", "Rio de Janeiro", Region::Sudeste),
	state("RN", "Rio Grande do Norte", Region::Nordeste),
	state("RS", "Rio Grande do Sul", Region::Sul),
	state("RO", "Rondônia", Region::Norte),
	state("RR", "Roraima", Region::Norte),
	state("SC", "Santa Catarina", Region::Sul),
	state("SP", "São Paulo", Region::Sudeste),
	state("SE", "Sergipe", Region::Nordeste),
	state("TO", "Tocantins", Region::Norte),
];

static STATES_BY_CODE: Lazy<HashMap<&'static str, &'static State>> =
	Lazy::new(|| STATES.iter().map(|state| (state.code, state)).collect());

/// Resolves a state by its exact two-letter code.
pub fn resolve(code: &str) -> Option<&'static State> {
	STATES_BY_CODE.get(code).copied()
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code)
	}
}

impl FromStr for State {
	type Err = RegistryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		resolve(s)
			.copied()
			.ok_or_else(|| RegistryError::UnknownState(s.to_string()))
	}
}

// States travel as their code only; the rest is recovered from the registry.
impl Serialize for State {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.code)
	}
}

impl<'de> Deserialize<'de> for State {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let code = String::deserialize(deserializer)?;
		code.parse().map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_known_state() {
		let sp = resolve("SP").unwrap();
		assert_eq!(sp.name, "São Paulo");
		assert_eq!(sp.region, Region::Sudeste);
		assert_eq!(resolve("DF").unwrap().region, Region::CentroOeste);
	}

	#[test]
	fn test_resolve_is_exact() {
		assert!(resolve("sp").is_none());
		assert!(resolve("XX").is_none());
		assert!(resolve("").is_none());
	}

	#[test]
	fn test_region_membership() {
		let counts: Vec<usize> = Region::all().map(|r| r.states().count()).collect();
		assert_eq!(counts, vec![7, 9, 4, 4, 3]);
		assert_eq!(counts.iter().sum::<usize>(), STATES.len());

		let sul: Vec<&str> = Region::Sul.states().map(|s| s.code).collect();
		assert_eq!(sul, vec!["PR", "RS", "SC"]);
	}

	#[test]
	fn test_every_state_resolves_to_itself() {
		for state in STATES.iter() {
			assert_eq!(resolve(state.code), Some(state));
		}
	}

	#[test]
	fn test_region_names() {
		assert_eq!("Centro-Oeste".parse::<Region>().unwrap(), Region::CentroOeste);
		assert_eq!(Region::CentroOeste.to_string(), "Centro-Oeste");
		assert_eq!(
			"CentroOeste".parse::<Region>(),
			Err(RegistryError::UnknownRegion("CentroOeste".into()))
		);
	}

	#[test]
	fn test_state_serializes_as_code() {
		let json = serde_json::to_string(&STATES[24]).unwrap();
		assert_eq!(json, "\"SP\"");

		let parsed: State = serde_json::from_str("\"RS\"").unwrap();
		assert_eq!(parsed.region, Region::Sul);

		assert!(serde_json::from_str::<State>("\"ZZ\"").is_err());
	}
}
