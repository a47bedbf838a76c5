//! CGMES profiles and the active-profile set.
//!
//! Profiles are ordered by their export priority rank. `Ord` follows the rank,
//! so sorted collections of profiles iterate in priority order.

use crate::error::{CgmesError, CgmesResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One of the standardized CGMES model partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CgmesProfile {
    #[serde(rename = "EQ")]
    Equipment,
    #[serde(rename = "SSH")]
    SteadyStateHypothesis,
    #[serde(rename = "TP")]
    Topology,
    #[serde(rename = "SV")]
    StateVariables,
    #[serde(rename = "DY")]
    Dynamics,
    #[serde(rename = "GL")]
    GeographicalLocation,
    #[serde(rename = "DI")]
    DiagramLayout,
}

const ALL_PROFILES: [CgmesProfile; 7] = [
    CgmesProfile::Equipment,
    CgmesProfile::SteadyStateHypothesis,
    CgmesProfile::Topology,
    CgmesProfile::StateVariables,
    CgmesProfile::Dynamics,
    CgmesProfile::GeographicalLocation,
    CgmesProfile::DiagramLayout,
];

impl CgmesProfile {
    /// All profiles in ascending rank order.
    pub fn all() -> impl Iterator<Item = CgmesProfile> {
        ALL_PROFILES.into_iter()
    }

    /// Export priority; lower ranks win fallback resolution.
    pub fn rank(self) -> u8 {
        match self {
            CgmesProfile::Equipment => 0,
            CgmesProfile::SteadyStateHypothesis => 1,
            CgmesProfile::Topology => 2,
            CgmesProfile::StateVariables => 3,
            CgmesProfile::Dynamics => 4,
            CgmesProfile::GeographicalLocation => 5,
            CgmesProfile::DiagramLayout => 6,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        ALL_PROFILES.get(rank as usize).copied()
    }

    pub fn short_name(self) -> &'static str {
        match self {
            CgmesProfile::Equipment => "EQ",
            CgmesProfile::SteadyStateHypothesis => "SSH",
            CgmesProfile::Topology => "TP",
            CgmesProfile::StateVariables => "SV",
            CgmesProfile::Dynamics => "DY",
            CgmesProfile::GeographicalLocation => "GL",
            CgmesProfile::DiagramLayout => "DI",
        }
    }

    /// Name used in output file names and the model header.
    pub fn full_name(self) -> &'static str {
        match self {
            CgmesProfile::Equipment => "Equipment",
            CgmesProfile::SteadyStateHypothesis => "SteadyStateHypothesis",
            CgmesProfile::Topology => "Topology",
            CgmesProfile::StateVariables => "StateVariables",
            CgmesProfile::Dynamics => "Dynamics",
            CgmesProfile::GeographicalLocation => "GeographicalLocation",
            CgmesProfile::DiagramLayout => "DiagramLayout",
        }
    }
}

impl fmt::Display for CgmesProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for CgmesProfile {
    type Err = CgmesError;

    fn from_str(input: &str) -> CgmesResult<Self> {
        let trimmed = input.trim();
        CgmesProfile::all()
            .find(|profile| {
                trimmed.eq_ignore_ascii_case(profile.short_name())
                    || trimmed.eq_ignore_ascii_case(profile.full_name())
            })
            .ok_or_else(|| CgmesError::UnknownProfile(trimmed.to_string()))
    }
}

/// Profiles selected for the current export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveProfiles(BTreeSet<CgmesProfile>);

impl ActiveProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self(CgmesProfile::all().collect())
    }

    pub fn with(mut self, profile: CgmesProfile) -> Self {
        self.0.insert(profile);
        self
    }

    pub fn insert(&mut self, profile: CgmesProfile) -> bool {
        self.0.insert(profile)
    }

    pub fn contains(&self, profile: CgmesProfile) -> bool {
        self.0.contains(&profile)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Active profiles in rank order.
    pub fn iter(&self) -> impl Iterator<Item = CgmesProfile> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CgmesProfile> for ActiveProfiles {
    fn from_iter<T: IntoIterator<Item = CgmesProfile>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for ActiveProfiles {
    type Err = CgmesError;

    /// Parses a comma separated list such as `EQ,TP,SV`.
    fn from_str(input: &str) -> CgmesResult<Self> {
        input
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(CgmesProfile::from_str)
            .collect()
    }
}

impl fmt::Display for ActiveProfiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(CgmesProfile::short_name).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        let ranks: Vec<u8> = CgmesProfile::all().map(CgmesProfile::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(CgmesProfile::Equipment < CgmesProfile::StateVariables);
        assert_eq!(CgmesProfile::from_rank(3), Some(CgmesProfile::StateVariables));
        assert_eq!(CgmesProfile::from_rank(7), None);
    }

    #[test]
    fn parses_short_and_full_names() {
        assert_eq!("EQ".parse::<CgmesProfile>().unwrap(), CgmesProfile::Equipment);
        assert_eq!("ssh".parse::<CgmesProfile>().unwrap(), CgmesProfile::SteadyStateHypothesis);
        assert_eq!(
            "GeographicalLocation".parse::<CgmesProfile>().unwrap(),
            CgmesProfile::GeographicalLocation
        );
        assert!(matches!(
            "XX".parse::<CgmesProfile>(),
            Err(CgmesError::UnknownProfile(_))
        ));
    }

    #[test]
    fn active_profiles_parse_comma_lists() {
        let active: ActiveProfiles = "SV, EQ,,TP".parse().unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.contains(CgmesProfile::Topology));
        assert!(!active.contains(CgmesProfile::DiagramLayout));
        assert_eq!(active.to_string(), "EQ,TP,SV");
        assert!("EQ,bogus".parse::<ActiveProfiles>().is_err());
    }

    #[test]
    fn serde_uses_short_codes() {
        let json = serde_json::to_string(&CgmesProfile::Topology).unwrap();
        assert_eq!(json, "\"TP\"");
        let active: ActiveProfiles = serde_json::from_str("[\"SV\",\"EQ\"]").unwrap();
        assert_eq!(active.iter().collect::<Vec<_>>(), vec![
            CgmesProfile::Equipment,
            CgmesProfile::StateVariables
        ]);
    }
}
