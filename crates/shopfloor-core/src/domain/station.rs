//! Station types, worker roles, and the per-type crew descriptor.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A category of facility on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Pickup,
    Welding,
    Assembly,
    Painting,
    Dropoff,
}

impl StationType {
    pub const ALL: [StationType; 5] = [
        StationType::Pickup,
        StationType::Welding,
        StationType::Assembly,
        StationType::Painting,
        StationType::Dropoff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StationType::Pickup => "pickup",
            StationType::Welding => "welding",
            StationType::Assembly => "assembly",
            StationType::Painting => "painting",
            StationType::Dropoff => "dropoff",
        }
    }

    /// Crew required at a facility of this type, as (role, count) pairs.
    ///
    /// Every station needs exactly one transport worker: the one carrying
    /// the task set.
    pub fn crew(self) -> &'static [(Role, usize)] {
        match self {
            StationType::Pickup | StationType::Dropoff => &[(Role::Transport, 1)],
            StationType::Assembly => &[(Role::Transport, 1), (Role::Assembly, 1)],
            StationType::Painting => &[(Role::Transport, 1), (Role::Painting, 1)],
            StationType::Welding => &[(Role::Transport, 1), (Role::Welding, 2)],
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized station type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown station type '{0}'")]
pub struct UnknownStation(pub String);

impl FromStr for StationType {
    type Err = UnknownStation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        StationType::ALL
            .into_iter()
            .find(|station| station.as_str() == name)
            .ok_or_else(|| UnknownStation(s.to_string()))
    }
}

/// Specialization of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Transport,
    Assembly,
    Welding,
    Painting,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Transport, Role::Assembly, Role::Welding, Role::Painting];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Transport => "transport",
            Role::Assembly => "assembly",
            Role::Welding => "welding",
            Role::Painting => "painting",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the generic station actor and dispatcher need to know about
/// one station type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDescriptor {
    pub station: StationType,
    pub crew: &'static [(Role, usize)],
    pub work_cost: Duration,
}

impl StationDescriptor {
    pub fn new(station: StationType, work_cost: Duration) -> Self {
        Self {
            station,
            crew: station.crew(),
            work_cost,
        }
    }

    /// Number of parties that must arrive before work starts.
    pub fn crew_size(&self) -> usize {
        self.crew.iter().map(|(_, n)| n).sum()
    }

    /// Roles the dispatcher must acquire; the transport worker is already
    /// bound to the task when the request arrives.
    pub fn non_transport_crew(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        self.crew
            .iter()
            .copied()
            .filter(|(role, _)| *role != Role::Transport)
    }

    /// Does the arrived set of roles equal the required multiset exactly?
    pub fn accepts(&self, arrived: &[Role]) -> bool {
        let mut counts: BTreeMap<Role, usize> = BTreeMap::new();
        for role in arrived {
            *counts.entry(*role).or_default() += 1;
        }
        let expected: BTreeMap<Role, usize> = self.crew.iter().copied().collect();
        counts == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StationType::Pickup, 1, 0)]
    #[case(StationType::Dropoff, 1, 0)]
    #[case(StationType::Assembly, 1, 1)]
    #[case(StationType::Painting, 1, 1)]
    #[case(StationType::Welding, 1, 2)]
    fn crew_cardinalities(#[case] station: StationType, #[case] transport: usize, #[case] other: usize) {
        let descriptor = StationDescriptor::new(station, Duration::ZERO);
        let transport_count: usize = descriptor
            .crew
            .iter()
            .filter(|(role, _)| *role == Role::Transport)
            .map(|(_, n)| n)
            .sum();
        let other_count: usize = descriptor.non_transport_crew().map(|(_, n)| n).sum();
        assert_eq!(transport_count, transport);
        assert_eq!(other_count, other);
        assert_eq!(descriptor.crew_size(), transport + other);
    }

    #[rstest]
    #[case("pickup", StationType::Pickup)]
    #[case("Welding", StationType::Welding)]
    #[case(" PAINTING ", StationType::Painting)]
    fn parses_station_names(#[case] input: &str, #[case] expected: StationType) {
        assert_eq!(input.parse::<StationType>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_station_name() {
        let err = "polishing".parse::<StationType>().unwrap_err();
        assert_eq!(err, UnknownStation("polishing".to_string()));
    }

    #[test]
    fn welding_accepts_any_arrival_order() {
        let welding = StationDescriptor::new(StationType::Welding, Duration::ZERO);
        assert!(welding.accepts(&[Role::Welding, Role::Transport, Role::Welding]));
        assert!(welding.accepts(&[Role::Transport, Role::Welding, Role::Welding]));
    }

    #[rstest]
    #[case(StationType::Welding, &[Role::Welding, Role::Transport, Role::Transport])]
    #[case(StationType::Welding, &[Role::Welding, Role::Transport])]
    #[case(StationType::Assembly, &[Role::Painting, Role::Transport])]
    #[case(StationType::Pickup, &[Role::Assembly])]
    fn rejects_mismatched_crews(#[case] station: StationType, #[case] arrived: &[Role]) {
        let descriptor = StationDescriptor::new(station, Duration::ZERO);
        assert!(!descriptor.accepts(arrived));
    }
}
