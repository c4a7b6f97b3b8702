//! Floor configuration: capacity per kind and the opaque step costs.
//!
//! Everything here is fixed at boot.
//!
//! ```toml
//! [facilities]
//! pickup = 2
//! welding = 1
//!
//! [workers]
//! transport = 2
//! welding = 2
//!
//! [timings]
//! commute_ms = 1000
//! work_ms = 1000
//!
//! [timings.work_ms_by_station]
//! welding = 1500
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Role, StationDescriptor, StationType};
use crate::error::ConfigError;

const DEFAULT_FACILITIES_PER_TYPE: usize = 2;
const DEFAULT_WORKERS_PER_ROLE: usize = 2;
const DEFAULT_COMMUTE_MS: u64 = 1000;
const DEFAULT_WORK_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Facilities per station type. Missing types have none.
    pub facilities: BTreeMap<StationType, usize>,

    /// Workers per role. Missing roles have none.
    pub workers: BTreeMap<Role, usize>,

    pub timings: Timings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// One-way travel time between the control room and any facility.
    pub commute_ms: u64,

    /// Work cost for station types without an override.
    pub work_ms: u64,

    pub work_ms_by_station: BTreeMap<StationType, u64>,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            facilities: StationType::ALL
                .into_iter()
                .map(|station| (station, DEFAULT_FACILITIES_PER_TYPE))
                .collect(),
            workers: Role::ALL
                .into_iter()
                .map(|role| (role, DEFAULT_WORKERS_PER_ROLE))
                .collect(),
            timings: Timings::default(),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            commute_ms: DEFAULT_COMMUTE_MS,
            work_ms: DEFAULT_WORK_MS,
            work_ms_by_station: BTreeMap::new(),
        }
    }
}

impl Timings {
    /// Same cost for every step.
    pub fn uniform(ms: u64) -> Self {
        Self {
            commute_ms: ms,
            work_ms: ms,
            work_ms_by_station: BTreeMap::new(),
        }
    }

    pub fn commute(&self) -> Duration {
        Duration::from_millis(self.commute_ms)
    }

    pub fn work_cost(&self, station: StationType) -> Duration {
        let ms = self
            .work_ms_by_station
            .get(&station)
            .copied()
            .unwrap_or(self.work_ms);
        Duration::from_millis(ms)
    }

    pub fn descriptor(&self, station: StationType) -> StationDescriptor {
        StationDescriptor::new(station, self.work_cost(station))
    }
}

impl FloorConfig {
    /// No facilities, no workers, default timings.
    pub fn empty() -> Self {
        Self {
            facilities: BTreeMap::new(),
            workers: BTreeMap::new(),
            timings: Timings::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn facilities_of(&self, station: StationType) -> usize {
        self.facilities.get(&station).copied().unwrap_or(0)
    }

    pub fn workers_of(&self, role: Role) -> usize {
        self.workers.get(&role).copied().unwrap_or(0)
    }
}
