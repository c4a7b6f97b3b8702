use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Role, StationType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCount {
    pub idle: usize,
    pub total: usize,
}

impl PoolCount {
    pub fn busy(&self) -> usize {
        self.total.saturating_sub(self.idle)
    }
}

/// Point-in-time snapshot of the floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorCounts {
    pub completed_task_sets: u64,
    pub facilities: BTreeMap<StationType, PoolCount>,
    pub workers: BTreeMap<Role, PoolCount>,
}

impl FloorCounts {
    pub fn idle_workers(&self) -> usize {
        self.workers.values().map(|count| count.idle).sum()
    }

    pub fn total_workers(&self) -> usize {
        self.workers.values().map(|count| count.total).sum()
    }

    pub fn idle_facilities(&self) -> usize {
        self.facilities.values().map(|count| count.idle).sum()
    }

    pub fn total_facilities(&self) -> usize {
        self.facilities.values().map(|count| count.total).sum()
    }

    /// Every worker and facility is back in its pool.
    pub fn all_idle(&self) -> bool {
        self.workers.values().all(|count| count.busy() == 0)
            && self.facilities.values().all(|count| count.busy() == 0)
    }
}
