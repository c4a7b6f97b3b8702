//! Workload implementations.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FacilityId, Role, StationType, WorkerId};
use crate::ports::Workload;

/// Sleeps for the station's work cost and a fixed commute time.
#[derive(Debug, Clone)]
pub struct SleepWorkload {
    commute: Duration,
}

impl SleepWorkload {
    pub fn new(commute: Duration) -> Self {
        Self { commute }
    }
}

#[async_trait]
impl Workload for SleepWorkload {
    async fn work(&self, _station: StationType, _facility: FacilityId, cost: Duration) {
        tokio::time::sleep(cost).await;
    }

    async fn commute(&self, _role: Role, _worker: WorkerId) {
        tokio::time::sleep(self.commute).await;
    }
}

/// Only yields to the scheduler; every step is "free".
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantWorkload;

#[async_trait]
impl Workload for InstantWorkload {
    async fn work(&self, _station: StationType, _facility: FacilityId, _cost: Duration) {
        tokio::task::yield_now().await;
    }

    async fn commute(&self, _role: Role, _worker: WorkerId) {
        tokio::task::yield_now().await;
    }
}
