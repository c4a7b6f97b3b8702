//! Workload port - the opaque fixed-cost "do work" and "travel" steps.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FacilityId, Role, StationType, WorkerId};

/// Workload stands in for physical work and movement on the floor.
///
/// The protocol never looks inside these calls; it only relies on them
/// returning eventually.
#[async_trait]
pub trait Workload: Send + Sync {
    /// Perform one task at a facility. `cost` comes from the station descriptor.
    async fn work(&self, station: StationType, facility: FacilityId, cost: Duration);

    /// Move a worker between the control room and a facility (either direction).
    async fn commute(&self, role: Role, worker: WorkerId);
}
