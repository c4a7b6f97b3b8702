//! FaultHandler port - what happens on an internal invariant violation.
//!
//! Violations cannot be caused by valid input; they mean the dispatcher (or
//! whatever bound the task) has a bug. The handler never returns.

use thiserror::Error;

use crate::domain::{FacilityId, Role, StationType, TaskSetId};
use crate::error::FloorError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error(
        "wrong crew at {station} {facility} for {task_set} task {index}: expected {expected:?}, arrived {arrived:?}"
    )]
    CrewMismatch {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
        facility: FacilityId,
        expected: Vec<(Role, usize)>,
        arrived: Vec<Role>,
    },

    #[error("rebinding attempted: {0}")]
    Rebind(String),
}

impl From<FloorError> for InvariantViolation {
    fn from(err: FloorError) -> Self {
        InvariantViolation::Rebind(err.to_string())
    }
}

/// FaultHandler decides how the process dies.
pub trait FaultHandler: Send + Sync {
    fn invariant_violated(&self, violation: InvariantViolation) -> !;
}
