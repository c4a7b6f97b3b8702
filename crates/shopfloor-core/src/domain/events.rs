//! Events - progress events emitted at each protocol transition.
//!
//! The textual form is up to the sink; the occurrences and their relative
//! order per task / task set are what callers (and tests) rely on.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{FacilityId, TaskSetId, WorkerId};
use super::station::{Role, StationType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FloorEvent {
    /// Intake accepted a task set.
    TaskSetAdmitted { task_set: TaskSetId, tasks: usize },

    /// A submission was refused before admission.
    TaskSetRejected { task_set: TaskSetId, reason: String },

    /// A routing worker took over the task set.
    TaskSetAssigned { task_set: TaskSetId, worker: WorkerId },

    /// The routing worker asked a dispatcher for the next task's assignment.
    DispatchRequested {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
    },

    /// A facility received a task and now waits for its crew.
    TaskAssigned {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
        facility: FacilityId,
    },

    /// A crew member was sent to a facility by a dispatcher.
    CrewDispatched {
        task_set: TaskSetId,
        index: usize,
        facility: FacilityId,
        worker: WorkerId,
        role: Role,
    },

    WorkerArrived {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
        facility: FacilityId,
        worker: WorkerId,
        role: Role,
    },

    /// Every required party is present; `roles` lists them in arrival order.
    CrewComplete {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
        facility: FacilityId,
        roles: Vec<Role>,
    },

    WorkFinished {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
        facility: FacilityId,
    },

    FacilityFreed {
        task_set: TaskSetId,
        station: StationType,
        facility: FacilityId,
    },

    /// The routing worker marked a task complete.
    TaskCompleted {
        task_set: TaskSetId,
        index: usize,
        station: StationType,
    },

    TaskSetCompleted { task_set: TaskSetId },

    /// A worker walked back and rejoined its role pool.
    WorkerFreed {
        task_set: TaskSetId,
        worker: WorkerId,
        role: Role,
    },
}

impl FloorEvent {
    pub fn task_set(&self) -> TaskSetId {
        match self {
            FloorEvent::TaskSetAdmitted { task_set, .. }
            | FloorEvent::TaskSetRejected { task_set, .. }
            | FloorEvent::TaskSetAssigned { task_set, .. }
            | FloorEvent::DispatchRequested { task_set, .. }
            | FloorEvent::TaskAssigned { task_set, .. }
            | FloorEvent::CrewDispatched { task_set, .. }
            | FloorEvent::WorkerArrived { task_set, .. }
            | FloorEvent::CrewComplete { task_set, .. }
            | FloorEvent::WorkFinished { task_set, .. }
            | FloorEvent::FacilityFreed { task_set, .. }
            | FloorEvent::TaskCompleted { task_set, .. }
            | FloorEvent::TaskSetCompleted { task_set }
            | FloorEvent::WorkerFreed { task_set, .. } => *task_set,
        }
    }

    /// Index of the task this event concerns, if it concerns a single task.
    pub fn task_index(&self) -> Option<usize> {
        match self {
            FloorEvent::DispatchRequested { index, .. }
            | FloorEvent::TaskAssigned { index, .. }
            | FloorEvent::CrewDispatched { index, .. }
            | FloorEvent::WorkerArrived { index, .. }
            | FloorEvent::CrewComplete { index, .. }
            | FloorEvent::WorkFinished { index, .. }
            | FloorEvent::TaskCompleted { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// An event plus the time it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: FloorEvent,
}
