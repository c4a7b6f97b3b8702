//! Tasks and task sets.
//!
//! A `Task` is shared between the routing worker that carries it, the
//! dispatcher that binds it, and the station that performs it, so it lives
//! behind an `Arc`. Bindings are write-once cells: a task goes from unbound
//! to bound exactly once and is never rebound.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ids::{FacilityId, TaskSetId, WorkerId};
use super::state::TaskState;
use super::station::{StationType, UnknownStation};
use crate::error::{FloorError, SubmitError};

/// One station visit within a task set.
#[derive(Debug)]
pub struct Task {
    task_set: TaskSetId,
    index: usize,
    station: StationType,
    description: String,
    facility: OnceLock<FacilityId>,
    transporter: OnceLock<WorkerId>,
    crew: OnceLock<Vec<WorkerId>>,
    completed: AtomicBool,
}

impl Task {
    pub fn new(
        task_set: TaskSetId,
        index: usize,
        station: StationType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            task_set,
            index,
            station,
            description: description.into(),
            facility: OnceLock::new(),
            transporter: OnceLock::new(),
            crew: OnceLock::new(),
            completed: AtomicBool::new(false),
        }
    }

    pub fn task_set(&self) -> TaskSetId {
        self.task_set
    }

    /// Position of this task within its task set.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn station(&self) -> StationType {
        self.station
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn facility(&self) -> Option<FacilityId> {
        self.facility.get().copied()
    }

    pub fn transporter(&self) -> Option<WorkerId> {
        self.transporter.get().copied()
    }

    /// Non-transport crew bound by the dispatcher (empty for transport-only stations).
    pub fn crew(&self) -> Option<&[WorkerId]> {
        self.crew.get().map(Vec::as_slice)
    }

    pub fn bind_facility(&self, facility: FacilityId) -> Result<(), FloorError> {
        self.facility
            .set(facility)
            .map_err(|_| self.already_bound("facility"))
    }

    pub fn bind_transporter(&self, worker: WorkerId) -> Result<(), FloorError> {
        self.transporter
            .set(worker)
            .map_err(|_| self.already_bound("transporter"))
    }

    pub fn bind_crew(&self, crew: Vec<WorkerId>) -> Result<(), FloorError> {
        self.crew.set(crew).map_err(|_| self.already_bound("crew"))
    }

    pub fn mark_completed(&self) {
        self.completed.store(true, Ordering::Release);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    pub fn state(&self) -> TaskState {
        if self.is_completed() {
            TaskState::Completed
        } else if self.facility.get().is_some() {
            TaskState::Bound
        } else {
            TaskState::Unbound
        }
    }

    fn already_bound(&self, what: &'static str) -> FloorError {
        FloorError::AlreadyBound {
            task_set: self.task_set,
            index: self.index,
            what,
        }
    }
}

/// An ordered job: tasks are executed strictly in sequence.
#[derive(Debug, Clone)]
pub struct TaskSet {
    pub id: TaskSetId,
    pub tasks: Vec<Arc<Task>>,
}

impl TaskSet {
    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(|task| task.is_completed())
    }
}

/// One step of a submission, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub station: String,
    pub description: String,
}

impl StepSpec {
    pub fn new(station: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            description: description.into(),
        }
    }
}

/// Submission form of a task set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSetSpec {
    pub id: TaskSetId,
    pub steps: Vec<StepSpec>,
}

impl TaskSetSpec {
    pub fn new(id: u64, steps: Vec<StepSpec>) -> Self {
        Self {
            id: TaskSetId::new(id),
            steps,
        }
    }

    /// Build from parallel station/description lists.
    pub fn from_pairs<'a>(id: u64, steps: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            id,
            steps
                .into_iter()
                .map(|(station, description)| StepSpec::new(station, description))
                .collect(),
        )
    }

    /// Validate and turn the submission into a fresh, unbound task set.
    ///
    /// The whole set is rejected if any step names an unknown station type.
    pub fn into_task_set(self) -> Result<TaskSet, SubmitError> {
        let Some(first) = self.steps.first() else {
            return Err(SubmitError::Empty(self.id));
        };
        let first_station = first
            .station
            .parse::<StationType>()
            .map_err(|UnknownStation(name)| SubmitError::UnknownStation {
                task_set: self.id,
                index: 0,
                name,
            })?;
        if first_station != StationType::Pickup {
            return Err(SubmitError::FirstStepNotPickup {
                task_set: self.id,
                found: first_station,
            });
        }

        let mut tasks = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.into_iter().enumerate() {
            let station = step.station.parse::<StationType>().map_err(|UnknownStation(name)| {
                SubmitError::UnknownStation {
                    task_set: self.id,
                    index,
                    name,
                }
            })?;
            tasks.push(Arc::new(Task::new(self.id, index, station, step.description)));
        }
        Ok(TaskSet { id: self.id, tasks })
    }
}
