use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{StationType, TaskSetId};

/// Failures between running actors.
#[derive(Debug, Error)]
pub enum FloorError {
    /// The receiving actor has stopped (the floor is shutting down).
    #[error("{0} has shut down")]
    ActorGone(&'static str),

    #[error("task {index} of {task_set} already has a {what} bound")]
    AlreadyBound {
        task_set: TaskSetId,
        index: usize,
        what: &'static str,
    },
}

/// Reasons a task set is refused at submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0} has no steps")]
    Empty(TaskSetId),

    #[error("{task_set}: step {index} names unknown station type '{name}'")]
    UnknownStation {
        task_set: TaskSetId,
        index: usize,
        name: String,
    },

    #[error("{task_set}: first step must be a pickup, found {found}")]
    FirstStepNotPickup {
        task_set: TaskSetId,
        found: StationType,
    },

    #[error("intake has shut down")]
    IntakeGone,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("the floor must be booted from within a tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config cannot be rendered: {0}")]
    Render(#[from] toml::ser::Error),
}
