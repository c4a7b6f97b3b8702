//! State - task lifecycle.

use serde::{Deserialize, Serialize};

/// Where a task is in its lifecycle.
///
/// State transitions:
/// - Unbound -> Bound (facility assigned by intake or a dispatcher)
/// - Bound -> Completed (station finished, routing worker marked it)
///
/// There is no way back: a task is never rebound or reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    Unbound,
    Bound,
    Completed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed)
    }
}

