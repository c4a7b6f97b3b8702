//! Floor - the handle callers hold on a booted shop floor.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::{FloorEvent, Role, StationType, TaskSetId, TaskSetSpec};
use crate::error::SubmitError;
use crate::observability::{FloorCounts, PoolCount};

use super::context::FloorContext;
use super::intake::{Finished, IntakeHandle};

const IDLE_POLL: Duration = Duration::from_millis(5);

pub struct Floor {
    ctx: Arc<FloorContext>,
    intake: IntakeHandle,
    finished: Arc<Finished>,
    actors: Vec<JoinHandle<()>>,
}

impl Floor {
    pub(crate) fn new(
        ctx: Arc<FloorContext>,
        intake: IntakeHandle,
        finished: Arc<Finished>,
        actors: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            ctx,
            intake,
            finished,
            actors,
        }
    }

    /// Validate a task set and queue it for admission.
    ///
    /// Returns once intake has accepted it into its queue, not once it is
    /// admitted; admission waits for a pickup facility and a transport worker.
    pub async fn submit(&self, spec: TaskSetSpec) -> Result<TaskSetId, SubmitError> {
        let id = spec.id;
        let task_set = match spec.into_task_set() {
            Ok(task_set) => task_set,
            Err(err) => {
                self.ctx.events.emit(FloorEvent::TaskSetRejected {
                    task_set: id,
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };
        self.intake
            .admit(task_set)
            .await
            .map_err(|_| SubmitError::IntakeGone)?;
        Ok(id)
    }

    /// Number of task sets finished so far.
    pub fn completed(&self) -> u64 {
        *self.finished.count.borrow()
    }

    /// Wait until at least `n` task sets have finished. `false` if the budget
    /// ran out first.
    pub async fn wait_for_completed(&self, n: u64, budget: Duration) -> bool {
        let mut count = self.finished.count.clone();
        let reached = tokio::time::timeout(budget, async move {
            count.wait_for(|done| *done >= n).await.is_ok()
        })
        .await;
        matches!(reached, Ok(true))
    }

    pub async fn counts(&self) -> FloorCounts {
        let mut facilities = std::collections::BTreeMap::new();
        for station in StationType::ALL {
            let pool = self.ctx.facility_pool(station);
            facilities.insert(
                station,
                PoolCount {
                    idle: pool.idle_count().await,
                    total: pool.capacity(),
                },
            );
        }
        let mut workers = std::collections::BTreeMap::new();
        for role in Role::ALL {
            let pool = self.ctx.worker_pool(role);
            workers.insert(
                role,
                PoolCount {
                    idle: pool.idle_count().await,
                    total: pool.capacity(),
                },
            );
        }
        FloorCounts {
            completed_task_sets: self.completed(),
            facilities,
            workers,
        }
    }

    /// Wait until every worker and facility is back in its pool.
    pub async fn wait_until_idle(&self, budget: Duration) -> bool {
        tokio::time::timeout(budget, async {
            while !self.counts().await.all_idle() {
                tokio::time::sleep(IDLE_POLL).await;
            }
        })
        .await
        .is_ok()
    }

    /// Identities of finished task sets, in completion order.
    pub async fn completed_task_sets(&self) -> Vec<TaskSetId> {
        self.finished.ids.lock().await.clone()
    }

    /// Stop every actor. Work in flight is dropped.
    pub async fn shutdown(mut self) {
        let actors = std::mem::take(&mut self.actors);
        for actor in &actors {
            actor.abort();
        }
        for actor in actors {
            let _ = actor.await;
        }
        tracing::info!(completed = self.completed(), "floor shut down");
    }
}

impl Drop for Floor {
    fn drop(&mut self) {
        for actor in &self.actors {
            actor.abort();
        }
    }
}
