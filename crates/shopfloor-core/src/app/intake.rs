//! Intake and tracker.
//!
//! Intake admits task sets one at a time: it binds the first task to a
//! pickup facility, hands the set to an idle transport worker and moves on.
//! The tracker receives finished sets back from their routing workers and
//! keeps the completion counter.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::domain::{FloorEvent, Role, StationType, TaskSet, TaskSetId};
use crate::error::FloorError;

use super::context::{EventBus, FloorContext};
use super::worker::WorkerOrder;

const INTAKE_QUEUE: usize = 64;
const TRACKER_QUEUE: usize = 64;

#[derive(Debug, Clone)]
pub struct IntakeHandle {
    tx: mpsc::Sender<TaskSet>,
}

impl IntakeHandle {
    pub fn channel() -> (Self, mpsc::Receiver<TaskSet>) {
        let (tx, rx) = mpsc::channel(INTAKE_QUEUE);
        (Self { tx }, rx)
    }

    pub async fn admit(&self, task_set: TaskSet) -> Result<(), FloorError> {
        self.tx
            .send(task_set)
            .await
            .map_err(|_| FloorError::ActorGone("intake"))
    }
}

pub(crate) struct Intake {
    queue: mpsc::Receiver<TaskSet>,
    ctx: Arc<FloorContext>,
}

impl Intake {
    pub(crate) fn new(queue: mpsc::Receiver<TaskSet>, ctx: Arc<FloorContext>) -> Self {
        Self { queue, ctx }
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        while let Some(task_set) = self.queue.recv().await {
            if let Err(err) = self.admit(task_set).await {
                tracing::debug!(%err, "intake stopping");
                break;
            }
        }
    }

    async fn admit(&self, task_set: TaskSet) -> Result<(), FloorError> {
        let Some(first) = task_set.tasks.first().cloned() else {
            // Submission rejects empty sets before they get here.
            return Ok(());
        };
        self.ctx.events.emit(FloorEvent::TaskSetAdmitted {
            task_set: task_set.id,
            tasks: task_set.tasks.len(),
        });

        let pickup = self.ctx.facility_pool(StationType::Pickup).acquire().await;
        if let Err(err) = first.bind_facility(pickup.id()) {
            self.ctx.fault(err);
        }
        pickup.assign(first).await?;

        let worker = self.ctx.worker_pool(Role::Transport).acquire().await;
        for task in &task_set.tasks {
            if let Err(err) = task.bind_transporter(worker.id()) {
                self.ctx.fault(err);
            }
        }
        tracing::info!(
            task_set = %task_set.id,
            tasks = task_set.tasks.len(),
            pickup = %pickup.id(),
            worker = %worker.id(),
            "task set admitted"
        );
        worker.send(WorkerOrder::Route { task_set, pickup }).await
    }
}

/// Shared view of the tracker's results.
#[derive(Debug)]
pub(crate) struct Finished {
    pub(crate) ids: Mutex<Vec<TaskSetId>>,
    pub(crate) count: watch::Receiver<u64>,
}

#[derive(Debug, Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<TaskSet>,
}

impl TrackerHandle {
    pub fn channel() -> (Self, mpsc::Receiver<TaskSet>) {
        let (tx, rx) = mpsc::channel(TRACKER_QUEUE);
        (Self { tx }, rx)
    }

    /// Hand a fully performed task set back.
    pub async fn report(&self, task_set: TaskSet) -> Result<(), FloorError> {
        self.tx
            .send(task_set)
            .await
            .map_err(|_| FloorError::ActorGone("tracker"))
    }
}

pub(crate) struct Tracker {
    reports: mpsc::Receiver<TaskSet>,
    finished: Arc<Finished>,
    counter: watch::Sender<u64>,
    events: EventBus,
}

impl Tracker {
    pub(crate) fn new(reports: mpsc::Receiver<TaskSet>, events: EventBus) -> (Self, Arc<Finished>) {
        let (counter, count) = watch::channel(0);
        let finished = Arc::new(Finished {
            ids: Mutex::new(Vec::new()),
            count,
        });
        let tracker = Self {
            reports,
            finished: Arc::clone(&finished),
            counter,
            events,
        };
        (tracker, finished)
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        while let Some(task_set) = self.reports.recv().await {
            debug_assert!(
                task_set.is_complete(),
                "{} reported with unfinished tasks",
                task_set.id
            );
            self.finished.ids.lock().await.push(task_set.id);
            self.events.emit(FloorEvent::TaskSetCompleted {
                task_set: task_set.id,
            });
            self.counter.send_modify(|count| *count += 1);
            let total = *self.counter.borrow();
            tracing::info!(task_set = %task_set.id, total, "task set completed");
        }
    }
}
