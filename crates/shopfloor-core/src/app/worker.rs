//! Worker actors.
//!
//! Every worker runs the same loop and takes one order at a time:
//! - `Route`: a transport worker carries a whole task set through its
//!   stations, in order, then reports it finished (routing agent).
//! - `Serve`: a crew member makes a single station visit (crew agent).
//!
//! Either way the worker walks back and rejoins its role pool at the end.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{FloorEvent, Role, Task, TaskSet, TaskSetId, WorkerId};
use crate::error::FloorError;
use crate::pool::Pooled;

use super::context::FloorContext;
use super::station::FacilityHandle;

#[derive(Debug)]
pub enum WorkerOrder {
    /// Carry `task_set`; its first task is already bound to `pickup`.
    Route {
        task_set: TaskSet,
        pickup: FacilityHandle,
    },
    /// Report to `facility` for one task.
    Serve {
        task: Arc<Task>,
        facility: FacilityHandle,
    },
}

#[derive(Debug, Clone)]
pub struct WorkerHandle {
    id: WorkerId,
    role: Role,
    inbox: mpsc::Sender<WorkerOrder>,
}

impl WorkerHandle {
    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub async fn send(&self, order: WorkerOrder) -> Result<(), FloorError> {
        self.inbox
            .send(order)
            .await
            .map_err(|_| FloorError::ActorGone("worker"))
    }
}

impl Pooled for WorkerHandle {
    type Id = WorkerId;

    fn pool_id(&self) -> WorkerId {
        self.id
    }
}

pub(crate) struct WorkerActor {
    handle: WorkerHandle,
    inbox: mpsc::Receiver<WorkerOrder>,
    ctx: Arc<FloorContext>,
}

impl WorkerActor {
    pub(crate) fn new(id: WorkerId, role: Role, ctx: Arc<FloorContext>) -> (Self, WorkerHandle) {
        // Exactly one active assignment per worker.
        let (tx, rx) = mpsc::channel(1);
        let handle = WorkerHandle { id, role, inbox: tx };
        let actor = Self {
            handle: handle.clone(),
            inbox: rx,
            ctx,
        };
        (actor, handle)
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        while let Some(order) = self.inbox.recv().await {
            let result = match order {
                WorkerOrder::Route { task_set, pickup } => self.route(task_set, pickup).await,
                WorkerOrder::Serve { task, facility } => self.serve(task, facility).await,
            };
            if let Err(err) = result {
                tracing::debug!(worker = %self.handle.id, role = %self.handle.role, %err, "worker stopping");
                break;
            }
        }
    }

    /// Routing agent: the only place where task order within a set is enforced.
    async fn route(&self, task_set: TaskSet, pickup: FacilityHandle) -> Result<(), FloorError> {
        let me = self.handle.id;
        tracing::debug!(task_set = %task_set.id, worker = %me, "task set picked up by transport worker");
        self.ctx.events.emit(FloorEvent::TaskSetAssigned {
            task_set: task_set.id,
            worker: me,
        });

        if let Some((first, rest)) = task_set.tasks.split_first() {
            self.visit(first, &pickup).await?;
            for task in rest {
                self.ctx.events.emit(FloorEvent::DispatchRequested {
                    task_set: task_set.id,
                    index: task.index(),
                    station: task.station(),
                });
                let facility = self
                    .ctx
                    .dispatcher(task.station())
                    .request(Arc::clone(task), me)
                    .await?;
                tracing::debug!(
                    task_set = %task_set.id,
                    worker = %me,
                    station = %facility.station(),
                    facility = %facility.id(),
                    "next facility"
                );
                self.visit(task, &facility).await?;
            }
        }

        let id = task_set.id;
        self.ctx.tracker.report(task_set).await?;
        self.return_to_pool(id).await;
        Ok(())
    }

    /// Go to the facility, wait for the work, mark the task done.
    async fn visit(&self, task: &Task, facility: &FacilityHandle) -> Result<(), FloorError> {
        self.ctx.workload.commute(self.handle.role, self.handle.id).await;
        let done = facility.arrive(self.handle.id, self.handle.role).await?;
        done.await.map_err(|_| FloorError::ActorGone("station"))?;
        task.mark_completed();
        self.ctx.events.emit(FloorEvent::TaskCompleted {
            task_set: task.task_set(),
            index: task.index(),
            station: task.station(),
        });
        Ok(())
    }

    /// Crew agent: one visit, then home.
    async fn serve(&self, task: Arc<Task>, facility: FacilityHandle) -> Result<(), FloorError> {
        tracing::debug!(
            task_set = %task.task_set(),
            index = task.index(),
            worker = %self.handle.id,
            role = %self.handle.role,
            description = task.description(),
            "crew member dispatched"
        );
        self.ctx.workload.commute(self.handle.role, self.handle.id).await;
        let done = facility.arrive(self.handle.id, self.handle.role).await?;
        done.await.map_err(|_| FloorError::ActorGone("station"))?;
        self.return_to_pool(task.task_set()).await;
        Ok(())
    }

    async fn return_to_pool(&self, task_set: TaskSetId) {
        self.ctx.workload.commute(self.handle.role, self.handle.id).await;
        self.ctx.events.emit(FloorEvent::WorkerFreed {
            task_set,
            worker: self.handle.id,
            role: self.handle.role,
        });
        self.ctx
            .worker_pool(self.handle.role)
            .release(self.handle.clone())
            .await;
    }
}
