//! Dispatcher - one sequential actor per station type.
//!
//! # Flow (per request, never interleaved with another request of the same type)
//! 1. Acquire a facility of this type and bind it to the task.
//! 2. Tell the routing worker where to go.
//! 3. Acquire the whole non-transport crew and bind it to the task.
//! 4. Send each crew member to the facility.
//!
//! Because one actor holds every partial allocation for its type while it
//! waits, no two tasks can each hold half a welding crew and starve each
//! other. Dispatchers of different types run concurrently.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::{FloorEvent, StationDescriptor, StationType, Task, WorkerId};
use crate::error::FloorError;

use super::context::FloorContext;
use super::station::FacilityHandle;
use super::worker::WorkerOrder;

const REQUEST_QUEUE: usize = 64;

/// One assignment request from a routing worker.
#[derive(Debug)]
pub struct AssignmentRequest {
    pub task: Arc<Task>,
    pub transporter: WorkerId,
    pub reply: oneshot::Sender<FacilityHandle>,
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    station: StationType,
    tx: mpsc::Sender<AssignmentRequest>,
}

impl DispatcherHandle {
    pub fn channel(station: StationType) -> (Self, mpsc::Receiver<AssignmentRequest>) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        (Self { station, tx }, rx)
    }

    pub fn station(&self) -> StationType {
        self.station
    }

    /// Ask for the task's facility; resolves once one is bound.
    pub async fn request(&self, task: Arc<Task>, transporter: WorkerId) -> Result<FacilityHandle, FloorError> {
        let (reply, bound) = oneshot::channel();
        self.tx
            .send(AssignmentRequest {
                task,
                transporter,
                reply,
            })
            .await
            .map_err(|_| FloorError::ActorGone("dispatcher"))?;
        bound.await.map_err(|_| FloorError::ActorGone("dispatcher"))
    }
}

pub(crate) struct Dispatcher {
    descriptor: StationDescriptor,
    requests: mpsc::Receiver<AssignmentRequest>,
    ctx: Arc<FloorContext>,
}

impl Dispatcher {
    pub(crate) fn new(
        descriptor: StationDescriptor,
        requests: mpsc::Receiver<AssignmentRequest>,
        ctx: Arc<FloorContext>,
    ) -> Self {
        Self {
            descriptor,
            requests,
            ctx,
        }
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            if let Err(err) = self.assign(request).await {
                tracing::debug!(station = %self.descriptor.station, %err, "dispatcher stopping");
                break;
            }
        }
    }

    async fn assign(&self, request: AssignmentRequest) -> Result<(), FloorError> {
        let AssignmentRequest {
            task,
            transporter,
            reply,
        } = request;
        let station = self.descriptor.station;

        // 1. facility
        let facility = self.ctx.facility_pool(station).acquire().await;
        if let Err(err) = task.bind_facility(facility.id()) {
            self.ctx.fault(err);
        }
        facility.assign(Arc::clone(&task)).await?;

        // 2. routing worker, strictly after the binding above
        tracing::debug!(
            task_set = %task.task_set(),
            index = task.index(),
            %station,
            facility = %facility.id(),
            %transporter,
            "facility bound"
        );
        reply
            .send(facility.clone())
            .map_err(|_| FloorError::ActorGone("routing worker"))?;

        // 3. crew
        let mut crew = Vec::with_capacity(self.descriptor.crew_size());
        for (role, count) in self.descriptor.non_transport_crew() {
            let pool = self.ctx.worker_pool(role);
            for _ in 0..count {
                crew.push(pool.acquire().await);
            }
        }
        if let Err(err) = task.bind_crew(crew.iter().map(|worker| worker.id()).collect()) {
            self.ctx.fault(err);
        }

        // 4. dispatch
        for worker in crew {
            self.ctx.events.emit(FloorEvent::CrewDispatched {
                task_set: task.task_set(),
                index: task.index(),
                facility: facility.id(),
                worker: worker.id(),
                role: worker.role(),
            });
            worker
                .send(WorkerOrder::Serve {
                    task: Arc::clone(&task),
                    facility: facility.clone(),
                })
                .await?;
        }
        Ok(())
    }
}
