//! Station actor - one per facility, generic over the station type.
//!
//! # Flow
//! 1. Wait for a task on the assignment channel (`Idle`).
//! 2. Collect exactly `crew_size` arrivals (`AwaitingCrew`).
//! 3. Check the arrived roles against the descriptor; a mismatch is fatal.
//! 4. Do the work (`Working`), release every crew member, rejoin the pool.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::{FacilityId, FloorEvent, Role, StationDescriptor, StationType, Task, WorkerId};
use crate::error::FloorError;
use crate::pool::{Pooled, ResourcePool};
use crate::ports::{FaultHandler, InvariantViolation, Workload};

use super::context::EventBus;

/// A crew member announcing itself at a facility. The station fires `done`
/// once the work is finished.
#[derive(Debug)]
pub struct Arrival {
    pub worker: WorkerId,
    pub role: Role,
    pub done: oneshot::Sender<()>,
}

/// Cheap-to-clone address of one facility; this is what sits in the pool.
#[derive(Debug, Clone)]
pub struct FacilityHandle {
    id: FacilityId,
    station: StationType,
    assignments: mpsc::Sender<Arc<Task>>,
    arrivals: mpsc::Sender<Arrival>,
}

impl FacilityHandle {
    pub fn id(&self) -> FacilityId {
        self.id
    }

    pub fn station(&self) -> StationType {
        self.station
    }

    /// Hand the facility its next task.
    pub async fn assign(&self, task: Arc<Task>) -> Result<(), FloorError> {
        self.assignments
            .send(task)
            .await
            .map_err(|_| FloorError::ActorGone("station"))
    }

    /// Report presence; the returned receiver resolves when the work is done.
    pub async fn arrive(&self, worker: WorkerId, role: Role) -> Result<oneshot::Receiver<()>, FloorError> {
        let (done, finished) = oneshot::channel();
        self.arrivals
            .send(Arrival { worker, role, done })
            .await
            .map_err(|_| FloorError::ActorGone("station"))?;
        Ok(finished)
    }
}

impl Pooled for FacilityHandle {
    type Id = FacilityId;

    fn pool_id(&self) -> FacilityId {
        self.id
    }
}

pub struct StationActor {
    handle: FacilityHandle,
    descriptor: StationDescriptor,
    assignments: mpsc::Receiver<Arc<Task>>,
    arrivals: mpsc::Receiver<Arrival>,
    pool: Arc<ResourcePool<FacilityHandle>>,
    events: EventBus,
    workload: Arc<dyn Workload>,
    fault: Arc<dyn FaultHandler>,
}

impl StationActor {
    pub fn new(
        id: FacilityId,
        descriptor: StationDescriptor,
        pool: Arc<ResourcePool<FacilityHandle>>,
        events: EventBus,
        workload: Arc<dyn Workload>,
        fault: Arc<dyn FaultHandler>,
    ) -> (Self, FacilityHandle) {
        // One task at a time; every crew member can post without waiting.
        let (assign_tx, assign_rx) = mpsc::channel(1);
        let (arrive_tx, arrive_rx) = mpsc::channel(descriptor.crew_size().max(1));
        let handle = FacilityHandle {
            id,
            station: descriptor.station,
            assignments: assign_tx,
            arrivals: arrive_tx,
        };
        let actor = Self {
            handle: handle.clone(),
            descriptor,
            assignments: assign_rx,
            arrivals: arrive_rx,
            pool,
            events,
            workload,
            fault,
        };
        (actor, handle)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        while let Some(task) = self.assignments.recv().await {
            if let Err(err) = self.perform(task).await {
                tracing::debug!(facility = %self.handle.id, station = %self.descriptor.station, %err, "station stopping");
                break;
            }
        }
    }

    async fn perform(&mut self, task: Arc<Task>) -> Result<(), FloorError> {
        let station = self.descriptor.station;
        let facility = self.handle.id;
        let task_set = task.task_set();
        let index = task.index();

        tracing::debug!(%task_set, index, %station, %facility, description = task.description(), "task arrived at station");
        self.events.emit(FloorEvent::TaskAssigned {
            task_set,
            index,
            station,
            facility,
        });

        let crew_size = self.descriptor.crew_size();
        let mut crew = Vec::with_capacity(crew_size);
        while crew.len() < crew_size {
            let arrival = self
                .arrivals
                .recv()
                .await
                .ok_or(FloorError::ActorGone("arrival channel"))?;
            self.events.emit(FloorEvent::WorkerArrived {
                task_set,
                index,
                station,
                facility,
                worker: arrival.worker,
                role: arrival.role,
            });
            crew.push(arrival);
        }

        let roles: Vec<Role> = crew.iter().map(|arrival| arrival.role).collect();
        if !self.descriptor.accepts(&roles) {
            self.fault.invariant_violated(InvariantViolation::CrewMismatch {
                task_set,
                index,
                station,
                facility,
                expected: self.descriptor.crew.to_vec(),
                arrived: roles,
            });
        }
        self.events.emit(FloorEvent::CrewComplete {
            task_set,
            index,
            station,
            facility,
            roles,
        });

        self.workload
            .work(station, facility, self.descriptor.work_cost)
            .await;
        self.events.emit(FloorEvent::WorkFinished {
            task_set,
            index,
            station,
            facility,
        });

        for arrival in crew {
            // A worker that went away (shutdown) no longer cares.
            let _ = arrival.done.send(());
        }

        self.events.emit(FloorEvent::FacilityFreed {
            task_set,
            station,
            facility,
        });
        self.pool.release(self.handle.clone()).await;
        Ok(())
    }
}
