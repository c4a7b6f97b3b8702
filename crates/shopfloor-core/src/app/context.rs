//! FloorContext - the one object that owns every pool and shared handle.
//!
//! Built once at boot and handed to each actor as an `Arc`. There is no
//! global state anywhere else.

use std::sync::Arc;

use crate::domain::{EventRecord, FloorEvent, Role, StationType};
use crate::pool::ResourcePool;
use crate::ports::{Clock, EventSink, FaultHandler, InvariantViolation, Workload};

use super::dispatcher::DispatcherHandle;
use super::intake::TrackerHandle;
use super::station::FacilityHandle;
use super::worker::WorkerHandle;

/// Stamps events with the clock and hands them to the sink.
#[derive(Clone)]
pub struct EventBus {
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl EventBus {
    pub fn new(sink: Arc<dyn EventSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    pub fn emit(&self, event: FloorEvent) {
        let record = EventRecord {
            at: self.clock.now(),
            event,
        };
        self.sink.emit(&record);
    }
}

pub(crate) struct FloorContext {
    pub(crate) facility_pools: [Arc<ResourcePool<FacilityHandle>>; StationType::ALL.len()],
    pub(crate) worker_pools: [Arc<ResourcePool<WorkerHandle>>; Role::ALL.len()],
    pub(crate) dispatchers: [DispatcherHandle; StationType::ALL.len()],
    pub(crate) tracker: TrackerHandle,
    pub(crate) events: EventBus,
    pub(crate) workload: Arc<dyn Workload>,
    pub(crate) fault: Arc<dyn FaultHandler>,
}

impl FloorContext {
    pub(crate) fn facility_pool(&self, station: StationType) -> &Arc<ResourcePool<FacilityHandle>> {
        &self.facility_pools[station as usize]
    }

    pub(crate) fn worker_pool(&self, role: Role) -> &Arc<ResourcePool<WorkerHandle>> {
        &self.worker_pools[role as usize]
    }

    pub(crate) fn dispatcher(&self, station: StationType) -> &DispatcherHandle {
        &self.dispatchers[station as usize]
    }

    pub(crate) fn fault(&self, violation: impl Into<InvariantViolation>) -> ! {
        self.fault.invariant_violated(violation.into())
    }
}
