//! FloorBuilder - wiring of every pool and actor.
//!
//! Capacity is fixed here and never changes afterwards. Booting fails fast
//! when there is no tokio runtime to spawn actors on.
//!
//! ```ignore
//! let floor = FloorBuilder::from_config(FloorConfig::default())
//!     .event_sink(Arc::new(MemoryEventSink::new()))
//!     .boot()
//!     .await?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{FloorConfig, Timings};
use crate::domain::{FacilityId, Role, StationType, WorkerId};
use crate::error::BuildError;
use crate::impls::{AbortOnFault, SleepWorkload, TracingEventSink};
use crate::pool::ResourcePool;
use crate::ports::{Clock, EventSink, FaultHandler, SystemClock, Workload};

use super::context::{EventBus, FloorContext};
use super::dispatcher::{Dispatcher, DispatcherHandle};
use super::floor::Floor;
use super::intake::{Intake, IntakeHandle, Tracker, TrackerHandle};
use super::station::StationActor;
use super::worker::WorkerActor;

pub struct FloorBuilder {
    facilities: BTreeMap<StationType, usize>,
    workers: BTreeMap<Role, usize>,
    timings: Timings,
    sink: Option<Arc<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
    workload: Option<Arc<dyn Workload>>,
    fault: Option<Arc<dyn FaultHandler>>,
}

impl FloorBuilder {
    /// An empty floor with default timings; add capacity with
    /// [`facilities`](Self::facilities) and [`workers`](Self::workers).
    pub fn new() -> Self {
        Self::from_config(FloorConfig::empty())
    }

    pub fn from_config(config: FloorConfig) -> Self {
        Self {
            facilities: config.facilities,
            workers: config.workers,
            timings: config.timings,
            sink: None,
            clock: None,
            workload: None,
            fault: None,
        }
    }

    pub fn facilities(mut self, station: StationType, count: usize) -> Self {
        self.facilities.insert(station, count);
        self
    }

    pub fn workers(mut self, role: Role, count: usize) -> Self {
        self.workers.insert(role, count);
        self
    }

    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Defaults to [`TracingEventSink`].
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to [`SleepWorkload`] with the configured commute time.
    pub fn workload(mut self, workload: Arc<dyn Workload>) -> Self {
        self.workload = Some(workload);
        self
    }

    /// Defaults to [`AbortOnFault`].
    pub fn fault_handler(mut self, fault: Arc<dyn FaultHandler>) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Spawn every actor and fill the pools.
    pub async fn boot(self) -> Result<Floor, BuildError> {
        tokio::runtime::Handle::try_current().map_err(|_| BuildError::NoRuntime)?;

        let facilities_of = |station: StationType| self.facilities.get(&station).copied().unwrap_or(0);
        let workers_of = |role: Role| self.workers.get(&role).copied().unwrap_or(0);

        let events = EventBus::new(
            self.sink.clone().unwrap_or_else(|| Arc::new(TracingEventSink)),
            self.clock.clone().unwrap_or_else(|| Arc::new(SystemClock)),
        );
        let workload = self
            .workload
            .clone()
            .unwrap_or_else(|| Arc::new(SleepWorkload::new(self.timings.commute())));
        let fault = self.fault.clone().unwrap_or_else(|| Arc::new(AbortOnFault));

        let facility_pools = std::array::from_fn(|slot| {
            let station = StationType::ALL[slot];
            Arc::new(ResourcePool::new(station.as_str(), facilities_of(station)))
        });
        let worker_pools = std::array::from_fn(|slot| {
            let role = Role::ALL[slot];
            Arc::new(ResourcePool::new(role.as_str(), workers_of(role)))
        });
        let mut requests = Vec::with_capacity(StationType::ALL.len());
        let dispatchers = std::array::from_fn(|slot| {
            let (handle, rx) = DispatcherHandle::channel(StationType::ALL[slot]);
            requests.push(rx);
            handle
        });
        let (tracker, reports) = TrackerHandle::channel();
        let (intake, queue) = IntakeHandle::channel();

        let ctx = Arc::new(FloorContext {
            facility_pools,
            worker_pools,
            dispatchers,
            tracker,
            events: events.clone(),
            workload: Arc::clone(&workload),
            fault: Arc::clone(&fault),
        });

        let mut actors = Vec::new();
        for (station, requests) in StationType::ALL.into_iter().zip(requests) {
            let dispatcher = Dispatcher::new(self.timings.descriptor(station), requests, Arc::clone(&ctx));
            actors.push(dispatcher.spawn());
        }
        let (tracker, finished) = Tracker::new(reports, events.clone());
        actors.push(tracker.spawn());
        actors.push(Intake::new(queue, Arc::clone(&ctx)).spawn());

        let mut next_facility = 0;
        for station in StationType::ALL {
            let pool = ctx.facility_pool(station);
            let descriptor = self.timings.descriptor(station);
            for _ in 0..pool.capacity() {
                let (actor, handle) = StationActor::new(
                    FacilityId::new(next_facility),
                    descriptor.clone(),
                    Arc::clone(pool),
                    events.clone(),
                    Arc::clone(&workload),
                    Arc::clone(&fault),
                );
                next_facility += 1;
                actors.push(actor.spawn());
                pool.release(handle).await;
            }
            tracing::info!(
                %station,
                facilities = pool.capacity(),
                work_ms = descriptor.work_cost.as_millis() as u64,
                "facilities ready"
            );
        }

        let mut next_worker = 0;
        for role in Role::ALL {
            let pool = ctx.worker_pool(role);
            for _ in 0..pool.capacity() {
                let (actor, handle) = WorkerActor::new(WorkerId::new(next_worker), role, Arc::clone(&ctx));
                next_worker += 1;
                actors.push(actor.spawn());
                pool.release(handle).await;
            }
            tracing::info!(%role, workers = pool.capacity(), "workers ready");
        }

        tracing::info!(
            facilities = next_facility,
            workers = next_worker,
            commute_ms = self.timings.commute_ms,
            "floor booted"
        );
        Ok(Floor::new(ctx, intake, finished, actors))
    }
}

impl Default for FloorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{InstantWorkload, NoopEventSink};

    #[test]
    fn boot_without_runtime_fails() {
        let boot = FloorBuilder::new().boot();
        // Drive the future by hand on a plain thread: no tokio context.
        let result = block_on_without_runtime(boot);
        assert!(matches!(result, Err(BuildError::NoRuntime)));
    }

    fn block_on_without_runtime<F: std::future::Future>(future: F) -> F::Output {
        use std::pin::pin;
        use std::task::{Context, Poll, Waker};

        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    #[tokio::test]
    async fn boot_fills_every_pool() {
        let floor = FloorBuilder::new()
            .facilities(StationType::Pickup, 1)
            .facilities(StationType::Welding, 3)
            .workers(Role::Transport, 2)
            .workload(Arc::new(InstantWorkload))
            .event_sink(Arc::new(NoopEventSink))
            .boot()
            .await
            .unwrap();

        let counts = floor.counts().await;
        assert_eq!(counts.facilities[&StationType::Welding].idle, 3);
        assert_eq!(counts.facilities[&StationType::Painting].total, 0);
        assert_eq!(counts.workers[&Role::Transport].total, 2);
        assert_eq!(counts.total_facilities(), 4);
        assert!(counts.all_idle());
        assert_eq!(counts.completed_task_sets, 0);
        floor.shutdown().await;
    }
}
