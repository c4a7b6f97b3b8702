//! EventSink implementations.

use std::sync::{Arc, Mutex};

use crate::domain::{EventRecord, FloorEvent, TaskSetId};
use crate::ports::EventSink;

/// Drops every event.
#[derive(Debug, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _record: &EventRecord) {}
}

/// Logs every event through `tracing` at INFO (rejections at WARN).
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, record: &EventRecord) {
        let task_set = record.event.task_set();
        match &record.event {
            FloorEvent::TaskSetRejected { reason, .. } => {
                tracing::warn!(%task_set, %reason, "task set rejected");
            }
            event => {
                tracing::info!(target: "shopfloor::progress", %task_set, at = %record.at, ?event);
            }
        }
    }
}

/// Keeps every event in emission order. Intended for tests and post-mortems.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    records: Mutex<Vec<EventRecord>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<FloorEvent> {
        self.records().into_iter().map(|record| record.event).collect()
    }

    /// Events of one task set, in emission order.
    pub fn events_for(&self, task_set: TaskSetId) -> Vec<FloorEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.task_set() == task_set)
            .collect()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, record: &EventRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

/// Forwards each event to several sinks, in order.
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutEventSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutEventSink {
    fn emit(&self, record: &EventRecord) {
        for sink in &self.sinks {
            sink.emit(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(task_set: u64) -> EventRecord {
        EventRecord {
            at: Utc::now(),
            event: FloorEvent::TaskSetCompleted {
                task_set: TaskSetId::new(task_set),
            },
        }
    }

    #[test]
    fn memory_sink_keeps_order_and_filters() {
        let sink = MemoryEventSink::new();
        sink.emit(&record(1));
        sink.emit(&record(2));
        sink.emit(&record(1));

        assert_eq!(sink.records().len(), 3);
        assert_eq!(sink.events_for(TaskSetId::new(1)).len(), 2);
        assert_eq!(sink.events()[1].task_set(), TaskSetId::new(2));
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let a = Arc::new(MemoryEventSink::new());
        let b = Arc::new(MemoryEventSink::new());
        let sinks: Vec<Arc<dyn EventSink>> = vec![a.clone(), b.clone(), Arc::new(NoopEventSink)];
        let fanout = FanoutEventSink::new(sinks);
        fanout.emit(&record(7));
        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events().len(), 1);
    }
}
