//! Impls - in-process implementations of the ports.

pub mod event_sinks;
pub mod fault;
pub mod workload;

pub use self::event_sinks::{FanoutEventSink, MemoryEventSink, NoopEventSink, TracingEventSink};
pub use self::fault::{AbortOnFault, PanicOnFault};
pub use self::workload::{InstantWorkload, SleepWorkload};
