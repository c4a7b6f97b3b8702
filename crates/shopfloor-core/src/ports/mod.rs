//! Ports - traits at the seams of the orchestration core.
//!
//! Everything the protocol needs from the outside world (time, progress
//! reporting, the opaque work/travel delays, fault escalation) goes through
//! one of these, so tests can swap in deterministic versions.

pub mod clock;
pub mod event_sink;
pub mod fault;
pub mod workload;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::fault::{FaultHandler, InvariantViolation};
pub use self::workload::Workload;
