//! App - the actor layer.
//!
//! # Components
//! - **FloorBuilder**: sizes the pools and spawns every actor
//! - **Floor**: submission, completion counter, snapshots, shutdown
//! - **Intake / Tracker**: admission of task sets and the completion counter
//! - **Dispatcher**: one per station type, binds facilities and crews
//! - **StationActor**: one per facility, the crew rendezvous
//! - **WorkerActor**: routing agent (transport) or crew agent (other roles)

pub mod builder;
pub mod context;
pub mod dispatcher;
pub mod floor;
pub mod intake;
pub mod station;
pub mod worker;

pub use self::builder::FloorBuilder;
pub use self::context::EventBus;
pub use self::dispatcher::{AssignmentRequest, DispatcherHandle};
pub use self::floor::Floor;
pub use self::intake::{IntakeHandle, TrackerHandle};
pub use self::station::{Arrival, FacilityHandle, StationActor};
pub use self::worker::{WorkerHandle, WorkerOrder};
