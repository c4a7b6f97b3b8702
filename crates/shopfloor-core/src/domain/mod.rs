//! Domain model: ids, station types and roles, tasks, states, events.

pub mod events;
pub mod ids;
pub mod state;
pub mod station;
pub mod task;

pub use self::events::{EventRecord, FloorEvent};
pub use self::ids::{FacilityId, TaskSetId, WorkerId};
pub use self::state::TaskState;
pub use self::station::{Role, StationDescriptor, StationType, UnknownStation};
pub use self::task::{StepSpec, Task, TaskSet, TaskSetSpec};
