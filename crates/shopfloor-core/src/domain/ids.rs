//! Domain identifiers (strongly-typed IDs).
//!
//! Workers, facilities and task sets are all numbered with plain integers,
//! but they must never be mixed up. `Id<T>` carries a zero-sized marker type
//! so that a `WorkerId` and a `FacilityId` are distinct at compile time while
//! sharing one implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Marker trait for each id kind. Provides the prefix used by `Display`.
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic id over a marker type.
///
/// ```ignore
/// let worker = WorkerId::new(0);
/// let facility = FacilityId::new(0);
/// // worker == facility  <- does not compile
/// ```
#[repr(transparent)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: u64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }
}

// Manual impls: deriving would put the bounds on `T`, and the marker types
// are uninhabited enums that never need them.
impl<T: IdMarker> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: IdMarker> Copy for Id<T> {}

impl<T: IdMarker> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: IdMarker> Eq for Id<T> {}

impl<T: IdMarker> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdMarker> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: IdMarker> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: IdMarker> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

// ========================================
// Marker types
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Worker {}

impl IdMarker for Worker {
    fn prefix() -> &'static str {
        "worker-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facility {}

impl IdMarker for Facility {
    fn prefix() -> &'static str {
        "facility-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskSet {}

impl IdMarker for TaskSet {
    fn prefix() -> &'static str {
        "taskset-"
    }
}

/// Identifier of a worker, unique within its role.
pub type WorkerId = Id<Worker>;

/// Identifier of a facility, unique within its station type.
pub type FacilityId = Id<Facility>;

/// Identifier of a submitted task set (chosen by the submitter).
pub type TaskSetId = Id<TaskSet>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_kind_prefix() {
        assert_eq!(WorkerId::new(3).to_string(), "worker-3");
        assert_eq!(FacilityId::new(0).to_string(), "facility-0");
        assert_eq!(TaskSetId::new(42).to_string(), "taskset-42");
    }

    #[test]
    fn ids_order_by_value() {
        let mut ids = vec![TaskSetId::new(3), TaskSetId::new(1), TaskSetId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![TaskSetId::new(1), TaskSetId::new(2), TaskSetId::new(3)]);
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let id = TaskSetId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: TaskSetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<WorkerId>(), size_of::<u64>());
        assert_eq!(size_of::<FacilityId>(), size_of::<u64>());
    }
}
