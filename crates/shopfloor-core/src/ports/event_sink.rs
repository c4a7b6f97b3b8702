//! EventSink port - where progress events go.

use crate::domain::EventRecord;

/// EventSink records progress events.
///
/// `emit` is called from inside actors on every protocol transition, so it
/// must not block; implementations buffer or log and return.
pub trait EventSink: Send + Sync {
    fn emit(&self, record: &EventRecord);
}
