//! FaultHandler implementations.

use crate::ports::{FaultHandler, InvariantViolation};

/// Logs the violation and aborts the whole process.
#[derive(Debug, Default)]
pub struct AbortOnFault;

impl FaultHandler for AbortOnFault {
    fn invariant_violated(&self, violation: InvariantViolation) -> ! {
        tracing::error!(%violation, "invariant violated, aborting");
        std::process::abort()
    }
}

/// Panics the calling actor task instead of aborting.
///
/// Used by fault-injection tests, which observe the panic through the
/// actor's `JoinHandle`.
#[derive(Debug, Default)]
pub struct PanicOnFault;

impl FaultHandler for PanicOnFault {
    fn invariant_violated(&self, violation: InvariantViolation) -> ! {
        tracing::error!(%violation, "invariant violated");
        panic!("invariant violated: {violation}")
    }
}
