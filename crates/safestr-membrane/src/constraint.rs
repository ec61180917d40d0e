//! Runtime-constraint handler.
//!
//! Every constraint violation detected by a primitive is reported here
//! exactly once before the error is returned: it is counted, then handed to
//! the installed handler. The default handler ignores the report, so the
//! returned error code stays the only observable effect.
//!
//! Search outcomes (`NotFound`, `NoDifference`) are not violations and are
//! never reported.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, const_rwlock};

use crate::errno::StrError;

/// A single constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Primitive that detected the violation (`strcpy_s`, ...).
    pub op: &'static str,
    /// Short description of the violated constraint.
    pub detail: &'static str,
    /// Code returned to the caller.
    pub error: StrError,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.detail)
    }
}

/// Handler signature.
pub type ConstraintHandler = fn(&ConstraintViolation);

/// Default handler: does nothing.
pub fn ignore_handler(_violation: &ConstraintViolation) {}

/// Prints the violation to stderr and aborts the process.
pub fn abort_handler(violation: &ConstraintViolation) {
    eprintln!(
        "safestr: runtime constraint violation: {violation} ({})",
        violation.error.name()
    );
    std::process::abort();
}

static HANDLER: RwLock<ConstraintHandler> = const_rwlock(ignore_handler as ConstraintHandler);

/// Install `handler` (or the default when `None`) and return the previous one.
pub fn set_constraint_handler(handler: Option<ConstraintHandler>) -> ConstraintHandler {
    let mut slot = HANDLER.write();
    std::mem::replace(&mut *slot, handler.unwrap_or(ignore_handler))
}

/// Per-code violation counters.
pub struct ViolationCounters {
    pub total: AtomicU64,
    pub null_pointer: AtomicU64,
    pub zero_length: AtomicU64,
    pub length_too_large: AtomicU64,
    pub destination_overflow: AtomicU64,
    pub no_space: AtomicU64,
    /// Every other code (`ESLEMIN`, `ESOVRLP`, `ESUNTERM`).
    pub other: AtomicU64,
}

impl ViolationCounters {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            null_pointer: AtomicU64::new(0),
            zero_length: AtomicU64::new(0),
            length_too_large: AtomicU64::new(0),
            destination_overflow: AtomicU64::new(0),
            no_space: AtomicU64::new(0),
            other: AtomicU64::new(0),
        }
    }

    pub fn record(&self, error: StrError) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            StrError::NullPointer => &self.null_pointer,
            StrError::ZeroLength => &self.zero_length,
            StrError::LengthTooLarge => &self.length_too_large,
            StrError::DestinationOverflow => &self.destination_overflow,
            StrError::NoSpace => &self.no_space,
            _ => &self.other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for ViolationCounters {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_COUNTERS: ViolationCounters = ViolationCounters::new();

/// Process-wide violation counters.
#[must_use]
pub fn global_violation_counters() -> &'static ViolationCounters {
    &GLOBAL_COUNTERS
}

/// Report a violation and hand back its error for `Err(..)` construction.
pub fn report(op: &'static str, detail: &'static str, error: StrError) -> StrError {
    if error.is_outcome() {
        return error;
    }
    GLOBAL_COUNTERS.record(error);
    let handler = *HANDLER.read();
    handler(&ConstraintViolation { op, detail, error });
    error
}
