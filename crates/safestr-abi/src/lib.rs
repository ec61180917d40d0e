// All extern "C" exports accept raw pointers from C callers; the membrane
// validates at runtime, so per-function safety docs would be boilerplate.
#![allow(clippy::missing_safety_doc)]
//! # safestr-abi
//!
//! `extern "C"` boundary for the SafeStr primitives.
//!
//! ```text
//! C caller -> ABI entry (this crate) -> Preconditions + overflow guard -> core kernel -> errno_t
//! ```
//!
//! This is the only layer that sees raw pointers, so it owns the checks that
//! only make sense there: null references, clearing of output references,
//! overlap between source and destination, and the unknown-size branch of
//! the overflow guard. Source strings are scanned byte-by-byte up to the
//! validated bound before a slice is formed over them; for destinations the
//! caller-declared `dmax` bytes are trusted once the guard has passed.

pub mod constraint_abi;
pub mod string_abi;
pub mod util;

/// Status code returned by every `*_s` function.
#[allow(non_camel_case_types)]
pub type errno_t = std::ffi::c_int;

/// Size type for declared maximum lengths.
#[allow(non_camel_case_types)]
pub type rsize_t = usize;
