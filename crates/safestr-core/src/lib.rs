//! # safestr-core
//!
//! Bounded string and memory primitives operating on slices.
//!
//! Every primitive takes an explicit maximum length for the buffer it
//! touches, validates its arguments through the membrane before any access,
//! and reports the outcome as a [`StrResult`]. The slice length is the known
//! capacity of the buffer, so a declared maximum can never carry a read or
//! write past the end of the allocation. No primitive allocates.

#![deny(unsafe_code)]

pub mod mem;
pub mod string;
pub mod time;

pub use mem::{memcmp_s, memcpy_s, memcpy_s_with_level, memset_s};
pub use time::ctime_s;

pub use safestr_membrane::{SafetyLevel, StrError, StrResult};
