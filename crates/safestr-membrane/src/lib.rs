//! Validation membrane for SafeStr.
//!
//! Sits between every bounded primitive and the buffers it touches:
//!
//! ```text
//! caller -> Preconditions (check) -> overflow guard (guard) -> algorithm -> StrResult
//! ```
//!
//! - **Error taxonomy** (`errno`): closed set of outcome codes
//! - **Precondition validator** (`check`): ordered, short-circuiting chain
//! - **Overflow guard** (`guard`): declared length vs. known capacity
//! - **Remediation policy** (`heal`): truncate-vs-reject for mutating ops
//! - **Constraint handler** (`constraint`): violation reporting
//! - **Configuration** (`config`): runtime mode and length ceilings

#![deny(unsafe_code)]

pub mod check;
pub mod config;
pub mod constraint;
pub mod errno;
pub mod guard;
pub mod heal;

pub use check::{CheckStage, Preconditions, check_slice};
pub use config::{Limits, RSIZE_MAX_MEM, RSIZE_MAX_STR, SafetyLevel, safety_level};
pub use constraint::{ConstraintHandler, ConstraintViolation, set_constraint_handler};
pub use errno::{StrError, StrResult, code_of};
pub use guard::{BOS_UNKNOWN, BoundFacts, DestSize};
pub use heal::{HealingAction, HealingPolicy, global_healing_policy};
