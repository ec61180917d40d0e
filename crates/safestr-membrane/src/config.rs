//! Runtime mode configuration and length ceilings.
//!
//! The runtime mode is set via the `SAFESTR_MODE` environment variable:
//! - `strict` (default): a source that does not fit its destination is
//!   rejected with `ESNOSPC` and the destination is cleared to an empty string.
//! - `hardened`: the same condition is repaired by truncating and
//!   NUL-terminating; the call succeeds and the truncation is counted.
//!
//! Precondition failures (null, zero length, ceiling, destination overflow)
//! are reported identically in both modes.

use std::sync::atomic::{AtomicU8, Ordering};

/// Ceiling for any single string operation (4 MiB).
pub const RSIZE_MAX_STR: usize = 4 << 10 << 10;
/// Ceiling for any single memory operation (256 MiB).
pub const RSIZE_MAX_MEM: usize = 256 << 20;
/// Longest delimiter set accepted by `strtok_s`.
pub const STRTOK_DELIM_MAX_LEN: usize = 16;

/// Which ceiling a primitive is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limits {
    /// `RSIZE_MAX_STR`.
    Str,
    /// `RSIZE_MAX_MEM`.
    Mem,
}

impl Limits {
    #[must_use]
    pub const fn ceiling(self) -> usize {
        match self {
            Self::Str => RSIZE_MAX_STR,
            Self::Mem => RSIZE_MAX_MEM,
        }
    }
}

/// Runtime operating mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Reject sources that do not fit.
    #[default]
    Strict,
    /// Truncate sources that do not fit.
    Hardened,
}

impl SafetyLevel {
    /// Parse from string (case-insensitive). Unknown values fall back to strict.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardened" | "repair" | "truncate" => Self::Hardened,
            _ => Self::Strict,
        }
    }

    /// Returns true if oversized copies are truncated instead of rejected.
    #[must_use]
    pub const fn truncates(self) -> bool {
        matches!(self, Self::Hardened)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
        }
    }
}

// Atomic cache: 0=unresolved, 1=Strict, 2=Hardened, 255=resolving.
static CACHED_LEVEL: AtomicU8 = AtomicU8::new(0);

const LEVEL_UNRESOLVED: u8 = 0;
const LEVEL_STRICT: u8 = 1;
const LEVEL_HARDENED: u8 = 2;
const LEVEL_RESOLVING: u8 = 255;

fn level_to_u8(level: SafetyLevel) -> u8 {
    match level {
        SafetyLevel::Strict => LEVEL_STRICT,
        SafetyLevel::Hardened => LEVEL_HARDENED,
    }
}

fn u8_to_level(v: u8) -> SafetyLevel {
    match v {
        LEVEL_HARDENED => SafetyLevel::Hardened,
        _ => SafetyLevel::Strict,
    }
}

/// Get the configured safety level (reads `SAFESTR_MODE` on first call,
/// caches thereafter).
///
/// A call that arrives while another caller is resolving the variable sees
/// `Strict` rather than blocking.
#[must_use]
pub fn safety_level() -> SafetyLevel {
    let cached = CACHED_LEVEL.load(Ordering::Relaxed);

    if cached != LEVEL_UNRESOLVED && cached != LEVEL_RESOLVING {
        return u8_to_level(cached);
    }
    if cached == LEVEL_RESOLVING {
        return SafetyLevel::Strict;
    }

    if CACHED_LEVEL
        .compare_exchange(
            LEVEL_UNRESOLVED,
            LEVEL_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_LEVEL.load(Ordering::Relaxed);
        return if v != LEVEL_UNRESOLVED && v != LEVEL_RESOLVING {
            u8_to_level(v)
        } else {
            SafetyLevel::Strict
        };
    }

    let level = std::env::var("SAFESTR_MODE")
        .map(|v| SafetyLevel::from_str_loose(&v))
        .unwrap_or_default();
    CACHED_LEVEL.store(level_to_u8(level), Ordering::Release);
    level
}

/// Override the cached level for the rest of the process.
///
/// Intended for embedders that configure the library programmatically
/// instead of through the environment.
pub fn set_safety_level(level: SafetyLevel) {
    CACHED_LEVEL.store(level_to_u8(level), Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_safety_levels() {
        assert_eq!(SafetyLevel::from_str_loose("strict"), SafetyLevel::Strict);
        assert_eq!(SafetyLevel::from_str_loose("STRICT"), SafetyLevel::Strict);
        assert_eq!(
            SafetyLevel::from_str_loose("hardened"),
            SafetyLevel::Hardened
        );
        assert_eq!(SafetyLevel::from_str_loose(" Repair "), SafetyLevel::Hardened);
        assert_eq!(
            SafetyLevel::from_str_loose("truncate"),
            SafetyLevel::Hardened
        );
        assert_eq!(SafetyLevel::from_str_loose("bogus"), SafetyLevel::Strict);
        assert_eq!(SafetyLevel::from_str_loose(""), SafetyLevel::Strict);
    }

    #[test]
    fn default_is_strict() {
        assert_eq!(SafetyLevel::default(), SafetyLevel::Strict);
        assert!(!SafetyLevel::Strict.truncates());
        assert!(SafetyLevel::Hardened.truncates());
    }

    #[test]
    fn ceilings_match_safe_c_library() {
        assert_eq!(RSIZE_MAX_STR, 4 * 1024 * 1024);
        assert_eq!(RSIZE_MAX_MEM, 256 * 1024 * 1024);
        assert_eq!(Limits::Str.ceiling(), RSIZE_MAX_STR);
        assert_eq!(Limits::Mem.ceiling(), RSIZE_MAX_MEM);
    }

    #[test]
    fn cached_mode_is_process_sticky_until_cache_reset() {
        let previous = CACHED_LEVEL.swap(LEVEL_STRICT, Ordering::SeqCst);
        assert_eq!(safety_level(), SafetyLevel::Strict);

        CACHED_LEVEL.store(LEVEL_HARDENED, Ordering::SeqCst);
        assert_eq!(safety_level(), SafetyLevel::Hardened);
        assert_eq!(safety_level(), SafetyLevel::Hardened);

        CACHED_LEVEL.store(previous, Ordering::SeqCst);
    }

    #[test]
    fn resolving_state_returns_strict_safe_default() {
        let previous = CACHED_LEVEL.swap(LEVEL_RESOLVING, Ordering::SeqCst);
        assert_eq!(safety_level(), SafetyLevel::Strict);
        CACHED_LEVEL.store(previous, Ordering::SeqCst);
    }
}
