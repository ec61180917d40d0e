//! Overflow remediation policy.
//!
//! When a well-formed mutating call cannot fit its result in the destination,
//! the policy decides between rejecting (strict) and repairing (hardened).
//! Either way the destination ends in a defined state: rejected string
//! destinations become the empty string, rejected memory destinations are
//! zeroed, repaired destinations hold a truncated, NUL-terminated prefix.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::SafetyLevel;

/// What the primitive must do about a result that does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealingAction {
    /// Copy only `clamped` bytes of a `requested`-byte memory copy.
    ClampSize { requested: usize, clamped: usize },
    /// Keep `truncated` characters and NUL-terminate.
    TruncateWithNull { requested: usize, truncated: usize },
    /// Reject: leave the destination as an empty string.
    ClearString,
    /// Reject: zero the first `len` bytes of the destination.
    ZeroFill { len: usize },
    /// The result fits.
    None,
}

impl HealingAction {
    /// True if the call still succeeds after applying this action.
    #[must_use]
    pub const fn is_repair(&self) -> bool {
        matches!(
            self,
            Self::ClampSize { .. } | Self::TruncateWithNull { .. }
        )
    }

    /// True if the call fails with `ESNOSPC` after applying this action.
    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self, Self::ClearString | Self::ZeroFill { .. })
    }
}

/// Counters for applied actions.
pub struct HealingPolicy {
    pub total_heals: AtomicU64,
    pub size_clamps: AtomicU64,
    pub null_truncations: AtomicU64,
    pub cleared_strings: AtomicU64,
    pub zero_fills: AtomicU64,
}

impl HealingPolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_heals: AtomicU64::new(0),
            size_clamps: AtomicU64::new(0),
            null_truncations: AtomicU64::new(0),
            cleared_strings: AtomicU64::new(0),
            zero_fills: AtomicU64::new(0),
        }
    }

    pub fn record(&self, action: &HealingAction) {
        if action.is_repair() {
            self.total_heals.fetch_add(1, Ordering::Relaxed);
        }
        match action {
            HealingAction::ClampSize { .. } => {
                self.size_clamps.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::TruncateWithNull { .. } => {
                self.null_truncations.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::ClearString => {
                self.cleared_strings.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::ZeroFill { .. } => {
                self.zero_fills.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::None => {}
        }
    }

    /// Decide for a string result of `src_len` characters written into a
    /// destination with room for `dmax` bytes including the terminator.
    #[must_use]
    pub fn heal_string_bounds(
        &self,
        src_len: usize,
        dmax: usize,
        level: SafetyLevel,
    ) -> HealingAction {
        if src_len < dmax {
            return HealingAction::None;
        }
        if level.truncates() {
            HealingAction::TruncateWithNull {
                requested: src_len,
                truncated: dmax.saturating_sub(1),
            }
        } else {
            HealingAction::ClearString
        }
    }

    /// Decide for a memory copy of `requested` bytes into `dmax` bytes.
    #[must_use]
    pub fn heal_copy_bounds(
        &self,
        requested: usize,
        dmax: usize,
        level: SafetyLevel,
    ) -> HealingAction {
        if requested <= dmax {
            return HealingAction::None;
        }
        if level.truncates() {
            HealingAction::ClampSize {
                requested,
                clamped: dmax,
            }
        } else {
            HealingAction::ZeroFill { len: dmax }
        }
    }
}

impl Default for HealingPolicy {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_POLICY: HealingPolicy = HealingPolicy::new();

/// Access the global healing policy.
#[must_use]
pub fn global_healing_policy() -> &'static HealingPolicy {
    &GLOBAL_POLICY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_fits_when_terminator_has_room() {
        let policy = HealingPolicy::new();
        assert_eq!(
            policy.heal_string_bounds(4, 5, SafetyLevel::Strict),
            HealingAction::None
        );
    }

    #[test]
    fn strict_string_overflow_clears() {
        let policy = HealingPolicy::new();
        assert_eq!(
            policy.heal_string_bounds(5, 5, SafetyLevel::Strict),
            HealingAction::ClearString
        );
    }

    #[test]
    fn hardened_string_overflow_truncates_leaving_room_for_null() {
        let policy = HealingPolicy::new();
        assert_eq!(
            policy.heal_string_bounds(100, 50, SafetyLevel::Hardened),
            HealingAction::TruncateWithNull {
                requested: 100,
                truncated: 49
            }
        );
    }

    #[test]
    fn memory_copy_decisions() {
        let policy = HealingPolicy::new();
        assert_eq!(
            policy.heal_copy_bounds(8, 8, SafetyLevel::Strict),
            HealingAction::None
        );
        assert_eq!(
            policy.heal_copy_bounds(9, 8, SafetyLevel::Strict),
            HealingAction::ZeroFill { len: 8 }
        );
        assert_eq!(
            policy.heal_copy_bounds(9, 8, SafetyLevel::Hardened),
            HealingAction::ClampSize {
                requested: 9,
                clamped: 8
            }
        );
    }

    #[test]
    fn record_increments_counters() {
        let policy = HealingPolicy::new();
        policy.record(&HealingAction::ClearString);
        policy.record(&HealingAction::TruncateWithNull {
            requested: 10,
            truncated: 4,
        });
        policy.record(&HealingAction::TruncateWithNull {
            requested: 12,
            truncated: 4,
        });
        policy.record(&HealingAction::None);

        assert_eq!(policy.total_heals.load(Ordering::Relaxed), 2);
        assert_eq!(policy.null_truncations.load(Ordering::Relaxed), 2);
        assert_eq!(policy.cleared_strings.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn repair_and_reject_are_exclusive() {
        let actions = [
            HealingAction::ClampSize {
                requested: 2,
                clamped: 1,
            },
            HealingAction::TruncateWithNull {
                requested: 2,
                truncated: 1,
            },
            HealingAction::ClearString,
            HealingAction::ZeroFill { len: 1 },
            HealingAction::None,
        ];
        for action in actions {
            assert!(!(action.is_repair() && action.is_reject()), "{action:?}");
        }
        assert!(!HealingAction::None.is_repair());
        assert!(!HealingAction::None.is_reject());
    }
}
