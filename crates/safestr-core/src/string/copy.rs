//! Bounded copy: `strcpy_s` and `strncpy_s`.
//!
//! A source that does not fit is handled by the remediation policy: strict
//! mode clears `dest` to the empty string and fails with `NoSpace`, hardened
//! mode truncates and NUL-terminates. Precondition failures never touch
//! `dest`.

use safestr_membrane::check::Preconditions;
use safestr_membrane::constraint::report;
use safestr_membrane::{
    BoundFacts, HealingAction, Limits, SafetyLevel, StrError, StrResult, global_healing_policy,
    safety_level,
};

use super::bounded_len;

/// Writes `src` at `dest[at..]` and NUL-terminates within `dmax`, applying
/// the remediation policy when `at + src.len()` does not fit.
///
/// Requires `at < dmax <= dest.len()`. Returns the length of the resulting
/// string in `dest`.
pub(crate) fn place_string(
    op: &'static str,
    dest: &mut [u8],
    dmax: usize,
    at: usize,
    src: &[u8],
    level: SafetyLevel,
) -> StrResult<usize> {
    let policy = global_healing_policy();
    let action = policy.heal_string_bounds(at + src.len(), dmax, level);
    match action {
        HealingAction::None => {
            let end = at + src.len();
            dest[at..end].copy_from_slice(src);
            dest[end] = 0;
            Ok(end)
        }
        HealingAction::TruncateWithNull { truncated, .. } => {
            let keep = truncated - at;
            dest[at..truncated].copy_from_slice(&src[..keep]);
            dest[truncated] = 0;
            policy.record(&action);
            Ok(truncated)
        }
        _ => {
            dest[0] = 0;
            policy.record(&action);
            Err(report(op, "not enough space for src", StrError::NoSpace))
        }
    }
}

/// Copies the string in `src` into `dest`, which may hold `dmax` bytes
/// including the terminator. Uses the process-wide [`safety_level`].
///
/// Returns the length of the copied string.
pub fn strcpy_s(dest: &mut [u8], dmax: usize, src: &[u8]) -> StrResult<usize> {
    strcpy_s_with_level(safety_level(), dest, dmax, src)
}

/// [`strcpy_s`] with an explicit remediation level.
pub fn strcpy_s_with_level(
    level: SafetyLevel,
    dest: &mut [u8],
    dmax: usize,
    src: &[u8],
) -> StrResult<usize> {
    let dmax = Preconditions::new("strcpy_s", true, BoundFacts::slice(dest, dmax, Limits::Str))
        .with_source(true)
        .check()?;
    let len = bounded_len(src, src.len());
    place_string("strcpy_s", dest, dmax, 0, &src[..len], level)
}

/// Copies at most `slen` characters of `src` into `dest` and always
/// NUL-terminates. Uses the process-wide [`safety_level`].
pub fn strncpy_s(dest: &mut [u8], dmax: usize, src: &[u8], slen: usize) -> StrResult<usize> {
    strncpy_s_with_level(safety_level(), dest, dmax, src, slen)
}

/// [`strncpy_s`] with an explicit remediation level.
pub fn strncpy_s_with_level(
    level: SafetyLevel,
    dest: &mut [u8],
    dmax: usize,
    src: &[u8],
    slen: usize,
) -> StrResult<usize> {
    let dmax = Preconditions::new("strncpy_s", true, BoundFacts::slice(dest, dmax, Limits::Str))
        .with_source(true)
        .with_source_len(slen, false)
        .check()?;
    let len = bounded_len(src, slen);
    place_string("strncpy_s", dest, dmax, 0, &src[..len], level)
}
