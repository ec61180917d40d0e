//! Bounded memory operations: `memcpy_s`, `memset_s`, `memcmp_s`.
//!
//! Measured against `RSIZE_MAX_MEM` instead of the string ceiling. The
//! source length is checked against the source slice, so a lying `slen`
//! is caught the same way a lying `dmax` is.

use safestr_membrane::check::Preconditions;
use safestr_membrane::constraint::report;
use safestr_membrane::{
    BoundFacts, DestSize, HealingAction, Limits, SafetyLevel, StrError, StrResult,
    global_healing_policy, safety_level,
};

fn with_source(
    op: &'static str,
    dest: &[u8],
    dmax: usize,
    src: &[u8],
    slen: usize,
) -> Preconditions {
    Preconditions::new(op, true, BoundFacts::slice(dest, dmax, Limits::Mem))
        .with_source(true)
        .with_source_len(slen, false)
        .with_source_size(DestSize::from(src))
}

/// Copies `slen` bytes of `src` into `dest`, which may hold `dmax` bytes.
/// Uses the process-wide [`safety_level`].
///
/// Returns the number of bytes copied.
pub fn memcpy_s(dest: &mut [u8], dmax: usize, src: &[u8], slen: usize) -> StrResult<usize> {
    memcpy_s_with_level(safety_level(), dest, dmax, src, slen)
}

/// [`memcpy_s`] with an explicit remediation level.
///
/// `slen > dmax` zeroes `dest[..dmax]` and fails with `NoSpace` in strict
/// mode; hardened mode copies the first `dmax` bytes.
pub fn memcpy_s_with_level(
    level: SafetyLevel,
    dest: &mut [u8],
    dmax: usize,
    src: &[u8],
    slen: usize,
) -> StrResult<usize> {
    let dmax = with_source("memcpy_s", dest, dmax, src, slen).check()?;
    let policy = global_healing_policy();
    let action = policy.heal_copy_bounds(slen, dmax, level);
    match action {
        HealingAction::None => {
            dest[..slen].copy_from_slice(&src[..slen]);
            Ok(slen)
        }
        HealingAction::ClampSize { clamped, .. } => {
            dest[..clamped].copy_from_slice(&src[..clamped]);
            policy.record(&action);
            Ok(clamped)
        }
        _ => {
            dest[..dmax].fill(0);
            policy.record(&action);
            Err(report("memcpy_s", "slen exceeds dmax", StrError::NoSpace))
        }
    }
}

/// Sets the first `n` bytes of `dest` to `value`.
///
/// When `n > dmax` the first `dmax` bytes are still set and the call fails
/// with `NoSpace`. `n == 0` is a no-op.
pub fn memset_s(dest: &mut [u8], dmax: usize, value: u8, n: usize) -> StrResult<usize> {
    let dmax = Preconditions::new("memset_s", true, BoundFacts::slice(dest, dmax, Limits::Mem))
        .with_source_len(n, true)
        .check()?;
    let count = n.min(dmax);
    dest[..count].fill(value);
    if n > dmax {
        return Err(report("memset_s", "n exceeds dmax", StrError::NoSpace));
    }
    Ok(count)
}

/// Compares the first `slen` bytes of `dest` and `src`.
///
/// The result is `dest[i] - src[i]` at the first differing byte, or 0.
pub fn memcmp_s(dest: &[u8], dmax: usize, src: &[u8], slen: usize) -> StrResult<i32> {
    let dmax = with_source("memcmp_s", dest, dmax, src, slen).check()?;
    if slen > dmax {
        return Err(report("memcmp_s", "slen exceeds dmax", StrError::LengthTooLarge));
    }
    Ok(dest[..slen]
        .iter()
        .zip(&src[..slen])
        .find(|(a, b)| a != b)
        .map_or(0, |(&a, &b)| i32::from(a) - i32::from(b)))
}
