//! Bounded concatenation: `strcat_s` and `strncat_s`.
//!
//! `dest` must already hold a string terminated within `dmax`; otherwise the
//! call fails with `Unterminated` and `dest` is cleared.

use safestr_membrane::check::Preconditions;
use safestr_membrane::constraint::report;
use safestr_membrane::{BoundFacts, Limits, SafetyLevel, StrError, StrResult, safety_level};

use super::bounded_len;
use super::copy::place_string;

fn existing_len(op: &'static str, dest: &mut [u8], dmax: usize) -> StrResult<usize> {
    let len = bounded_len(dest, dmax);
    if len == dmax {
        dest[0] = 0;
        return Err(report(op, "dest is unterminated", StrError::Unterminated));
    }
    Ok(len)
}

/// Appends the string in `src` to the string in `dest`. Uses the
/// process-wide [`safety_level`].
///
/// Returns the length of the combined string.
pub fn strcat_s(dest: &mut [u8], dmax: usize, src: &[u8]) -> StrResult<usize> {
    strcat_s_with_level(safety_level(), dest, dmax, src)
}

/// [`strcat_s`] with an explicit remediation level.
pub fn strcat_s_with_level(
    level: SafetyLevel,
    dest: &mut [u8],
    dmax: usize,
    src: &[u8],
) -> StrResult<usize> {
    let dmax = Preconditions::new("strcat_s", true, BoundFacts::slice(dest, dmax, Limits::Str))
        .with_source(true)
        .check()?;
    let at = existing_len("strcat_s", dest, dmax)?;
    let len = bounded_len(src, src.len());
    place_string("strcat_s", dest, dmax, at, &src[..len], level)
}

/// Appends at most `slen` characters of `src`. Uses the process-wide
/// [`safety_level`].
pub fn strncat_s(dest: &mut [u8], dmax: usize, src: &[u8], slen: usize) -> StrResult<usize> {
    strncat_s_with_level(safety_level(), dest, dmax, src, slen)
}

/// [`strncat_s`] with an explicit remediation level.
pub fn strncat_s_with_level(
    level: SafetyLevel,
    dest: &mut [u8],
    dmax: usize,
    src: &[u8],
    slen: usize,
) -> StrResult<usize> {
    let dmax = Preconditions::new("strncat_s", true, BoundFacts::slice(dest, dmax, Limits::Str))
        .with_source(true)
        .with_source_len(slen, false)
        .check()?;
    let at = existing_len("strncat_s", dest, dmax)?;
    let len = bounded_len(src, slen);
    place_string("strncat_s", dest, dmax, at, &src[..len], level)
}
