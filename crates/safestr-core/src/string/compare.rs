//! Bounded comparison: `strcmp_s`, `strfirstdiff_s`, `strlastdiff_s`.
//!
//! Comparison walks both strings in lockstep and never looks at more than
//! `dmax` bytes of `dest`. The end of the `src` slice reads as a NUL.

use safestr_membrane::check::Preconditions;
use safestr_membrane::{BoundFacts, Limits, StrError, StrResult};

fn validate(op: &'static str, dest: &[u8], dmax: usize) -> StrResult<usize> {
    Preconditions::new(op, true, BoundFacts::slice(dest, dmax, Limits::Str))
        .with_source(true)
        .check()
}

/// Byte pairs of both strings while both are non-terminated.
fn common(dest: &[u8], src: &[u8]) -> impl Iterator<Item = (usize, u8, u8)> {
    dest.iter()
        .zip(src.iter())
        .enumerate()
        .map(|(i, (&a, &b))| (i, a, b))
        .take_while(|&(_, a, b)| a != 0 && b != 0)
}

/// Compares the string in `dest` against `src`.
///
/// The indicator is `dest[i] - src[i]` at the first differing byte or
/// terminator; 0 when the strings match up to a common terminator or up to
/// the bound.
pub fn strcmp_s(dest: &[u8], dmax: usize, src: &[u8]) -> StrResult<i32> {
    let dmax = validate("strcmp_s", dest, dmax)?;
    for (i, &a) in dest[..dmax].iter().enumerate() {
        let b = src.get(i).copied().unwrap_or(0);
        if a != b || a == 0 {
            return Ok(i32::from(a) - i32::from(b));
        }
    }
    Ok(0)
}

/// Index of the first byte where `dest` and `src` differ.
///
/// Only positions where both strings still have characters are compared, so
/// a string and its own prefix yield `NoDifference`.
pub fn strfirstdiff_s(dest: &[u8], dmax: usize, src: &[u8]) -> StrResult<usize> {
    let dmax = validate("strfirstdiff_s", dest, dmax)?;
    common(&dest[..dmax], src)
        .find(|&(_, a, b)| a != b)
        .map(|(i, _, _)| i)
        .ok_or(StrError::NoDifference)
}

/// Index of the last byte where `dest` and `src` differ.
pub fn strlastdiff_s(dest: &[u8], dmax: usize, src: &[u8]) -> StrResult<usize> {
    let dmax = validate("strlastdiff_s", dest, dmax)?;
    common(&dest[..dmax], src)
        .filter(|&(_, a, b)| a != b)
        .last()
        .map(|(i, _, _)| i)
        .ok_or(StrError::NoDifference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_compare_zero() {
        assert_eq!(strcmp_s(b"keep\0", 5, b"keep\0"), Ok(0));
    }

    #[test]
    fn indicator_is_byte_difference() {
        assert_eq!(strcmp_s(b"abc\0", 4, b"abd\0"), Ok(-1));
        assert_eq!(strcmp_s(b"b\0", 2, b"a\0"), Ok(1));
    }

    #[test]
    fn shorter_string_compares_against_terminator() {
        assert_eq!(strcmp_s(b"ab\0", 3, b"abc"), Ok(-i32::from(b'c')));
        assert_eq!(strcmp_s(b"abc\0", 4, b"ab"), Ok(i32::from(b'c')));
    }

    #[test]
    fn bound_ends_comparison() {
        assert_eq!(strcmp_s(b"abcx", 3, b"abcy"), Ok(0));
    }

    #[test]
    fn compare_preconditions() {
        assert_eq!(strcmp_s(b"a\0", 0, b"a\0"), Err(StrError::ZeroLength));
        assert_eq!(
            strcmp_s(b"a\0", 3, b"a\0"),
            Err(StrError::DestinationOverflow)
        );
    }

    #[test]
    fn first_and_last_difference() {
        assert_eq!(strfirstdiff_s(b"hello\0", 6, b"hxllx\0"), Ok(1));
        assert_eq!(strlastdiff_s(b"hello\0", 6, b"hxllx\0"), Ok(4));
    }

    #[test]
    fn identical_strings_have_no_difference() {
        assert_eq!(
            strfirstdiff_s(b"same\0", 5, b"same\0"),
            Err(StrError::NoDifference)
        );
        assert_eq!(
            strlastdiff_s(b"same\0", 5, b"same\0"),
            Err(StrError::NoDifference)
        );
    }

    #[test]
    fn prefix_has_no_difference() {
        assert_eq!(
            strfirstdiff_s(b"abc\0", 4, b"ab\0"),
            Err(StrError::NoDifference)
        );
    }

    #[test]
    fn difference_beyond_bound_is_ignored() {
        assert_eq!(
            strfirstdiff_s(b"abcX", 3, b"abcY"),
            Err(StrError::NoDifference)
        );
        assert_eq!(strlastdiff_s(b"aXcX", 3, b"aYcY"), Ok(1));
    }
}
