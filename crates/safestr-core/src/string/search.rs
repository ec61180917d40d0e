//! Bounded character search: `strlastchar_s` and `strfirstchar_s`.
//!
//! Both validate `dest`/`dmax` through the membrane, then scan forward from
//! the start of `dest`, stopping at the first NUL or after `dmax` bytes.
//! A NUL target never matches: the scan ends on it.

use safestr_membrane::{Limits, StrError, StrResult, check_slice};

/// Index of the last `c` in `s`, scanning up to the first NUL.
///
/// `s` must already be cut to the validated bound.
#[must_use]
pub fn last_char(s: &[u8], c: u8) -> Option<usize> {
    let mut last = None;
    for (i, &b) in s.iter().enumerate() {
        if b == 0 {
            break;
        }
        if b == c {
            last = Some(i);
        }
    }
    last
}

/// Index of the first `c` in `s`, scanning up to the first NUL.
#[must_use]
pub fn first_char(s: &[u8], c: u8) -> Option<usize> {
    s.iter()
        .take_while(|&&b| b != 0)
        .position(|&b| b == c)
}

/// Finds the last occurrence of `c` within the first `dmax` bytes of `dest`.
///
/// Returns the index of the match. `Err(NotFound)` when the string holds no
/// `c` before its terminator or the bound; any other error is a violated
/// precondition and `dest` was not read.
pub fn strlastchar_s(dest: &[u8], dmax: usize, c: u8) -> StrResult<usize> {
    let dmax = check_slice("strlastchar_s", dest, dmax, Limits::Str)?;
    last_char(&dest[..dmax], c).ok_or(StrError::NotFound)
}

/// Finds the first occurrence of `c` within the first `dmax` bytes of `dest`.
pub fn strfirstchar_s(dest: &[u8], dmax: usize, c: u8) -> StrResult<usize> {
    let dmax = check_slice("strfirstchar_s", dest, dmax, Limits::Str)?;
    first_char(&dest[..dmax], c).ok_or(StrError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_of_repeated_char() {
        assert_eq!(strlastchar_s(b"abcba\0", 5, b'b'), Ok(3));
    }

    #[test]
    fn single_occurrence() {
        assert_eq!(strlastchar_s(b"hello\0", 6, b'h'), Ok(0));
        assert_eq!(strlastchar_s(b"hello\0", 6, b'o'), Ok(4));
    }

    #[test]
    fn missing_char_is_not_found() {
        let mut buf = [0u8; 10];
        buf[..3].copy_from_slice(b"abc");
        assert_eq!(strlastchar_s(&buf, 10, b'z'), Err(StrError::NotFound));
    }

    #[test]
    fn zero_bound_is_zero_length() {
        assert_eq!(strlastchar_s(b"abc\0", 0, b'a'), Err(StrError::ZeroLength));
    }

    #[test]
    fn bound_past_capacity_is_destination_overflow() {
        let buf = [b'a'; 10];
        assert_eq!(
            strlastchar_s(&buf, 100, b'a'),
            Err(StrError::DestinationOverflow)
        );
    }

    #[test]
    fn scan_stops_at_terminator() {
        assert_eq!(strlastchar_s(b"ab\0b\0", 5, b'b'), Ok(1));
        assert_eq!(strlastchar_s(b"a\0bb", 4, b'b'), Err(StrError::NotFound));
    }

    #[test]
    fn scan_stops_at_bound_without_terminator() {
        assert_eq!(strlastchar_s(b"abcb", 3, b'b'), Ok(1));
        assert_eq!(strlastchar_s(b"xxxx", 4, b'x'), Ok(3));
    }

    #[test]
    fn nul_target_never_matches() {
        assert_eq!(strlastchar_s(b"abc\0", 4, 0), Err(StrError::NotFound));
        assert_eq!(strfirstchar_s(b"abc\0", 4, 0), Err(StrError::NotFound));
    }

    #[test]
    fn empty_string_is_not_found() {
        assert_eq!(strlastchar_s(b"\0abc", 4, b'a'), Err(StrError::NotFound));
    }

    #[test]
    fn first_char_finds_earliest() {
        assert_eq!(strfirstchar_s(b"abcba\0", 6, b'b'), Ok(1));
        assert_eq!(strfirstchar_s(b"abcba\0", 1, b'b'), Err(StrError::NotFound));
        assert_eq!(
            strfirstchar_s(b"ab", 3, b'b'),
            Err(StrError::DestinationOverflow)
        );
    }

    #[test]
    fn kernels_agree_with_naive_search() {
        let s = b"mississippi\0";
        assert_eq!(last_char(s, b's'), Some(6));
        assert_eq!(first_char(s, b's'), Some(2));
        assert_eq!(last_char(s, b'q'), None);
        assert_eq!(first_char(&s[..0], b'm'), None);
    }
}
