//! Bounded length: `strnlen_s` and `strnterminate_s`.
//!
//! Neither returns an error code. Invalid arguments are still reported to
//! the constraint handler and the result is 0.

use safestr_membrane::{Limits, check_slice};

use super::bounded_len;

/// Length of the string in `s`, counting at most `smax` bytes.
///
/// Returns `smax` when no terminator occurs within the bound, and 0 when
/// `smax` is 0 or exceeds the slice.
#[must_use]
pub fn strnlen_s(s: &[u8], smax: usize) -> usize {
    match check_slice("strnlen_s", s, smax, Limits::Str) {
        Ok(smax) => bounded_len(s, smax),
        Err(_) => 0,
    }
}

/// Terminates `s` so that its string fits in `smax` bytes including the NUL.
///
/// Writes a NUL at the first terminator or at `smax - 1`, whichever comes
/// first, and returns the resulting length.
pub fn strnterminate_s(s: &mut [u8], smax: usize) -> usize {
    let Ok(smax) = check_slice("strnterminate_s", s, smax, Limits::Str) else {
        return 0;
    };
    let len = bounded_len(s, smax - 1);
    s[len] = 0;
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strnlen_counts_to_terminator() {
        assert_eq!(strnlen_s(b"hello\0world", 11), 5);
    }

    #[test]
    fn strnlen_caps_at_bound() {
        assert_eq!(strnlen_s(b"hello", 3), 3);
        assert_eq!(strnlen_s(b"hello", 5), 5);
    }

    #[test]
    fn strnlen_invalid_is_zero() {
        assert_eq!(strnlen_s(b"hello", 0), 0);
        assert_eq!(strnlen_s(b"hello", 6), 0);
    }

    #[test]
    fn strnterminate_truncates_long_string() {
        let mut buf = *b"abcdefgh";
        assert_eq!(strnterminate_s(&mut buf, 4), 3);
        assert_eq!(&buf, b"abc\0efgh");
    }

    #[test]
    fn strnterminate_keeps_short_string() {
        let mut buf = *b"ab\0defgh";
        assert_eq!(strnterminate_s(&mut buf, 8), 2);
        assert_eq!(&buf, b"ab\0defgh");
    }

    #[test]
    fn strnterminate_single_byte_bound_yields_empty() {
        let mut buf = *b"xyz";
        assert_eq!(strnterminate_s(&mut buf, 1), 0);
        assert_eq!(&buf, b"\0yz");
    }

    #[test]
    fn strnterminate_invalid_leaves_buffer() {
        let mut buf = *b"xyz";
        assert_eq!(strnterminate_s(&mut buf, 0), 0);
        assert_eq!(strnterminate_s(&mut buf, 4), 0);
        assert_eq!(&buf, b"xyz");
    }
}
