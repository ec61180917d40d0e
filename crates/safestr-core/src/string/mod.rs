//! Bounded string operations.
//!
//! Strings are NUL-terminated byte sequences inside a slice. A scan stops at
//! the first NUL or after the declared maximum, whichever comes first; the
//! end of a source slice acts as a terminator.

pub mod compare;
pub mod concat;
pub mod copy;
pub mod len;
pub mod search;
pub mod strtok;

pub use compare::{strcmp_s, strfirstdiff_s, strlastdiff_s};
pub use concat::{strcat_s, strcat_s_with_level, strncat_s, strncat_s_with_level};
pub use copy::{strcpy_s, strcpy_s_with_level, strncpy_s, strncpy_s_with_level};
pub use len::{strnlen_s, strnterminate_s};
pub use search::{first_char, last_char, strfirstchar_s, strlastchar_s};
pub use strtok::{TokenState, strtok_s};

/// Length of the string at the start of `s`, looking at no more than `max`
/// bytes. The end of the slice counts as a terminator.
#[must_use]
pub fn bounded_len(s: &[u8], max: usize) -> usize {
    let window = &s[..max.min(s.len())];
    window.iter().position(|&b| b == 0).unwrap_or(window.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_len_stops_at_nul_bound_or_slice_end() {
        assert_eq!(bounded_len(b"abc\0def", 10), 3);
        assert_eq!(bounded_len(b"abcdef", 4), 4);
        assert_eq!(bounded_len(b"ab", 10), 2);
        assert_eq!(bounded_len(b"\0", 10), 0);
        assert_eq!(bounded_len(b"abc", 0), 0);
    }
}
