//! Shared internal utilities for ABI adapters.

use std::ffi::c_char;

/// Scan a C string, reading at most `bound` bytes.
///
/// Returns `(len, terminated)` where:
/// - `len` is the byte length before the first NUL or before the bound.
/// - `terminated` indicates whether a NUL byte was observed.
///
/// # Safety
///
/// `ptr` must be valid to read up to the discovered length.
pub unsafe fn scan_c_string(ptr: *const c_char, bound: usize) -> (usize, bool) {
    for i in 0..bound {
        // SAFETY: bytes before `i` were non-NUL and `i < bound`.
        if unsafe { *ptr.add(i) } == 0 {
            return (i, true);
        }
    }
    (bound, false)
}

/// Slice covering a scanned string, including its terminator when one was seen.
///
/// # Safety
///
/// `(len, terminated)` must come from [`scan_c_string`] on `ptr`.
pub unsafe fn scanned_str<'a>(ptr: *const c_char, (len, terminated): (usize, bool)) -> &'a [u8] {
    let len = if terminated { len + 1 } else { len };
    // SAFETY: the scan read every one of these bytes.
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }
}

/// True if `[a, a + alen)` and `[b, b + blen)` share a byte.
#[must_use]
pub fn ranges_overlap(a: usize, alen: usize, b: usize, blen: usize) -> bool {
    alen != 0 && blen != 0 && a < b.saturating_add(blen) && b < a.saturating_add(alen)
}
