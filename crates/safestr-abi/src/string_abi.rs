//! Bounds-checked string and memory entry points.
//!
//! Every function runs the precondition chain on the raw arguments first;
//! no byte of any buffer is read until the chain has passed. Strings are
//! then scanned byte-by-byte up to the validated bound and only the scanned
//! prefix is handed to the core kernels as a slice.

use std::ffi::{c_char, c_int, c_void};
use std::ptr;
use std::slice;

use safestr_core::mem as core_mem;
use safestr_core::string::{self as core_str, TokenState, first_char, last_char};
use safestr_core::time::{self as core_time, CTIME_MIN_LEN};
use safestr_membrane::check::Preconditions;
use safestr_membrane::config::STRTOK_DELIM_MAX_LEN;
use safestr_membrane::constraint::report;
use safestr_membrane::errno::{EOK, ESNOTFND};
use safestr_membrane::{BOS_UNKNOWN, BoundFacts, DestSize, Limits, StrError, code_of};

use crate::util::{ranges_overlap, scan_c_string, scanned_str};
use crate::{errno_t, rsize_t};

/// Chain for a string primary buffer of unknown real size.
fn str_dest(op: &'static str, dest: *const c_char, dmax: rsize_t) -> Preconditions {
    let bound = BoundFacts::raw(dest as usize, dmax, DestSize::Unknown, Limits::Str);
    Preconditions::new(op, !dest.is_null(), bound)
}

/// Chain for a memory primary buffer of unknown real size.
fn mem_dest(op: &'static str, dest: *const c_void, dmax: rsize_t) -> Preconditions {
    let bound = BoundFacts::raw(dest as usize, dmax, DestSize::Unknown, Limits::Mem);
    Preconditions::new(op, !dest.is_null(), bound)
}

/// Reports an overlap after clearing the destination string.
unsafe fn overlap(op: &'static str, dest: *mut c_char) -> errno_t {
    // SAFETY: dest was validated non-null with dmax >= 1.
    unsafe { *dest = 0 };
    report(op, "overlapping objects", StrError::Overlap).code()
}

fn scanned_len((len, terminated): (usize, bool)) -> usize {
    len + usize::from(terminated)
}

// ---------------------------------------------------------------------------
// strlastchar_s / strfirstchar_s
// ---------------------------------------------------------------------------

unsafe fn search_s(
    op: &'static str,
    dest: *mut c_char,
    dmax: rsize_t,
    c: c_char,
    outp: *mut *mut c_char,
    destbos: usize,
    kernel: fn(&[u8], u8) -> Option<usize>,
) -> errno_t {
    if !outp.is_null() {
        // SAFETY: non-null output reference supplied by the caller.
        unsafe { *outp = ptr::null_mut() };
    }
    let bound = BoundFacts::raw(dest as usize, dmax, DestSize::from_bos(destbos), Limits::Str);
    let pre = Preconditions::new(op, !dest.is_null(), bound).with_output(!outp.is_null());
    if let Err(err) = pre.check() {
        return err.code();
    }

    // SAFETY: dest is non-null and the guard accepted dmax.
    let s = unsafe { scanned_str(dest, scan_c_string(dest, dmax)) };
    match kernel(s, c as u8) {
        Some(i) => {
            // SAFETY: i indexes a byte the scan just read.
            unsafe { *outp = dest.add(i) };
            EOK
        }
        None => ESNOTFND,
    }
}

/// Finds the last occurrence of `c` in the first `dmax` bytes of `dest`.
///
/// `*lastp` is cleared on entry and set to the match on `EOK`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strlastchar_s(
    dest: *mut c_char,
    dmax: rsize_t,
    c: c_char,
    lastp: *mut *mut c_char,
) -> errno_t {
    unsafe { _strlastchar_s_chk(dest, dmax, c, lastp, BOS_UNKNOWN) }
}

/// [`strlastchar_s`] with the compiler-known object size of `dest`
/// (`BOS_UNKNOWN` when it could not be determined).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _strlastchar_s_chk(
    dest: *mut c_char,
    dmax: rsize_t,
    c: c_char,
    lastp: *mut *mut c_char,
    destbos: usize,
) -> errno_t {
    unsafe { search_s("strlastchar_s", dest, dmax, c, lastp, destbos, last_char) }
}

/// Finds the first occurrence of `c` in the first `dmax` bytes of `dest`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strfirstchar_s(
    dest: *mut c_char,
    dmax: rsize_t,
    c: c_char,
    firstp: *mut *mut c_char,
) -> errno_t {
    unsafe { search_s("strfirstchar_s", dest, dmax, c, firstp, BOS_UNKNOWN, first_char) }
}

// ---------------------------------------------------------------------------
// strnlen_s / strnterminate_s
// ---------------------------------------------------------------------------

/// Length of `s`, counting at most `smax` bytes. 0 for invalid arguments.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strnlen_s(s: *const c_char, smax: rsize_t) -> rsize_t {
    if str_dest("strnlen_s", s, smax).check().is_err() {
        return 0;
    }
    // SAFETY: validated non-null, bounded by smax.
    unsafe { scan_c_string(s, smax) }.0
}

/// NUL-terminates `dest` within `dmax` bytes and returns the resulting length.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strnterminate_s(dest: *mut c_char, dmax: rsize_t) -> rsize_t {
    if str_dest("strnterminate_s", dest, dmax).check().is_err() {
        return 0;
    }
    // SAFETY: the caller promises dmax writable bytes at dest.
    let buf = unsafe { slice::from_raw_parts_mut(dest.cast::<u8>(), dmax) };
    core_str::strnterminate_s(buf, dmax)
}

// ---------------------------------------------------------------------------
// strcpy_s / strncpy_s / strcat_s / strncat_s
// ---------------------------------------------------------------------------

/// Copies `src` into `dest` (room for `dmax` bytes including the NUL).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strcpy_s(dest: *mut c_char, dmax: rsize_t, src: *const c_char) -> errno_t {
    let pre = str_dest("strcpy_s", dest, dmax)
        .with_source(!src.is_null());
    if let Err(err) = pre.check() {
        return err.code();
    }
    // SAFETY: src validated non-null; at most dmax bytes are read.
    let scan = unsafe { scan_c_string(src, dmax) };
    if ranges_overlap(dest as usize, dmax, src as usize, scanned_len(scan)) {
        return unsafe { overlap("strcpy_s", dest) };
    }
    // SAFETY: ranges are disjoint; the caller promises dmax writable bytes.
    let (d, s) = unsafe {
        (
            slice::from_raw_parts_mut(dest.cast::<u8>(), dmax),
            scanned_str(src, scan),
        )
    };
    code_of(&core_str::strcpy_s(d, dmax, s))
}

/// Copies at most `slen` characters of `src` into `dest`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strncpy_s(
    dest: *mut c_char,
    dmax: rsize_t,
    src: *const c_char,
    slen: rsize_t,
) -> errno_t {
    let pre = str_dest("strncpy_s", dest, dmax)
        .with_source(!src.is_null())
        .with_source_len(slen, false);
    if let Err(err) = pre.check() {
        return err.code();
    }
    // SAFETY: src validated non-null; at most min(slen, dmax) bytes are read.
    let scan = unsafe { scan_c_string(src, slen.min(dmax)) };
    if ranges_overlap(dest as usize, dmax, src as usize, scanned_len(scan)) {
        return unsafe { overlap("strncpy_s", dest) };
    }
    let (d, s) = unsafe {
        (
            slice::from_raw_parts_mut(dest.cast::<u8>(), dmax),
            scanned_str(src, scan),
        )
    };
    code_of(&core_str::strncpy_s(d, dmax, s, slen))
}

/// Appends `src` to the string in `dest`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strcat_s(dest: *mut c_char, dmax: rsize_t, src: *const c_char) -> errno_t {
    let pre = str_dest("strcat_s", dest, dmax)
        .with_source(!src.is_null());
    if let Err(err) = pre.check() {
        return err.code();
    }
    let scan = unsafe { scan_c_string(src, dmax) };
    if ranges_overlap(dest as usize, dmax, src as usize, scanned_len(scan)) {
        return unsafe { overlap("strcat_s", dest) };
    }
    let (d, s) = unsafe {
        (
            slice::from_raw_parts_mut(dest.cast::<u8>(), dmax),
            scanned_str(src, scan),
        )
    };
    code_of(&core_str::strcat_s(d, dmax, s))
}

/// Appends at most `slen` characters of `src` to the string in `dest`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strncat_s(
    dest: *mut c_char,
    dmax: rsize_t,
    src: *const c_char,
    slen: rsize_t,
) -> errno_t {
    let pre = str_dest("strncat_s", dest, dmax)
        .with_source(!src.is_null())
        .with_source_len(slen, false);
    if let Err(err) = pre.check() {
        return err.code();
    }
    let scan = unsafe { scan_c_string(src, slen.min(dmax)) };
    if ranges_overlap(dest as usize, dmax, src as usize, scanned_len(scan)) {
        return unsafe { overlap("strncat_s", dest) };
    }
    let (d, s) = unsafe {
        (
            slice::from_raw_parts_mut(dest.cast::<u8>(), dmax),
            scanned_str(src, scan),
        )
    };
    code_of(&core_str::strncat_s(d, dmax, s, slen))
}

// ---------------------------------------------------------------------------
// strcmp_s / strfirstdiff_s / strlastdiff_s
// ---------------------------------------------------------------------------

unsafe fn compare_prefixes<'a>(
    op: &'static str,
    dest: *const c_char,
    dmax: rsize_t,
    src: *const c_char,
    out_present: bool,
) -> Result<(&'a [u8], &'a [u8]), StrError> {
    str_dest(op, dest, dmax)
        .with_output(out_present)
        .with_source(!src.is_null())
        .check()?;
    // SAFETY: both validated non-null; each scan reads at most dmax bytes.
    unsafe {
        Ok((
            scanned_str(dest, scan_c_string(dest, dmax)),
            scanned_str(src, scan_c_string(src, dmax)),
        ))
    }
}

/// Compares `dest` and `src`; `*indicator` receives the byte difference.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strcmp_s(
    dest: *const c_char,
    dmax: rsize_t,
    src: *const c_char,
    indicator: *mut c_int,
) -> errno_t {
    if !indicator.is_null() {
        unsafe { *indicator = 0 };
    }
    let present = !indicator.is_null();
    let (d, s) = match unsafe { compare_prefixes("strcmp_s", dest, dmax, src, present) } {
        Ok(pair) => pair,
        Err(err) => return err.code(),
    };
    match core_str::strcmp_s(d, d.len(), s) {
        Ok(diff) => {
            unsafe { *indicator = diff };
            EOK
        }
        Err(err) => err.code(),
    }
}

unsafe fn diff_s(
    op: &'static str,
    dest: *const c_char,
    dmax: rsize_t,
    src: *const c_char,
    resultp: *mut rsize_t,
    kernel: fn(&[u8], usize, &[u8]) -> Result<usize, StrError>,
) -> errno_t {
    if !resultp.is_null() {
        unsafe { *resultp = 0 };
    }
    let (d, s) = match unsafe { compare_prefixes(op, dest, dmax, src, !resultp.is_null()) } {
        Ok(pair) => pair,
        Err(err) => return err.code(),
    };
    match kernel(d, d.len(), s) {
        Ok(index) => {
            unsafe { *resultp = index };
            EOK
        }
        Err(err) => err.code(),
    }
}

/// Index of the first differing character of `dest` and `src`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strfirstdiff_s(
    dest: *const c_char,
    dmax: rsize_t,
    src: *const c_char,
    resultp: *mut rsize_t,
) -> errno_t {
    unsafe { diff_s("strfirstdiff_s", dest, dmax, src, resultp, core_str::strfirstdiff_s) }
}

/// Index of the last differing character of `dest` and `src`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strlastdiff_s(
    dest: *const c_char,
    dmax: rsize_t,
    src: *const c_char,
    resultp: *mut rsize_t,
) -> errno_t {
    unsafe { diff_s("strlastdiff_s", dest, dmax, src, resultp, core_str::strlastdiff_s) }
}

// ---------------------------------------------------------------------------
// strtok_s
// ---------------------------------------------------------------------------

/// Bounded reentrant tokenizer.
///
/// Pass the string in `s1` on the first call and null afterwards; `*ptr`
/// carries the scan position and `*s1max` the bytes left to scan.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strtok_s(
    s1: *mut c_char,
    s1max: *mut rsize_t,
    s2: *const c_char,
    ptr: *mut *mut c_char,
) -> *mut c_char {
    let outputs = !s1max.is_null() && !ptr.is_null();
    let base = match (s1.is_null(), ptr.is_null()) {
        (false, _) => s1,
        (true, false) => unsafe { *ptr },
        (true, true) => ptr::null_mut(),
    };
    let dmax = if s1max.is_null() { 0 } else { unsafe { *s1max } };
    let pre = str_dest("strtok_s", base, dmax)
        .with_output(outputs)
        .with_source(!s2.is_null());
    if pre.check().is_err() {
        return ptr::null_mut();
    }

    // Copied out before `region` exists: the delimiters may live inside it.
    let mut delim_buf = [0u8; STRTOK_DELIM_MAX_LEN + 1];
    // SAFETY: s2 validated non-null; the delimiter scan is capped.
    let scanned = unsafe { scanned_str(s2, scan_c_string(s2, STRTOK_DELIM_MAX_LEN + 1)) };
    delim_buf[..scanned.len()].copy_from_slice(scanned);
    let delim = &delim_buf[..scanned.len()];
    // SAFETY: the caller promises *s1max readable bytes at base.
    let region = unsafe { slice::from_raw_parts_mut(base.cast::<u8>(), dmax) };
    let mut remaining = dmax;
    let mut state = TokenState::new();
    let token = core_str::strtok_s(region, &mut remaining, delim, &mut state);
    unsafe {
        *s1max = remaining;
        *ptr = base.add(state.position());
    }
    match token {
        Ok(Some((start, _))) => unsafe { base.add(start) },
        _ => ptr::null_mut(),
    }
}

// ---------------------------------------------------------------------------
// memcpy_s / memset_s / memcmp_s
// ---------------------------------------------------------------------------

/// Copies `slen` bytes from `src` into `dest` (room for `dmax` bytes).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn memcpy_s(
    dest: *mut c_void,
    dmax: rsize_t,
    src: *const c_void,
    slen: rsize_t,
) -> errno_t {
    let pre = mem_dest("memcpy_s", dest, dmax)
        .with_source(!src.is_null())
        .with_source_len(slen, false);
    if let Err(err) = pre.check() {
        return err.code();
    }
    if ranges_overlap(dest as usize, dmax, src as usize, slen) {
        // SAFETY: dest validated non-null for dmax bytes.
        unsafe { ptr::write_bytes(dest.cast::<u8>(), 0, dmax) };
        return report("memcpy_s", "overlapping objects", StrError::Overlap).code();
    }
    // SAFETY: disjoint ranges; the caller promises dmax and slen bytes.
    let (d, s) = unsafe {
        (
            slice::from_raw_parts_mut(dest.cast::<u8>(), dmax),
            slice::from_raw_parts(src.cast::<u8>(), slen),
        )
    };
    code_of(&core_mem::memcpy_s(d, dmax, s, slen))
}

/// Sets the first `n` bytes of `dest` to `value`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn memset_s(
    dest: *mut c_void,
    dmax: rsize_t,
    value: c_int,
    n: rsize_t,
) -> errno_t {
    let pre = mem_dest("memset_s", dest, dmax).with_source_len(n, true);
    if let Err(err) = pre.check() {
        return err.code();
    }
    // SAFETY: the caller promises dmax writable bytes.
    let d = unsafe { slice::from_raw_parts_mut(dest.cast::<u8>(), dmax) };
    code_of(&core_mem::memset_s(d, dmax, value as u8, n))
}

/// Compares `slen` bytes; `*diff` receives the first byte difference.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn memcmp_s(
    dest: *const c_void,
    dmax: rsize_t,
    src: *const c_void,
    slen: rsize_t,
    diff: *mut c_int,
) -> errno_t {
    if !diff.is_null() {
        unsafe { *diff = 0 };
    }
    let pre = mem_dest("memcmp_s", dest, dmax)
        .with_output(!diff.is_null())
        .with_source(!src.is_null())
        .with_source_len(slen, false);
    if let Err(err) = pre.check() {
        return err.code();
    }
    if slen > dmax {
        return report("memcmp_s", "slen exceeds dmax", StrError::LengthTooLarge).code();
    }
    // SAFETY: the caller promises dmax and slen readable bytes.
    let (d, s) = unsafe {
        (
            slice::from_raw_parts(dest.cast::<u8>(), dmax),
            slice::from_raw_parts(src.cast::<u8>(), slen),
        )
    };
    match core_mem::memcmp_s(d, dmax, s, slen) {
        Ok(v) => {
            unsafe { *diff = v };
            EOK
        }
        Err(err) => err.code(),
    }
}

// ---------------------------------------------------------------------------
// ctime_s
// ---------------------------------------------------------------------------

/// Writes the UTC calendar time for `*timer` into `dest`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ctime_s(
    dest: *mut c_char,
    dmax: rsize_t,
    timer: *const libc::time_t,
) -> errno_t {
    let pre = str_dest("ctime_s", dest, dmax)
        .with_min_len(CTIME_MIN_LEN)
        .with_source(!timer.is_null());
    if let Err(err) = pre.check() {
        return err.code();
    }
    // SAFETY: timer validated non-null.
    let seconds = i64::from(unsafe { *timer });
    // SAFETY: the caller promises dmax writable bytes at dest.
    let d = unsafe { slice::from_raw_parts_mut(dest.cast::<u8>(), dmax) };
    code_of(&core_time::ctime_s(d, dmax, seconds))
}
