//! C constraint handler registration and forwarding.
//!
//! Kept in its own test binary: the handler is process-wide.
//!
//! Run: cargo test -p safestr-abi --test constraint_handler_test

use std::ffi::{CStr, c_char, c_void};
use std::ptr;
use std::sync::Mutex;

use safestr_abi::constraint_abi::{ignore_handler_s, set_str_constraint_handler_s};
use safestr_abi::errno_t;
use safestr_abi::string_abi::{strlastchar_s, strcpy_s};
use safestr_membrane::errno::{ESNOTFND, ESNULLP, ESZEROL};

static SEEN: Mutex<Vec<(String, errno_t)>> = Mutex::new(Vec::new());

unsafe extern "C" fn recording_handler(msg: *const c_char, reserved: *mut c_void, error: errno_t) {
    assert!(reserved.is_null());
    let text = unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned();
    SEEN.lock().unwrap().push((text, error));
}

#[test]
fn violations_reach_c_handler_and_outcomes_do_not() {
    let previous = unsafe { set_str_constraint_handler_s(Some(recording_handler)) };
    assert!(previous.is_none());

    let mut last: *mut c_char = ptr::null_mut();
    let mut buf = *b"abc\0";
    let rc = unsafe { strlastchar_s(buf.as_mut_ptr().cast(), 0, b'a' as c_char, &mut last) };
    assert_eq!(rc, ESZEROL);
    let rc = unsafe { strlastchar_s(buf.as_mut_ptr().cast(), 4, b'z' as c_char, &mut last) };
    assert_eq!(rc, ESNOTFND);
    let rc = unsafe { strcpy_s(buf.as_mut_ptr().cast(), 4, ptr::null()) };
    assert_eq!(rc, ESNULLP);

    let restored = unsafe { set_str_constraint_handler_s(Some(ignore_handler_s)) };
    assert_eq!(restored.map(|f| f as usize), Some(recording_handler as usize));
    unsafe { set_str_constraint_handler_s(None) };

    let seen = SEEN.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("strlastchar_s: dmax is 0".to_string(), ESZEROL),
            ("strcpy_s: src is null".to_string(), ESNULLP),
        ]
    );
}
