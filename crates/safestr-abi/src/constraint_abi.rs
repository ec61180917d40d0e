//! C-callable constraint handler registration.
//!
//! C code installs a `constraint_handler_t`; violations detected anywhere in
//! the library are forwarded to it with a NUL-terminated `"op: detail"`
//! message formatted on the stack.

use std::ffi::{CStr, c_char, c_void};
use std::fmt::{self, Write};

use parking_lot::{RwLock, const_rwlock};
use safestr_membrane::constraint::{ConstraintViolation, set_constraint_handler};

use crate::errno_t;

/// C handler signature: message, reserved pointer (always null), error code.
#[allow(non_camel_case_types)]
pub type constraint_handler_t = unsafe extern "C" fn(*const c_char, *mut c_void, errno_t);

static C_HANDLER: RwLock<Option<constraint_handler_t>> = const_rwlock(None);

const MSG_CAP: usize = 128;

/// Fixed-size message buffer; output past capacity is dropped.
struct StackMsg {
    buf: [u8; MSG_CAP],
    len: usize,
}

impl StackMsg {
    const fn new() -> Self {
        Self {
            buf: [0; MSG_CAP],
            len: 0,
        }
    }

    /// Terminated message; the last byte is always reserved for the NUL.
    fn as_c_ptr(&mut self) -> *const c_char {
        self.buf[self.len] = 0;
        self.buf.as_ptr().cast()
    }
}

impl Write for StackMsg {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MSG_CAP - 1 - self.len;
        let take = s.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

fn forward_to_c(violation: &ConstraintViolation) {
    let Some(handler) = *C_HANDLER.read() else {
        return;
    };
    let mut msg = StackMsg::new();
    let _ = write!(msg, "{violation}");
    // SAFETY: the handler was registered by the caller as a valid C function.
    unsafe { handler(msg.as_c_ptr(), std::ptr::null_mut(), violation.error.code()) };
}

/// Installs `handler` for string and memory violations and returns the
/// previously installed C handler. Null restores the default (ignore).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn set_str_constraint_handler_s(
    handler: Option<constraint_handler_t>,
) -> Option<constraint_handler_t> {
    let mut slot = C_HANDLER.write();
    let previous = std::mem::replace(&mut *slot, handler);
    match handler {
        Some(_) => set_constraint_handler(Some(forward_to_c)),
        None => set_constraint_handler(None),
    };
    previous
}

/// Handler that ignores the violation.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ignore_handler_s(
    _msg: *const c_char,
    _ptr: *mut c_void,
    _error: errno_t,
) {
}

/// Handler that writes the message to stderr and aborts.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn abort_handler_s(msg: *const c_char, _ptr: *mut c_void, error: errno_t) {
    if msg.is_null() {
        eprintln!("abort_handler_s: error {error}");
    } else {
        // SAFETY: handlers receive a NUL-terminated message.
        let text = unsafe { CStr::from_ptr(msg) };
        eprintln!("abort_handler_s: {} (error {error})", text.to_string_lossy());
    }
    // SAFETY: abort never returns and touches no Rust state.
    unsafe { libc::abort() }
}
