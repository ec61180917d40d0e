//! Bounded time formatting: `ctime_s`.
//!
//! Renders seconds since the Unix epoch in the classic `asctime` layout,
//! `"Www Mmm dd hh:mm:ss yyyy\n"`, always in UTC. There is no locale and no
//! time-zone lookup. The text is built on the stack and placed in `dest`
//! through the same strict copy path as `strcpy_s`.

use safestr_membrane::check::Preconditions;
use safestr_membrane::constraint::report;
use safestr_membrane::{BoundFacts, Limits, SafetyLevel, StrError, StrResult};

use crate::string::copy::place_string;

/// Smallest `dmax` `ctime_s` accepts: 24 characters, a newline and a NUL.
pub const CTIME_MIN_LEN: usize = 26;

/// First timer value rejected as too large.
pub const CTIME_MAX_TIMER: i64 = 313_360_441_200;

/// Longest rendering: a five-digit year adds one character.
const CTIME_MAX_TEXT: usize = 26;

const WEEKDAYS: [&[u8; 3]; 7] = [b"Sun", b"Mon", b"Tue", b"Wed", b"Thu", b"Fri", b"Sat"];
const MONTHS: [&[u8; 3]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun", b"Jul", b"Aug", b"Sep", b"Oct", b"Nov", b"Dec",
];

/// Proleptic Gregorian `(year, month 1..=12, day 1..=31)` for a count of
/// days since 1970-01-01.
#[must_use]
pub const fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// Fixed-capacity text under construction.
struct Text {
    buf: [u8; CTIME_MAX_TEXT],
    len: usize,
}

impl Text {
    fn push(&mut self, bytes: &[u8]) {
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    /// `value` in `width` digits, padded with `pad`.
    fn push_num(&mut self, value: u64, width: usize, pad: u8) {
        let mut digits = [0u8; 20];
        let mut n = value;
        let mut count = 0;
        loop {
            digits[count] = b'0' + (n % 10) as u8;
            count += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for _ in count..width {
            self.push(&[pad]);
        }
        for i in (0..count).rev() {
            self.push(&[digits[i]]);
        }
    }
}

/// Renders `timer` (`0 <= timer < CTIME_MAX_TIMER`).
fn render(timer: i64) -> Text {
    let days = timer.div_euclid(86_400);
    let secs = timer.rem_euclid(86_400) as u64;
    let (year, month, day) = civil_from_days(days);

    let mut text = Text {
        buf: [0; CTIME_MAX_TEXT],
        len: 0,
    };
    text.push(WEEKDAYS[(days + 4).rem_euclid(7) as usize]);
    text.push(b" ");
    text.push(MONTHS[month as usize - 1]);
    text.push(b" ");
    text.push_num(u64::from(day), 2, b' ');
    text.push(b" ");
    text.push_num(secs / 3600, 2, b'0');
    text.push(b":");
    text.push_num(secs % 3600 / 60, 2, b'0');
    text.push(b":");
    text.push_num(secs % 60, 2, b'0');
    text.push(b" ");
    text.push_num(year as u64, 4, b'0');
    text.push(b"\n");
    text
}

/// Writes the UTC calendar time for `timer` into `dest`.
///
/// `dmax` must be at least [`CTIME_MIN_LEN`] (`LengthTooSmall`). A negative
/// timer fails with `LengthTooSmall`, one at or past [`CTIME_MAX_TIMER`] with
/// `LengthTooLarge`. Years past 9999 render with five digits and need one
/// more byte; when it is missing the call fails with `NoSpace` and `dest`
/// is cleared.
///
/// Returns the length of the text, newline included.
pub fn ctime_s(dest: &mut [u8], dmax: usize, timer: i64) -> StrResult<usize> {
    let dmax = Preconditions::new("ctime_s", true, BoundFacts::slice(dest, dmax, Limits::Str))
        .with_min_len(CTIME_MIN_LEN)
        .with_source(true)
        .check()?;
    if timer < 0 {
        return Err(report("ctime_s", "timer is <0", StrError::LengthTooSmall));
    }
    if timer >= CTIME_MAX_TIMER {
        return Err(report("ctime_s", "timer is too large", StrError::LengthTooLarge));
    }
    let text = render(timer);
    place_string("ctime_s", dest, dmax, 0, &text.buf[..text.len], SafetyLevel::Strict)
}
