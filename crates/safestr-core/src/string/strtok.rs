//! Bounded reentrant tokenizer: `strtok_s`.
//!
//! Like `strtok_r`, each call overwrites the delimiter that ends a token
//! with a NUL and returns the token's `(start, len)`. Unlike `strtok_r`, the
//! caller also passes the number of bytes left in the buffer (`s1max`),
//! which is decremented as the scan advances, so an unterminated buffer is
//! detected instead of overrun.

use safestr_membrane::check::Preconditions;
use safestr_membrane::config::STRTOK_DELIM_MAX_LEN;
use safestr_membrane::constraint::report;
use safestr_membrane::{BoundFacts, DestSize, Limits, StrError, StrResult};

use super::bounded_len;

/// Position carried between calls on the same buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenState {
    pos: usize,
    done: bool,
}

impl TokenState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: 0,
            done: false,
        }
    }

    /// Offset in the buffer where the next scan starts.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// True once the terminator has been reached.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

/// Returns true if byte `b` is in the delimiter set.
fn is_delim(b: u8, delimiters: &[u8]) -> bool {
    delimiters.contains(&b)
}

fn unterminated(state: &mut TokenState, s1max: &mut usize) -> StrError {
    state.done = true;
    *s1max = 0;
    report("strtok_s", "s1 is unterminated", StrError::Unterminated)
}

/// Returns the next token in `s`.
///
/// `s1max` holds the number of bytes of `s` left to scan starting at
/// `state.position()`; pass the buffer's string bound on the first call.
/// `delim` is a NUL-terminated set of at most `STRTOK_DELIM_MAX_LEN`
/// delimiter bytes.
///
/// `Ok(None)` once the string is exhausted. A string that runs to the bound
/// without a terminator fails with `Unterminated`.
pub fn strtok_s(
    s: &mut [u8],
    s1max: &mut usize,
    delim: &[u8],
    state: &mut TokenState,
) -> StrResult<Option<(usize, usize)>> {
    if state.done {
        return Ok(None);
    }
    let base = state.pos;
    let bound = BoundFacts {
        dmax: *s1max,
        size: DestSize::Known(s.len().saturating_sub(base)),
        addr: None,
        limits: Limits::Str,
    };
    let dmax = Preconditions::new("strtok_s", true, bound)
        .with_source(true)
        .check()?;

    let dlen = bounded_len(delim, STRTOK_DELIM_MAX_LEN + 1);
    if dlen > STRTOK_DELIM_MAX_LEN {
        return Err(report("strtok_s", "delim is unterminated", StrError::Unterminated));
    }
    let delim = &delim[..dlen];

    let region = &mut s[base..base + dmax];
    let len = region.len();
    let mut pos = 0;

    // Skip leading delimiters
    while pos < len && region[pos] != 0 && is_delim(region[pos], delim) {
        pos += 1;
    }
    if pos == len {
        return Err(unterminated(state, s1max));
    }
    if region[pos] == 0 {
        state.done = true;
        state.pos = base + pos;
        *s1max -= pos;
        return Ok(None);
    }

    let token_start = pos;
    while pos < len && region[pos] != 0 && !is_delim(region[pos], delim) {
        pos += 1;
    }
    if pos == len {
        return Err(unterminated(state, s1max));
    }
    let token_len = pos - token_start;

    // Write NUL terminator over the delimiter; leave the string terminator in place
    if region[pos] != 0 {
        region[pos] = 0;
        pos += 1;
    }
    state.pos = base + pos;
    *s1max -= pos;

    Ok(Some((base + token_start, token_len)))
}
