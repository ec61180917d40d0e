//! Overflow guard: reconcile a caller-declared maximum length with what is
//! actually known about the destination.
//!
//! A declared `dmax` is only a claim. When the real capacity is known the
//! claim is verified; when it is not, the guard falls back to the global
//! ceiling plus an address-range sanity check on the start reference.

use crate::config::Limits;
use crate::errno::{StrError, StrResult};

/// Sentinel used across the C ABI for "object size unknown", matching the
/// value `__builtin_object_size` yields when it cannot prove a size.
pub const BOS_UNKNOWN: usize = usize::MAX;

/// What the call site knows about the destination's real capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestSize {
    /// The allocated capacity in elements.
    Known(usize),
    /// Only the caller's declared maximum is available.
    Unknown,
}

impl DestSize {
    /// Decode the ABI side channel (`BOS_UNKNOWN` means unknown).
    #[must_use]
    pub const fn from_bos(destbos: usize) -> Self {
        if destbos == BOS_UNKNOWN {
            Self::Unknown
        } else {
            Self::Known(destbos)
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<&[u8]> for DestSize {
    fn from(buf: &[u8]) -> Self {
        Self::Known(buf.len())
    }
}

/// Facts the guard needs about one bounded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundFacts {
    /// Declared maximum length.
    pub dmax: usize,
    /// Real capacity, when available.
    pub size: DestSize,
    /// Start address, when the caller works with raw pointers.
    pub addr: Option<usize>,
    /// Ceiling the operation is measured against.
    pub limits: Limits,
}

impl BoundFacts {
    /// Facts for a slice: the capacity is always known.
    #[must_use]
    pub fn slice(buf: &[u8], dmax: usize, limits: Limits) -> Self {
        Self {
            dmax,
            size: DestSize::from(buf),
            addr: None,
            limits,
        }
    }

    /// Facts for a raw buffer at `addr` with optional size knowledge.
    #[must_use]
    pub const fn raw(addr: usize, dmax: usize, size: DestSize, limits: Limits) -> Self {
        Self {
            dmax,
            size,
            addr: Some(addr),
            limits,
        }
    }
}

/// Apply the guard. Returns the number of elements the operation may touch.
///
/// - `Known(cap)`: `dmax > cap` fails with `DestinationOverflow`; the global
///   ceiling is not consulted.
/// - `Unknown`: `dmax` above the ceiling fails with `LengthTooLarge`; a start
///   address whose `[addr, addr + dmax)` range wraps fails with
///   `DestinationOverflow`.
pub fn guard(facts: &BoundFacts) -> StrResult<usize> {
    match facts.size {
        DestSize::Known(cap) => {
            if facts.dmax > cap {
                return Err(StrError::DestinationOverflow);
            }
        }
        DestSize::Unknown => {
            if facts.dmax > facts.limits.ceiling() {
                return Err(StrError::LengthTooLarge);
            }
            if let Some(addr) = facts.addr
                && addr.checked_add(facts.dmax).is_none()
            {
                return Err(StrError::DestinationOverflow);
            }
        }
    }
    Ok(facts.dmax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RSIZE_MAX_MEM, RSIZE_MAX_STR};

    #[test]
    fn known_size_rejects_claim_larger_than_capacity() {
        let facts = BoundFacts {
            dmax: 100,
            size: DestSize::Known(10),
            addr: None,
            limits: Limits::Str,
        };
        assert_eq!(guard(&facts), Err(StrError::DestinationOverflow));
    }

    #[test]
    fn known_size_accepts_exact_capacity() {
        let buf = [0u8; 10];
        assert_eq!(guard(&BoundFacts::slice(&buf, 10, Limits::Str)), Ok(10));
        assert_eq!(guard(&BoundFacts::slice(&buf, 3, Limits::Str)), Ok(3));
    }

    #[test]
    fn known_size_supersedes_ceiling() {
        let facts = BoundFacts {
            dmax: RSIZE_MAX_STR + 1,
            size: DestSize::Known(RSIZE_MAX_STR + 1),
            addr: None,
            limits: Limits::Str,
        };
        assert_eq!(guard(&facts), Ok(RSIZE_MAX_STR + 1));
    }

    #[test]
    fn unknown_size_falls_back_to_ceiling() {
        let ok = BoundFacts::raw(0x1000, RSIZE_MAX_STR, DestSize::Unknown, Limits::Str);
        assert_eq!(guard(&ok), Ok(RSIZE_MAX_STR));

        let too_big = BoundFacts::raw(0x1000, RSIZE_MAX_STR + 1, DestSize::Unknown, Limits::Str);
        assert_eq!(guard(&too_big), Err(StrError::LengthTooLarge));

        let mem = BoundFacts::raw(0x1000, RSIZE_MAX_STR + 1, DestSize::Unknown, Limits::Mem);
        assert_eq!(guard(&mem), Ok(RSIZE_MAX_STR + 1));
        let mem_big = BoundFacts::raw(0x1000, RSIZE_MAX_MEM + 1, DestSize::Unknown, Limits::Mem);
        assert_eq!(guard(&mem_big), Err(StrError::LengthTooLarge));
    }

    #[test]
    fn unknown_size_rejects_wrapping_range() {
        let facts = BoundFacts::raw(usize::MAX - 4, 16, DestSize::Unknown, Limits::Str);
        assert_eq!(guard(&facts), Err(StrError::DestinationOverflow));
    }

    #[test]
    fn bos_sentinel_decodes() {
        assert_eq!(DestSize::from_bos(BOS_UNKNOWN), DestSize::Unknown);
        assert_eq!(DestSize::from_bos(32), DestSize::Known(32));
        assert!(DestSize::Known(0).is_known());
        assert!(!DestSize::Unknown.is_known());
    }
}
