//! Error taxonomy shared by every bounded primitive.
//!
//! Numeric values follow the Safe C Library (`safe_lib_errno.h`) so that the
//! ABI layer can hand them straight back to C callers. `EOK` is not an error
//! variant: success is the `Ok` arm of [`StrResult`].

use thiserror::Error;

/// Operation completed normally.
pub const EOK: i32 = 0;
/// A declared length exceeded the known capacity of the destination.
pub const EOVERFLOW: i32 = 75;
pub const ESNULLP: i32 = 400;
pub const ESZEROL: i32 = 401;
pub const ESLEMIN: i32 = 402;
pub const ESLEMAX: i32 = 403;
pub const ESOVRLP: i32 = 404;
pub const ESNOSPC: i32 = 406;
pub const ESUNTERM: i32 = 407;
pub const ESNODIFF: i32 = 408;
pub const ESNOTFND: i32 = 409;

/// Failure (or non-success outcome) of a bounded primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StrError {
    /// A required reference argument was null.
    #[error("null pointer")]
    NullPointer,
    /// A declared maximum length was zero.
    #[error("length is zero")]
    ZeroLength,
    /// A declared length was below the operation's minimum.
    #[error("length is below the minimum")]
    LengthTooSmall,
    /// A declared maximum length exceeded the global ceiling.
    #[error("length exceeds the maximum")]
    LengthTooLarge,
    /// A declared maximum length exceeded the known destination capacity.
    #[error("length exceeds the destination size")]
    DestinationOverflow,
    /// Source and destination regions overlap.
    #[error("buffers overlap")]
    Overlap,
    /// The result does not fit in the destination.
    #[error("not enough space in destination")]
    NoSpace,
    /// A string was not NUL-terminated within its bound.
    #[error("string is unterminated")]
    Unterminated,
    /// Compared strings have no differing position.
    #[error("no difference")]
    NoDifference,
    /// The operation completed without finding a qualifying result.
    #[error("not found")]
    NotFound,
}

impl StrError {
    /// Numeric code as returned across the C ABI.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::NullPointer => ESNULLP,
            Self::ZeroLength => ESZEROL,
            Self::LengthTooSmall => ESLEMIN,
            Self::LengthTooLarge => ESLEMAX,
            Self::DestinationOverflow => EOVERFLOW,
            Self::Overlap => ESOVRLP,
            Self::NoSpace => ESNOSPC,
            Self::Unterminated => ESUNTERM,
            Self::NoDifference => ESNODIFF,
            Self::NotFound => ESNOTFND,
        }
    }

    /// Inverse of [`StrError::code`]. Returns `None` for `EOK` and unknown codes.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            ESNULLP => Some(Self::NullPointer),
            ESZEROL => Some(Self::ZeroLength),
            ESLEMIN => Some(Self::LengthTooSmall),
            ESLEMAX => Some(Self::LengthTooLarge),
            EOVERFLOW => Some(Self::DestinationOverflow),
            ESOVRLP => Some(Self::Overlap),
            ESNOSPC => Some(Self::NoSpace),
            ESUNTERM => Some(Self::Unterminated),
            ESNODIFF => Some(Self::NoDifference),
            ESNOTFND => Some(Self::NotFound),
            _ => None,
        }
    }

    /// Symbolic name of the code (`ESNULLP`, `EOVERFLOW`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NullPointer => "ESNULLP",
            Self::ZeroLength => "ESZEROL",
            Self::LengthTooSmall => "ESLEMIN",
            Self::LengthTooLarge => "ESLEMAX",
            Self::DestinationOverflow => "EOVERFLOW",
            Self::Overlap => "ESOVRLP",
            Self::NoSpace => "ESNOSPC",
            Self::Unterminated => "ESUNTERM",
            Self::NoDifference => "ESNODIFF",
            Self::NotFound => "ESNOTFND",
        }
    }

    /// True for outcomes that are reported through the error channel but are
    /// not constraint violations (the call itself was well-formed).
    #[must_use]
    pub const fn is_outcome(self) -> bool {
        matches!(self, Self::NotFound | Self::NoDifference)
    }
}

/// Result type of every bounded primitive.
pub type StrResult<T> = Result<T, StrError>;

/// Collapse a primitive's result to its numeric code (`EOK` on success).
#[must_use]
pub fn code_of<T>(result: &StrResult<T>) -> i32 {
    match result {
        Ok(_) => EOK,
        Err(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [StrError; 10] = [
        StrError::NullPointer,
        StrError::ZeroLength,
        StrError::LengthTooSmall,
        StrError::LengthTooLarge,
        StrError::DestinationOverflow,
        StrError::Overlap,
        StrError::NoSpace,
        StrError::Unterminated,
        StrError::NoDifference,
        StrError::NotFound,
    ];

    #[test]
    fn codes_match_safe_c_library_values() {
        assert_eq!(StrError::NullPointer.code(), 400);
        assert_eq!(StrError::ZeroLength.code(), 401);
        assert_eq!(StrError::LengthTooLarge.code(), 403);
        assert_eq!(StrError::NotFound.code(), 409);
        assert_eq!(StrError::DestinationOverflow.code(), 75);
    }

    #[test]
    fn codes_are_distinct_and_reversible() {
        let mut seen = std::collections::HashSet::new();
        for err in ALL {
            assert!(seen.insert(err.code()), "duplicate code for {err:?}");
            assert_ne!(err.code(), EOK);
            assert_eq!(StrError::from_code(err.code()), Some(err));
        }
        assert_eq!(StrError::from_code(EOK), None);
        assert_eq!(StrError::from_code(-1), None);
    }

    #[test]
    fn success_and_not_found_are_distinct() {
        let found: StrResult<usize> = Ok(3);
        let missing: StrResult<usize> = Err(StrError::NotFound);
        assert_eq!(code_of(&found), EOK);
        assert_eq!(code_of(&missing), ESNOTFND);
    }

    #[test]
    fn only_search_outcomes_are_not_violations() {
        for err in ALL {
            let expected = matches!(err, StrError::NotFound | StrError::NoDifference);
            assert_eq!(err.is_outcome(), expected, "{err:?}");
        }
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(StrError::ZeroLength.to_string(), "length is zero");
        assert_eq!(StrError::NotFound.name(), "ESNOTFND");
    }
}
