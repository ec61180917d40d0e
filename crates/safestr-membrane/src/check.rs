//! # Precondition validator
//!
//! Every primitive validates its arguments through the same ordered chain
//! before touching any buffer:
//!
//! output → dest → zero length → minimum length → bound (ceiling / overflow guard)
//! → source → source length
//!
//! The chain short-circuits: the first violated stage determines the error
//! and no later stage runs. Callers rely on which error wins for inputs that
//! violate several preconditions at once, so the order is fixed
//! ([`DEFAULT_ORDER`]) and never adapted at runtime.
//!
//! Stages that do not apply to a primitive (no output reference, no source
//! buffer) pass trivially.

use crate::config::Limits;
use crate::constraint;
use crate::errno::{StrError, StrResult};
use crate::guard::{BoundFacts, DestSize, guard};

/// The validation stages, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CheckStage {
    /// Required output reference is non-null.
    Output = 0,
    /// Primary buffer is non-null.
    Dest = 1,
    /// Declared maximum length is non-zero.
    ZeroLength = 2,
    /// Declared maximum length meets the operation's minimum, if it has one.
    MinLength = 3,
    /// Ceiling check, or the overflow guard when the size is known.
    Bound = 4,
    /// Secondary buffer is non-null.
    Source = 5,
    /// Secondary length is non-zero (where required) and under the ceiling.
    SourceLength = 6,
}

/// Number of check stages.
pub const NUM_STAGES: usize = 7;

/// Fixed evaluation order.
pub const DEFAULT_ORDER: [CheckStage; NUM_STAGES] = [
    CheckStage::Output,
    CheckStage::Dest,
    CheckStage::ZeroLength,
    CheckStage::MinLength,
    CheckStage::Bound,
    CheckStage::Source,
    CheckStage::SourceLength,
];

impl CheckStage {
    /// Constraint-handler text for a failure at this stage.
    #[must_use]
    pub const fn detail(self, error: StrError) -> &'static str {
        match (self, error) {
            (Self::Output, _) => "output reference is null",
            (Self::Dest, _) => "dest is null",
            (Self::ZeroLength, _) => "dmax is 0",
            (Self::MinLength, _) => "dmax is too small",
            (Self::Bound, StrError::DestinationOverflow) => "dmax exceeds dest",
            (Self::Bound, _) => "dmax exceeds max",
            (Self::Source, _) => "src is null",
            (Self::SourceLength, StrError::ZeroLength) => "slen is 0",
            (Self::SourceLength, StrError::DestinationOverflow) => "slen exceeds src",
            (Self::SourceLength, _) => "slen exceeds max",
        }
    }
}

/// Secondary-length constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceLen {
    slen: usize,
    zero_ok: bool,
    size: DestSize,
}

/// Argument facts for one call, checked in [`DEFAULT_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preconditions {
    op: &'static str,
    output: Option<bool>,
    dest: bool,
    min_len: usize,
    bound: BoundFacts,
    source: Option<bool>,
    source_len: Option<SourceLen>,
}

impl Preconditions {
    /// Start a chain for `op` whose primary buffer is described by `bound`.
    #[must_use]
    pub const fn new(op: &'static str, dest_present: bool, bound: BoundFacts) -> Self {
        Self {
            op,
            output: None,
            dest: dest_present,
            min_len: 0,
            bound,
            source: None,
            source_len: None,
        }
    }

    /// The primitive has a required output reference.
    #[must_use]
    pub const fn with_output(mut self, present: bool) -> Self {
        self.output = Some(present);
        self
    }

    /// The primitive needs at least `min` bytes of room.
    #[must_use]
    pub const fn with_min_len(mut self, min: usize) -> Self {
        self.min_len = min;
        self
    }

    /// The primitive reads a secondary buffer.
    #[must_use]
    pub const fn with_source(mut self, present: bool) -> Self {
        self.source = Some(present);
        self
    }

    /// The primitive takes an explicit secondary length.
    #[must_use]
    pub const fn with_source_len(mut self, slen: usize, zero_ok: bool) -> Self {
        self.source_len = Some(SourceLen {
            slen,
            zero_ok,
            size: DestSize::Unknown,
        });
        self
    }

    /// The secondary buffer's real capacity, when known. Only meaningful
    /// after [`Preconditions::with_source_len`].
    #[must_use]
    pub const fn with_source_size(mut self, size: DestSize) -> Self {
        if let Some(ref mut source_len) = self.source_len {
            source_len.size = size;
        }
        self
    }

    #[must_use]
    pub const fn op(&self) -> &'static str {
        self.op
    }

    fn limits(&self) -> Limits {
        self.bound.limits
    }

    fn run_stage(&self, stage: CheckStage) -> StrResult<()> {
        match stage {
            CheckStage::Output => match self.output {
                Some(false) => Err(StrError::NullPointer),
                _ => Ok(()),
            },
            CheckStage::Dest => {
                if self.dest {
                    Ok(())
                } else {
                    Err(StrError::NullPointer)
                }
            }
            CheckStage::ZeroLength => {
                if self.bound.dmax == 0 {
                    Err(StrError::ZeroLength)
                } else {
                    Ok(())
                }
            }
            CheckStage::MinLength => {
                if self.bound.dmax < self.min_len {
                    Err(StrError::LengthTooSmall)
                } else {
                    Ok(())
                }
            }
            CheckStage::Bound => guard(&self.bound).map(|_| ()),
            CheckStage::Source => match self.source {
                Some(false) => Err(StrError::NullPointer),
                _ => Ok(()),
            },
            CheckStage::SourceLength => match self.source_len {
                Some(SourceLen {
                    slen: 0,
                    zero_ok: false,
                    ..
                }) => Err(StrError::ZeroLength),
                Some(SourceLen {
                    slen,
                    size: DestSize::Known(cap),
                    ..
                }) if slen > cap => Err(StrError::DestinationOverflow),
                Some(SourceLen { slen, .. }) if slen > self.limits().ceiling() => {
                    Err(StrError::LengthTooLarge)
                }
                _ => Ok(()),
            },
        }
    }

    /// First violated stage and its error, without reporting it.
    #[must_use]
    pub fn first_violation(&self) -> Option<(CheckStage, StrError)> {
        DEFAULT_ORDER
            .iter()
            .find_map(|&stage| self.run_stage(stage).err().map(|err| (stage, err)))
    }

    /// Run the chain. On success returns the guarded `dmax`; on failure the
    /// violation is reported to the constraint handler and returned.
    pub fn check(&self) -> StrResult<usize> {
        match self.first_violation() {
            None => Ok(self.bound.dmax),
            Some((stage, err)) => Err(constraint::report(self.op, stage.detail(err), err)),
        }
    }
}

/// Shorthand for the common slice case: known capacity, no output reference.
pub fn check_slice(op: &'static str, buf: &[u8], dmax: usize, limits: Limits) -> StrResult<usize> {
    Preconditions::new(op, true, BoundFacts::slice(buf, dmax, limits)).check()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RSIZE_MAX_STR;

    fn raw(dmax: usize, size: DestSize) -> BoundFacts {
        BoundFacts::raw(0x1000, dmax, size, Limits::Str)
    }

    #[test]
    fn default_order_is_a_permutation_of_all_stages() {
        for (i, stage) in DEFAULT_ORDER.iter().enumerate() {
            assert_eq!(*stage as usize, i);
        }
    }

    #[test]
    fn valid_arguments_pass_and_return_dmax() {
        let pre = Preconditions::new("t", true, raw(8, DestSize::Known(8)))
            .with_output(true)
            .with_source(true)
            .with_source_len(3, false);
        assert_eq!(pre.first_violation(), None);
        assert_eq!(pre.check(), Ok(8));
    }

    #[test]
    fn output_null_wins_over_everything() {
        let pre = Preconditions::new("t", false, raw(0, DestSize::Unknown))
            .with_output(false)
            .with_source(false);
        assert_eq!(
            pre.first_violation(),
            Some((CheckStage::Output, StrError::NullPointer))
        );
    }

    #[test]
    fn dest_null_wins_over_zero_length() {
        let pre = Preconditions::new("t", false, raw(0, DestSize::Unknown)).with_output(true);
        assert_eq!(
            pre.first_violation(),
            Some((CheckStage::Dest, StrError::NullPointer))
        );
    }

    #[test]
    fn zero_length_wins_over_ceiling_and_source() {
        let pre = Preconditions::new("t", true, raw(0, DestSize::Known(0))).with_source(false);
        assert_eq!(
            pre.first_violation(),
            Some((CheckStage::ZeroLength, StrError::ZeroLength))
        );
    }

    #[test]
    fn ceiling_applies_only_when_size_unknown() {
        let unknown = Preconditions::new("t", true, raw(RSIZE_MAX_STR + 1, DestSize::Unknown));
        assert_eq!(
            unknown.first_violation(),
            Some((CheckStage::Bound, StrError::LengthTooLarge))
        );

        let known = Preconditions::new("t", true, raw(100, DestSize::Known(10)));
        assert_eq!(
            known.first_violation(),
            Some((CheckStage::Bound, StrError::DestinationOverflow))
        );
    }

    #[test]
    fn bound_wins_over_null_source() {
        let pre = Preconditions::new("t", true, raw(100, DestSize::Known(10))).with_source(false);
        assert_eq!(
            pre.first_violation(),
            Some((CheckStage::Bound, StrError::DestinationOverflow))
        );
    }

    #[test]
    fn source_stages_run_last() {
        let null_src = Preconditions::new("t", true, raw(4, DestSize::Known(4)))
            .with_source(false)
            .with_source_len(0, false);
        assert_eq!(
            null_src.first_violation(),
            Some((CheckStage::Source, StrError::NullPointer))
        );

        let zero_slen = Preconditions::new("t", true, raw(4, DestSize::Known(4)))
            .with_source(true)
            .with_source_len(0, false);
        assert_eq!(
            zero_slen.first_violation(),
            Some((CheckStage::SourceLength, StrError::ZeroLength))
        );

        let zero_ok = Preconditions::new("t", true, raw(4, DestSize::Known(4)))
            .with_source(true)
            .with_source_len(0, true);
        assert_eq!(zero_ok.first_violation(), None);

        let huge = Preconditions::new("t", true, raw(4, DestSize::Known(4)))
            .with_source_len(RSIZE_MAX_STR + 1, false);
        assert_eq!(
            huge.first_violation(),
            Some((CheckStage::SourceLength, StrError::LengthTooLarge))
        );
    }

    #[test]
    fn source_capacity_is_verified_when_known() {
        let pre = Preconditions::new("t", true, raw(16, DestSize::Known(16)))
            .with_source(true)
            .with_source_len(8, false)
            .with_source_size(DestSize::Known(4));
        assert_eq!(
            pre.first_violation(),
            Some((CheckStage::SourceLength, StrError::DestinationOverflow))
        );
        assert_eq!(
            CheckStage::SourceLength.detail(StrError::DestinationOverflow),
            "slen exceeds src"
        );
    }

    #[test]
    fn minimum_length_runs_between_zero_length_and_bound() {
        let short = Preconditions::new("t", true, raw(25, DestSize::Known(64))).with_min_len(26);
        assert_eq!(
            short.first_violation(),
            Some((CheckStage::MinLength, StrError::LengthTooSmall))
        );

        let zero = Preconditions::new("t", true, raw(0, DestSize::Known(64))).with_min_len(26);
        assert_eq!(
            zero.first_violation(),
            Some((CheckStage::ZeroLength, StrError::ZeroLength))
        );

        let short_and_lying =
            Preconditions::new("t", true, raw(25, DestSize::Known(10))).with_min_len(26);
        assert_eq!(
            short_and_lying.first_violation(),
            Some((CheckStage::MinLength, StrError::LengthTooSmall))
        );

        let enough = Preconditions::new("t", true, raw(26, DestSize::Known(26))).with_min_len(26);
        assert_eq!(enough.check(), Ok(26));
        assert_eq!(
            CheckStage::MinLength.detail(StrError::LengthTooSmall),
            "dmax is too small"
        );
    }

    #[test]
    fn details_name_the_constraint() {
        assert_eq!(CheckStage::ZeroLength.detail(StrError::ZeroLength), "dmax is 0");
        assert_eq!(
            CheckStage::Bound.detail(StrError::DestinationOverflow),
            "dmax exceeds dest"
        );
        assert_eq!(
            CheckStage::Bound.detail(StrError::LengthTooLarge),
            "dmax exceeds max"
        );
    }

    #[test]
    fn check_slice_uses_slice_length_as_capacity() {
        let buf = [0u8; 10];
        assert_eq!(check_slice("t", &buf, 10, Limits::Str), Ok(10));
        assert_eq!(
            check_slice("t", &buf, 100, Limits::Str),
            Err(StrError::DestinationOverflow)
        );
        assert_eq!(check_slice("t", &buf, 0, Limits::Str), Err(StrError::ZeroLength));
    }
}
