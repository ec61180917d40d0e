//! Property tests: no primitive reads or writes past its declared bound.
//!
//! Run: cargo test -p safestr-core --test bounded_properties

use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;
use safestr_core::SafetyLevel;
use safestr_core::StrError;
use safestr_core::string::{
    strcat_s_with_level, strcpy_s_with_level, strfirstchar_s, strlastchar_s, strnlen_s,
};

fn naive_last(buf: &[u8], dmax: usize, c: u8) -> Option<usize> {
    let window = &buf[..dmax];
    let end = window.iter().position(|&b| b == 0).unwrap_or(window.len());
    window[..end].iter().rposition(|&b| b == c)
}

#[quickcheck]
fn last_char_matches_reference(buf: Vec<u8>, dmax: usize, c: u8) -> TestResult {
    if buf.is_empty() {
        return TestResult::discard();
    }
    let dmax = 1 + dmax % buf.len();
    let got = strlastchar_s(&buf, dmax, c);
    match naive_last(&buf, dmax, c) {
        Some(i) => TestResult::from_bool(got == Ok(i)),
        None => TestResult::from_bool(got == Err(StrError::NotFound)),
    }
}

#[quickcheck]
fn search_result_lies_inside_bound_and_string(buf: Vec<u8>, dmax: usize, c: u8) -> TestResult {
    if buf.is_empty() {
        return TestResult::discard();
    }
    let dmax = 1 + dmax % buf.len();
    let len = strnlen_s(&buf, dmax);
    for found in [strlastchar_s(&buf, dmax, c), strfirstchar_s(&buf, dmax, c)] {
        if let Ok(i) = found {
            if i >= dmax || i >= len || buf[i] != c {
                return TestResult::failed();
            }
        }
    }
    TestResult::passed()
}

#[quickcheck]
fn oversized_bound_never_scans(buf: Vec<u8>, extra: usize, c: u8) -> bool {
    let dmax = buf.len().saturating_add(1 + extra % 64);
    strlastchar_s(&buf, dmax, c) == Err(StrError::DestinationOverflow)
}

#[test]
fn hardened_copy_always_terminates_within_bound() {
    fn prop(src: Vec<u8>, cap: u8, dmax: u8) -> TestResult {
        let cap = usize::from(cap) + 1;
        let dmax = 1 + usize::from(dmax) % cap;
        let mut dest = vec![0xaa; cap];
        match strcpy_s_with_level(SafetyLevel::Hardened, &mut dest, dmax, &src) {
            Ok(len) => TestResult::from_bool(
                len < dmax && dest[len] == 0 && dest[dmax..].iter().all(|&b| b == 0xaa),
            ),
            Err(_) => TestResult::failed(),
        }
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<u8>, u8, u8) -> TestResult);
}

#[test]
fn strict_rejection_only_clears_first_byte() {
    fn prop(src: Vec<u8>, prefix: Vec<u8>, dmax: u8) -> TestResult {
        let dmax = 2 + usize::from(dmax) % 32;
        let mut dest = vec![0xaa; dmax];
        let keep = prefix.iter().take(dmax - 1).take_while(|&&b| b != 0).count();
        dest[..keep].copy_from_slice(&prefix[..keep]);
        dest[keep] = 0;
        let before = dest.clone();
        match strcat_s_with_level(SafetyLevel::Strict, &mut dest, dmax, &src) {
            Err(StrError::NoSpace) => {
                TestResult::from_bool(dest[0] == 0 && dest[1..] == before[1..])
            }
            Ok(len) => TestResult::from_bool(len < dmax && dest[len] == 0),
            Err(_) => TestResult::failed(),
        }
    }
    QuickCheck::new().quickcheck(prop as fn(Vec<u8>, Vec<u8>, u8) -> TestResult);
}
