#![no_main]
use libfuzzer_sys::fuzz_target;
use safestr_core::StrError;
use safestr_core::string::{first_char, strfirstchar_s, strlastchar_s};

// Input layout: [c, dmax_lo, dmax_hi, buffer...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let c = data[0];
    let dmax = usize::from(u16::from_le_bytes([data[1], data[2]]));
    let buf = &data[3..];

    match strlastchar_s(buf, dmax, c) {
        Ok(at) => {
            assert!(at < dmax && at < buf.len());
            assert_eq!(buf[at], c);
            assert!(c != 0);
            assert!(!buf[..at].contains(&0));
            assert!(!buf[at + 1..dmax].iter().take_while(|&&b| b != 0).any(|&b| b == c));
        }
        Err(StrError::ZeroLength) => assert_eq!(dmax, 0),
        Err(StrError::DestinationOverflow) => assert!(dmax > buf.len()),
        Err(StrError::NotFound) => {
            assert!(!buf[..dmax].iter().take_while(|&&b| b != 0).any(|&b| b == c));
        }
        Err(other) => panic!("unexpected error {other:?}"),
    }

    if let Ok(first) = strfirstchar_s(buf, dmax, c) {
        assert_eq!(Some(first), first_char(&buf[..dmax], c));
    }
});
