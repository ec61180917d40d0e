#![no_main]
use libfuzzer_sys::fuzz_target;
use safestr_core::SafetyLevel;
use safestr_core::string::{bounded_len, strcat_s_with_level, strcpy_s_with_level};

// Input layout: [flags, dmax, src...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let level = if data[0] & 1 == 0 {
        SafetyLevel::Strict
    } else {
        SafetyLevel::Hardened
    };
    let dmax = usize::from(data[1]);
    let src = &data[2..];
    let mut dest = vec![0xAAu8; dmax];

    match strcpy_s_with_level(level, &mut dest, dmax, src) {
        Ok(len) => {
            assert!(len < dmax);
            assert_eq!(dest[len], 0);
            assert_eq!(&dest[..len], &src[..len]);
        }
        Err(_) if dmax > 0 => assert_eq!(dest[0], 0),
        Err(_) => {}
    }

    if dmax > 0 && bounded_len(&dest, dmax) < dmax {
        if let Ok(len) = strcat_s_with_level(level, &mut dest, dmax, src) {
            assert!(len < dmax);
            assert_eq!(dest[len], 0);
        }
    }
});
