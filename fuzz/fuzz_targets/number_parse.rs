//! Fuzz the ASCII number parsers: arbitrary input must never panic and
//! digit-only input must always parse.

#![no_main]

use libfuzzer_sys::fuzz_target;
use robot_proto::number::{TRAILER_LEN, parse_hex_trailer, parse_length, parse_password};

fuzz_target!(|data: &[u8]| {
    let _ = parse_password(data);
    let _ = parse_length(data);

    if data.len() >= TRAILER_LEN {
        let mut trailer = [0_u8; TRAILER_LEN];
        trailer.copy_from_slice(&data[..TRAILER_LEN]);
        let parsed = parse_hex_trailer(&trailer);
        if trailer.iter().all(u8::is_ascii_hexdigit) {
            assert!(parsed.is_some());
        } else {
            assert!(parsed.is_none());
        }
    }
});
