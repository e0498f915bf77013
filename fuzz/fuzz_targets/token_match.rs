//! Fuzz the command-token matcher: classification must agree with the
//! positional checks and never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use robot_proto::command::{TOKEN_LEN, admissible, classify};

fuzz_target!(|data: &[u8]| {
    if data.len() < TOKEN_LEN {
        return;
    }
    let mut token = [0_u8; TOKEN_LEN];
    token.copy_from_slice(&data[..TOKEN_LEN]);

    let classified = classify(&token);
    let every_position_admissible =
        token.iter().enumerate().all(|(position, &byte)| admissible(position, byte));

    // A classified token always passes the positional scan; the reverse
    // does not hold (cross-overs).
    if classified.is_some() {
        assert!(every_position_admissible);
    }
});
