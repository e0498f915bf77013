//! Running checksum for FOTO payloads.

use crate::number::{TRAILER_LEN, parse_hex_trailer};

/// Running sum of payload byte values.
///
/// Accumulation is 32-bit unsigned and wraps on overflow; the parsed
/// hexadecimal trailer uses the same width, so the comparison is exact.
/// A fresh accumulator is constructed at the start of every transfer;
/// there is no reset in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecksumAccumulator {
    sum: u32,
}

impl ChecksumAccumulator {
    /// Accumulator at zero, ready for a new transfer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one payload byte into the sum.
    pub fn add(&mut self, byte: u8) {
        self.sum = self.sum.wrapping_add(u32::from(byte));
    }

    /// Current sum.
    #[must_use]
    pub fn value(self) -> u32 {
        self.sum
    }

    /// Compare against the value a trailer parsed to.
    ///
    /// The unparsable-trailer sentinel (`None`) never matches.
    #[must_use]
    pub fn matches(self, sent: Option<u32>) -> bool {
        sent == Some(self.sum)
    }

    /// Convenience: compare directly against raw trailer bytes.
    #[must_use]
    pub fn matches_trailer(self, trailer: &[u8; TRAILER_LEN]) -> bool {
        self.matches(parse_hex_trailer(trailer))
    }
}
