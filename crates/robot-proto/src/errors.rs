//! Protocol violation kinds.
//!
//! None of these escape the state machine: every one is converted into a
//! status line by the state that detected it. They exist so decision
//! sites can log a precise cause before answering the peer.

use thiserror::Error;

/// A protocol violation detected while scanning client input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// A numeric field could not be parsed (login password, FOTO length,
    /// or checksum trailer).
    #[error("malformed number in {field}")]
    MalformedNumber {
        /// Which field failed to parse.
        field: &'static str,
    },

    /// The command token matched neither `INFO ` nor `FOTO `.
    #[error("command token rejected at position {position}, byte {byte:?}")]
    SyntaxMismatch {
        /// Zero-based token position at which the scan stopped.
        position: usize,
        /// Offending byte, or `None` at end of stream.
        byte: Option<u8>,
    },

    /// The computed payload checksum does not match the trailer.
    #[error("checksum mismatch: computed {computed:#06x}, trailer {sent:?}")]
    ChecksumMismatch {
        /// Running sum over the received payload.
        computed: u32,
        /// Parsed trailer value, `None` when unparsable.
        sent: Option<u32>,
    },
}
