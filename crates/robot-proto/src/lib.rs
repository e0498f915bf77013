//! Wire vocabulary for the Robot protocol.
//!
//! The protocol mixes CRLF-terminated ASCII lines with length-prefixed
//! binary: the server answers with fixed status lines, the client sends an
//! identifier, a numeric password, and then `INFO `/`FOTO ` commands. This
//! crate holds the pieces both directions agree on: the status lines, the
//! five-byte command-token matcher, ASCII number parsing, and the running
//! checksum carried by FOTO transfers. No I/O happens here; the state
//! machine in `robot-core` drives these against a byte stream.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod command;
pub mod errors;
pub mod number;
pub mod reply;

pub use checksum::ChecksumAccumulator;
pub use command::Command;
pub use errors::ProtocolError;
pub use reply::Reply;
