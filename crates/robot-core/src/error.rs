//! Session failure modes.

use std::io;

use thiserror::Error;

/// Unrecoverable failure of a session.
///
/// Protocol violations never appear here: the states convert them into
/// status lines locally and the session carries on or closes cleanly.
/// What remains is the transport or the storage giving out underneath us,
/// after which no response is attempted.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Peer closed the stream in the middle of a read the protocol
    /// requires to finish.
    #[error("transport closed mid-message")]
    TransportClosed,

    /// Transport-level I/O failure on read or write.
    #[error("transport error")]
    Transport(#[from] io::Error),

    /// Blob storage failure while ingesting a FOTO payload.
    #[error("blob storage error")]
    Blob(#[source] io::Error),
}
