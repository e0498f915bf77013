//! Per-connection watchdog.
//!
//! Bounds the wall-clock time one connection's handler may run,
//! whichever state it is in. Expiry is abrupt: the handler future is
//! dropped at whatever suspension point it had reached, the peer gets a
//! best-effort `502 TIMEOUT`, and the transport is shut down. One
//! watchdog per connection; none of this touches other connections.

use std::time::Duration;

use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    time,
};
use tracing::warn;

use robot_core::{ByteCursor, Session, SessionError, blob::BlobStore};
use robot_proto::Reply;

/// Watchdog limits for one connection.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Wall-clock budget for the whole connection.
    pub deadline: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self { deadline: Duration::from_secs(45) }
    }
}

/// How a supervised session ended.
#[derive(Debug)]
pub enum Outcome {
    /// The handler finished on its own, cleanly or with a transport
    /// failure.
    Completed(Result<(), SessionError>),
    /// The deadline fired; the peer was notified and the transport shut
    /// down.
    TimedOut,
}

/// Run one session under the configured deadline.
///
/// On expiry the `502 TIMEOUT` write and the shutdown are both
/// best-effort; a peer that vanished already gets neither. A transfer
/// interrupted this way may leave a partial blob behind; the handler is
/// not resumed to clean it up.
pub async fn supervise<B, R, W>(
    config: &SupervisorConfig,
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
    writer: &mut W,
) -> Outcome
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let result = time::timeout(config.deadline, session.run(cursor, &mut *writer)).await;
    match result {
        Ok(completed) => Outcome::Completed(completed),
        Err(_elapsed) => {
            warn!(session = session.id(), deadline = ?config.deadline, "connection timed out");
            let _ = writer.write_all(Reply::Timeout.wire()).await;
            let _ = writer.shutdown().await;
            Outcome::TimedOut
        },
    }
}
