//! Per-connection session state and driver loop.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::{
    blob::BlobStore,
    cursor::ByteCursor,
    error::SessionError,
    machine::{self, ProtocolState},
};

/// State of one accepted connection.
///
/// Holds what survives across states: the identifier-derived secret (set
/// exactly once, before any password comparison), the identity check
/// outcome, and the transfer counter that keys blob storage. The current
/// [`ProtocolState`] selects what the next bytes mean; once it reaches
/// [`ProtocolState::Disconnected`] the session performs no further reads
/// or writes.
#[derive(Debug)]
pub struct Session<B> {
    pub(crate) id: u64,
    pub(crate) state: ProtocolState,
    pub(crate) secret: i64,
    pub(crate) identity_valid: bool,
    pub(crate) transfers: u32,
    pub(crate) store: B,
}

impl<B: BlobStore> Session<B> {
    /// Fresh session for connection `id`, storing photos into `store`.
    pub fn new(id: u64, store: B) -> Self {
        Self {
            id,
            state: ProtocolState::Initial,
            secret: 0,
            identity_valid: false,
            transfers: 0,
            store,
        }
    }

    /// Connection identifier, for logging and correlation only.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current protocol state.
    #[must_use]
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Drive the machine until the session disconnects.
    ///
    /// One iteration per state: read what the state needs, decide, write
    /// the status line (if the state produced one), transition. Transport
    /// loss aborts the loop without a response; everything else ends in a
    /// clean [`ProtocolState::Disconnected`].
    pub async fn run<R, W>(
        &mut self,
        cursor: &mut ByteCursor<R>,
        writer: &mut W,
    ) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        while self.state != ProtocolState::Disconnected {
            let step = machine::step(self, cursor).await?;
            if let Some(reply) = step.reply {
                writer.write_all(reply.wire()).await?;
                writer.flush().await?;
                debug!(session = self.id, %reply, "sent");
            }
            debug!(session = self.id, from = ?self.state, to = ?step.next, "state transition");
            self.state = step.next;
        }
        Ok(())
    }
}
