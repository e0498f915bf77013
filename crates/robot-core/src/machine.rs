//! The Robot protocol state machine.
//!
//! A closed set of states, stepped one at a time by the session driver.
//! Each step consumes exactly the bytes its state needs from the cursor,
//! decides, and yields at most one status line plus the next state. The
//! machine is strictly linear through the login handshake; after login it
//! cycles between awaiting a command token and consuming the matching
//! body. There is no way back into the login phase and no retry of it.
//!
//! ```text
//! Initial ──200──> AwaitingLogin ──201──> AwaitingPassword ──202──┐
//!                                              │500              │
//!                                              v                 v
//!                                         Disconnected <── AwaitingMessage
//!                                              ^501           │       │
//!                                              │       INFO │       │ FOTO
//!                                              │            v       v
//!                                              │    AwaitingInfoBody AwaitingFotoBody
//!                                              │        │202             │202/300
//!                                              └────────┴────────────────┘
//! ```
//!
//! Every parse or validation failure is settled here, as a status line;
//! the only errors that escape are transport and storage loss.

use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use robot_proto::{
    ChecksumAccumulator, Command, ProtocolError, Reply,
    command::{self, TOKEN_LEN},
    number::{self, TRAILER_LEN},
};

use crate::{
    blob::{BlobSink, BlobStore},
    cursor::ByteCursor,
    error::SessionError,
    session::Session,
};

/// The login identifier must open with this token, case-insensitively.
const IDENTITY_PREFIX: &[u8] = b"Robot";

/// Discrete protocol states, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// Nothing consumed yet; the greeting goes out first.
    Initial,
    /// Greeting sent; the identifier line is being read.
    AwaitingLogin,
    /// Identifier consumed; the numeric password line is being read.
    AwaitingPassword,
    /// Logged in; a five-byte command token is expected.
    AwaitingMessage,
    /// `INFO ` consumed; free text up to CRLF follows.
    AwaitingInfoBody,
    /// `FOTO ` consumed; length, payload and checksum trailer follow.
    AwaitingFotoBody,
    /// Terminal. No further reads or writes.
    Disconnected,
}

/// Outcome of stepping one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Status line to send, if the state produced one.
    pub reply: Option<Reply>,
    /// State to enter next.
    pub next: ProtocolState,
}

impl Step {
    fn reply(reply: Reply, next: ProtocolState) -> Self {
        Self { reply: Some(reply), next }
    }

    fn pass(next: ProtocolState) -> Self {
        Self { reply: None, next }
    }
}

/// Metadata of a FOTO payload while it is being ingested.
struct PendingTransfer<S> {
    expected_bytes: u32,
    checksum: ChecksumAccumulator,
    sink: S,
}

/// Run one step of the machine in the session's current state.
pub(crate) async fn step<B, R>(
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
) -> Result<Step, SessionError>
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
{
    match session.state {
        ProtocolState::Initial => Ok(Step::reply(Reply::Login, ProtocolState::AwaitingLogin)),
        ProtocolState::AwaitingLogin => await_login(session, cursor).await,
        ProtocolState::AwaitingPassword => await_password(session, cursor).await,
        ProtocolState::AwaitingMessage => await_message(session, cursor).await,
        ProtocolState::AwaitingInfoBody => await_info_body(session, cursor).await,
        ProtocolState::AwaitingFotoBody => await_foto_body(session, cursor).await,
        ProtocolState::Disconnected => Ok(Step::pass(ProtocolState::Disconnected)),
    }
}

/// Scan the identifier line, deriving the shared secret.
///
/// Every scanned byte is summed as it arrives; when the CRLF terminator
/// is recognised, the CR that was already counted is taken back out, so
/// the secret is the sum over the identifier content alone. The first
/// five bytes received are captured verbatim for the identity check.
async fn await_login<B, R>(
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
) -> Result<Step, SessionError>
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
{
    let mut secret: i64 = 0;
    let mut opening = [0_u8; IDENTITY_PREFIX.len()];
    let mut seen = 0_usize;
    let mut last = 0_u8;

    loop {
        let Some(current) = cursor.read_byte().await? else {
            return Err(SessionError::TransportClosed);
        };
        if seen < opening.len() {
            opening[seen] = current;
            seen += 1;
        }
        if last == b'\r' && current == b'\n' {
            secret -= i64::from(b'\r');
            break;
        }
        last = current;
        secret += i64::from(current);
    }

    session.secret = secret;
    session.identity_valid =
        seen == opening.len() && opening.eq_ignore_ascii_case(IDENTITY_PREFIX);
    debug!(
        session = session.id,
        secret,
        identity_valid = session.identity_valid,
        "identifier consumed"
    );
    Ok(Step::reply(Reply::Password, ProtocolState::AwaitingPassword))
}

/// Scan the password line and settle the login.
///
/// Only ASCII digits are retained from the line; whatever they parse to
/// is compared against the derived secret. No digits, an overflowing
/// value, a mismatch, or a bad identity all end the same way: `500` and
/// a closed connection. There is no second attempt.
async fn await_password<B, R>(
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
) -> Result<Step, SessionError>
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
{
    let mut digits = Vec::new();
    let mut last = 0_u8;

    loop {
        let Some(current) = cursor.read_byte().await? else {
            return Err(SessionError::TransportClosed);
        };
        if last == b'\r' && current == b'\n' {
            break;
        }
        last = current;
        if current.is_ascii_digit() {
            digits.push(current);
        }
    }

    let submitted = number::parse_password(&digits);
    if submitted.is_none() {
        warn!(
            session = session.id,
            error = %ProtocolError::MalformedNumber { field: "password" },
            "login rejected"
        );
    }

    if session.identity_valid && submitted == Some(session.secret) {
        info!(session = session.id, "login accepted");
        Ok(Step::reply(Reply::Ok, ProtocolState::AwaitingMessage))
    } else {
        warn!(session = session.id, identity_valid = session.identity_valid, "login failed");
        Ok(Step::reply(Reply::LoginFailed, ProtocolState::Disconnected))
    }
}

/// Read the five-byte command token.
///
/// Rejection is immediate: the first byte (or end of stream) that keeps
/// neither literal reachable produces `501` without consuming anything
/// further.
async fn await_message<B, R>(
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
) -> Result<Step, SessionError>
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
{
    let mut token = [0_u8; TOKEN_LEN];
    for (position, slot) in token.iter_mut().enumerate() {
        match cursor.read_byte().await? {
            Some(byte) if command::admissible(position, byte) => *slot = byte,
            other => {
                warn!(
                    session = session.id,
                    error = %ProtocolError::SyntaxMismatch { position, byte: other },
                    "command rejected"
                );
                return Ok(Step::reply(Reply::SyntaxError, ProtocolState::Disconnected));
            },
        }
    }

    match command::classify(&token) {
        Some(Command::Info) => Ok(Step::pass(ProtocolState::AwaitingInfoBody)),
        Some(Command::Foto) => Ok(Step::pass(ProtocolState::AwaitingFotoBody)),
        None => {
            warn!(
                session = session.id,
                error = %ProtocolError::SyntaxMismatch { position: TOKEN_LEN, byte: None },
                token = %String::from_utf8_lossy(&token),
                "command rejected"
            );
            Ok(Step::reply(Reply::SyntaxError, ProtocolState::Disconnected))
        },
    }
}

/// Consume the INFO body up to CRLF and forward it to the log.
async fn await_info_body<B, R>(
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
) -> Result<Step, SessionError>
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
{
    let mut text = Vec::new();
    let mut last = 0_u8;

    loop {
        let Some(current) = cursor.read_byte().await? else {
            return Err(SessionError::TransportClosed);
        };
        if last == b'\r' && current == b'\n' {
            // The CR already sits at the end of the buffer.
            text.pop();
            break;
        }
        last = current;
        text.push(current);
    }

    info!(session = session.id, text = %String::from_utf8_lossy(&text), "info message");
    Ok(Step::reply(Reply::Ok, ProtocolState::AwaitingMessage))
}

/// Ingest a FOTO transfer: length, payload, checksum trailer.
async fn await_foto_body<B, R>(
    session: &mut Session<B>,
    cursor: &mut ByteCursor<R>,
) -> Result<Step, SessionError>
where
    B: BlobStore,
    R: AsyncRead + Unpin + Send,
{
    // Length phase.
    let Some(expected_bytes) = read_length(cursor).await? else {
        warn!(
            session = session.id,
            error = %ProtocolError::MalformedNumber { field: "foto length" },
            "transfer rejected"
        );
        return Ok(Step::reply(Reply::SyntaxError, ProtocolState::Disconnected));
    };

    session.transfers += 1;
    let transfer = session.transfers;
    debug!(session = session.id, transfer, expected_bytes, "ingesting photo");

    let sink = session.store.open(transfer).await.map_err(SessionError::Blob)?;
    let mut pending =
        PendingTransfer { expected_bytes, checksum: ChecksumAccumulator::new(), sink };

    // Payload phase. A stream that dies here leaves nothing behind: the
    // partial blob is removed before the session aborts.
    for _ in 0..pending.expected_bytes {
        let byte = match cursor.read_byte().await {
            Ok(Some(byte)) => byte,
            Ok(None) => {
                let _ = pending.sink.remove().await;
                return Err(SessionError::TransportClosed);
            },
            Err(error) => {
                let _ = pending.sink.remove().await;
                return Err(error.into());
            },
        };
        pending.checksum.add(byte);
        if let Err(error) = pending.sink.write(byte).await {
            let _ = pending.sink.remove().await;
            return Err(SessionError::Blob(error));
        }
    }
    pending.sink.close().await.map_err(SessionError::Blob)?;

    // Trailer phase. The payload is complete but unvalidated, so it does
    // not survive a truncated trailer either.
    let mut trailer = [0_u8; TRAILER_LEN];
    for slot in &mut trailer {
        let Some(byte) = cursor.read_byte().await? else {
            let _ = pending.sink.remove().await;
            return Err(SessionError::TransportClosed);
        };
        *slot = byte;
    }
    let sent = number::parse_hex_trailer(&trailer);

    if pending.checksum.matches(sent) {
        info!(
            session = session.id,
            transfer,
            checksum = pending.checksum.value(),
            "photo accepted"
        );
        Ok(Step::reply(Reply::Ok, ProtocolState::AwaitingMessage))
    } else {
        warn!(
            session = session.id,
            transfer,
            error = %ProtocolError::ChecksumMismatch {
                computed: pending.checksum.value(),
                sent,
            },
            "photo rejected"
        );
        pending.sink.remove().await.map_err(SessionError::Blob)?;
        Ok(Step::reply(Reply::BadChecksum, ProtocolState::AwaitingMessage))
    }
}

/// Length phase of a FOTO transfer: ASCII digits up to the first
/// whitespace byte. Any non-digit stops the scan (and is consumed);
/// whatever was collected must parse.
async fn read_length<R>(cursor: &mut ByteCursor<R>) -> Result<Option<u32>, SessionError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut digits = Vec::new();
    loop {
        let Some(current) = cursor.read_byte().await? else {
            return Err(SessionError::TransportClosed);
        };
        if !current.is_ascii_digit() {
            break;
        }
        digits.push(current);
    }
    Ok(number::parse_length(&digits))
}
