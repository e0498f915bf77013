//! Durable storage capability for FOTO payloads.
//!
//! Each session carries its own [`BlobStore`], and each transfer opens a
//! fresh [`BlobSink`] under a per-transfer identifier, so independent
//! sessions never contend for a shared file handle. The filesystem
//! implementation lives in the server crate; [`crate::memory`] provides an
//! in-memory one for deterministic tests.

use std::io;

use async_trait::async_trait;

/// Factory for per-transfer blob sinks, one store per session.
///
/// Implementations must tolerate concurrent use by independent sessions,
/// which is guaranteed structurally as long as the identifiers they derive
/// file names from are distinct per session.
#[async_trait]
pub trait BlobStore: Send {
    /// Sink type produced for each transfer.
    type Sink: BlobSink;

    /// Open the sink for transfer number `transfer` of this session.
    async fn open(&mut self, transfer: u32) -> io::Result<Self::Sink>;
}

/// Destination for one transferred payload.
#[async_trait]
pub trait BlobSink: Send {
    /// Append one payload byte.
    async fn write(&mut self, byte: u8) -> io::Result<()>;

    /// Flush buffers and close the blob; the durability point.
    async fn close(&mut self) -> io::Result<()>;

    /// Delete the blob, closed or not. Used when the checksum fails or
    /// the transfer is cut short.
    async fn remove(&mut self) -> io::Result<()>;
}
