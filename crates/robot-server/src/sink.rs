//! Filesystem blob storage.
//!
//! Photos land under a root directory as one file per transfer. The file
//! name carries the session and transfer numbers, so concurrent sessions
//! never touch each other's files and repeated transfers on one session
//! never overwrite earlier ones.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{
    fs,
    io::{AsyncWriteExt, BufWriter},
};
use tracing::debug;

use robot_core::blob::{BlobSink, BlobStore};

/// Blob store for one session, rooted at a photo directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    session: u64,
}

impl FsBlobStore {
    /// Store for session `session`, writing under `root`.
    pub fn new(root: impl Into<PathBuf>, session: u64) -> Self {
        Self { root: root.into(), session }
    }

    /// File path a given transfer writes to.
    #[must_use]
    pub fn path_for(&self, transfer: u32) -> PathBuf {
        self.root.join(format!("photo-{}-{}.jpg", self.session, transfer))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    type Sink = FsBlobSink;

    async fn open(&mut self, transfer: u32) -> io::Result<FsBlobSink> {
        let path = self.path_for(transfer);
        let file = fs::File::create(&path).await?;
        debug!(path = %path.display(), "photo file opened");
        Ok(FsBlobSink { writer: Some(BufWriter::new(file)), path })
    }
}

/// One photo file being written.
#[derive(Debug)]
pub struct FsBlobSink {
    writer: Option<BufWriter<fs::File>>,
    path: PathBuf,
}

impl FsBlobSink {
    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BlobSink for FsBlobSink {
    async fn write(&mut self, byte: u8) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_u8(byte).await,
            None => Err(io::Error::other("photo file already closed")),
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.into_inner().sync_all().await?;
        }
        Ok(())
    }

    async fn remove(&mut self) -> io::Result<()> {
        // Release the handle before unlinking.
        self.writer = None;
        fs::remove_file(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_close_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsBlobStore::new(dir.path(), 3);

        let mut sink = store.open(1).await.unwrap();
        for byte in [0x01, 0x02, 0x03] {
            sink.write(byte).await.unwrap();
        }
        sink.close().await.unwrap();

        let stored = fs::read(dir.path().join("photo-3-1.jpg")).await.unwrap();
        assert_eq!(stored, vec![0x01, 0x02, 0x03]);
    }

    #[tokio::test]
    async fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsBlobStore::new(dir.path(), 3);

        let mut sink = store.open(1).await.unwrap();
        sink.write(0xAB).await.unwrap();
        sink.close().await.unwrap();
        assert!(sink.path().exists());

        sink.remove().await.unwrap();
        assert!(!sink.path().exists());
    }

    #[tokio::test]
    async fn remove_works_on_a_partial_blob() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsBlobStore::new(dir.path(), 3);

        let mut sink = store.open(1).await.unwrap();
        sink.write(0x01).await.unwrap();
        // No close: the transfer was cut short.
        sink.remove().await.unwrap();
        assert!(!sink.path().exists());
    }

    #[tokio::test]
    async fn sessions_and_transfers_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let first = FsBlobStore::new(dir.path(), 1);
        let second = FsBlobStore::new(dir.path(), 2);

        assert_ne!(first.path_for(1), first.path_for(2));
        assert_ne!(first.path_for(1), second.path_for(1));
    }

    #[tokio::test]
    async fn write_after_close_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsBlobStore::new(dir.path(), 3);

        let mut sink = store.open(1).await.unwrap();
        sink.close().await.unwrap();
        assert!(sink.write(0x01).await.is_err());
    }
}
