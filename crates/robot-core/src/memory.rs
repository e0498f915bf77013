//! In-memory blob store.
//!
//! Backs the deterministic machine tests; also handy for tools that want
//! to receive photos without touching the filesystem. Stores are cheap
//! handles onto shared state, so a test can keep a clone and inspect what
//! a session stored after the session has consumed the original.

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::blob::{BlobSink, BlobStore};

type Blobs = Arc<Mutex<HashMap<u32, Vec<u8>>>>;

/// Blob store keeping completed blobs in a shared map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Blobs,
}

impl MemoryBlobStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a completed transfer, if it was committed and not
    /// removed.
    #[must_use]
    pub fn blob(&self, transfer: u32) -> Option<Vec<u8>> {
        self.blobs.lock().ok()?.get(&transfer).cloned()
    }

    /// Number of blobs currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    /// Whether no blob is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    type Sink = MemoryBlobSink;

    async fn open(&mut self, transfer: u32) -> io::Result<MemoryBlobSink> {
        Ok(MemoryBlobSink { transfer, buffer: Vec::new(), blobs: Arc::clone(&self.blobs) })
    }
}

/// One in-flight transfer; bytes are committed to the store on close.
#[derive(Debug)]
pub struct MemoryBlobSink {
    transfer: u32,
    buffer: Vec<u8>,
    blobs: Blobs,
}

#[async_trait]
impl BlobSink for MemoryBlobSink {
    async fn write(&mut self, byte: u8) -> io::Result<()> {
        self.buffer.push(byte);
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        let blob = std::mem::take(&mut self.buffer);
        self.blobs
            .lock()
            .map_err(|_| io::Error::other("blob store lock poisoned"))?
            .insert(self.transfer, blob);
        Ok(())
    }

    async fn remove(&mut self) -> io::Result<()> {
        self.buffer.clear();
        self.blobs
            .lock()
            .map_err(|_| io::Error::other("blob store lock poisoned"))?
            .remove(&self.transfer);
        Ok(())
    }
}
