//! One-byte-at-a-time view of the inbound stream.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Thin wrapper over the transport's inbound byte stream.
///
/// The protocol scans its input strictly byte by byte (CRLF lines, a
/// five-byte token, counted binary payloads), so this is the only read
/// primitive the machine gets. End of stream is an ordinary `Ok(None)`,
/// not an error; which state observes it decides whether that is a
/// syntax rejection or a transport loss.
///
/// Callers should hand in a buffered reader when the underlying transport
/// is unbuffered; the cursor itself does not buffer.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    eof: bool,
}

impl<R: AsyncRead + Unpin> ByteCursor<R> {
    /// Wrap an inbound stream.
    pub fn new(inner: R) -> Self {
        Self { inner, eof: false }
    }

    /// Read one byte; `None` once the peer has closed its half.
    pub async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }
        match self.inner.read_u8().await {
            Ok(byte) => Ok(Some(byte)),
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                self.eof = true;
                Ok(None)
            },
            Err(error) => Err(error),
        }
    }

    /// Whether the stream may still produce bytes.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_bytes_then_signals_end() {
        let mut cursor = ByteCursor::new(&b"ab"[..]);
        assert!(cursor.has_more());
        assert_eq!(cursor.read_byte().await.unwrap(), Some(b'a'));
        assert_eq!(cursor.read_byte().await.unwrap(), Some(b'b'));
        assert_eq!(cursor.read_byte().await.unwrap(), None);
        assert!(!cursor.has_more());
        // End of stream is sticky.
        assert_eq!(cursor.read_byte().await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_stream_is_immediately_exhausted() {
        let mut cursor = ByteCursor::new(&b""[..]);
        assert_eq!(cursor.read_byte().await.unwrap(), None);
        assert!(!cursor.has_more());
    }
}
