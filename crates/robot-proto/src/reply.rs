//! Server status lines.
//!
//! Every server-to-client message is one of seven fixed ASCII lines,
//! CRLF-terminated. Replies in the 2xx range keep the connection open;
//! 5xx replies (and `300 BAD CHECKSUM` excepted) are followed by a close.

use std::fmt;

/// Line terminator for status lines and text commands.
pub const CRLF: &[u8] = b"\r\n";

/// A server-to-client status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// `200 LOGIN`: greeting, an identifier line is expected next.
    Login,
    /// `201 PASSWORD`: the numeric password line is expected next.
    Password,
    /// `202 OK`: command accepted.
    Ok,
    /// `300 BAD CHECKSUM`: FOTO payload checksum mismatch; the
    /// connection stays open.
    BadChecksum,
    /// `500 LOGIN FAILED`: authentication failed; the connection closes.
    LoginFailed,
    /// `501 SYNTAX ERROR`: malformed command; the connection closes.
    SyntaxError,
    /// `502 TIMEOUT`: supervisor-forced timeout; the connection closes.
    Timeout,
}

impl Reply {
    /// Numeric status code.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Login => 200,
            Self::Password => 201,
            Self::Ok => 202,
            Self::BadChecksum => 300,
            Self::LoginFailed => 500,
            Self::SyntaxError => 501,
            Self::Timeout => 502,
        }
    }

    /// Status line without the terminator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "200 LOGIN",
            Self::Password => "201 PASSWORD",
            Self::Ok => "202 OK",
            Self::BadChecksum => "300 BAD CHECKSUM",
            Self::LoginFailed => "500 LOGIN FAILED",
            Self::SyntaxError => "501 SYNTAX ERROR",
            Self::Timeout => "502 TIMEOUT",
        }
    }

    /// Complete wire form, CRLF included.
    #[must_use]
    pub fn wire(self) -> &'static [u8] {
        match self {
            Self::Login => b"200 LOGIN\r\n",
            Self::Password => b"201 PASSWORD\r\n",
            Self::Ok => b"202 OK\r\n",
            Self::BadChecksum => b"300 BAD CHECKSUM\r\n",
            Self::LoginFailed => b"500 LOGIN FAILED\r\n",
            Self::SyntaxError => b"501 SYNTAX ERROR\r\n",
            Self::Timeout => b"502 TIMEOUT\r\n",
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Reply; 7] = [
        Reply::Login,
        Reply::Password,
        Reply::Ok,
        Reply::BadChecksum,
        Reply::LoginFailed,
        Reply::SyntaxError,
        Reply::Timeout,
    ];

    #[test]
    fn wire_form_is_line_plus_crlf() {
        for reply in ALL {
            let mut expected = reply.as_str().as_bytes().to_vec();
            expected.extend_from_slice(CRLF);
            assert_eq!(reply.wire(), expected.as_slice());
        }
    }

    #[test]
    fn line_opens_with_code() {
        for reply in ALL {
            assert!(reply.as_str().starts_with(&reply.code().to_string()));
        }
    }

    #[test]
    fn exact_wire_lines() {
        assert_eq!(Reply::Login.wire(), b"200 LOGIN\r\n");
        assert_eq!(Reply::Password.wire(), b"201 PASSWORD\r\n");
        assert_eq!(Reply::Ok.wire(), b"202 OK\r\n");
        assert_eq!(Reply::BadChecksum.wire(), b"300 BAD CHECKSUM\r\n");
        assert_eq!(Reply::LoginFailed.wire(), b"500 LOGIN FAILED\r\n");
        assert_eq!(Reply::SyntaxError.wire(), b"501 SYNTAX ERROR\r\n");
        assert_eq!(Reply::Timeout.wire(), b"502 TIMEOUT\r\n");
    }
}
