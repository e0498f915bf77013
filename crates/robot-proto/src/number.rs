//! ASCII number parsing for passwords, transfer lengths and checksum
//! trailers.
//!
//! All three fields arrive as text. Parse failures are soft here; the
//! state machine turns a `None` into the appropriate status line.

/// Length of the hexadecimal checksum trailer closing a FOTO transfer.
pub const TRAILER_LEN: usize = 4;

/// Parse the digit bytes retained from a password line as base-10.
///
/// The password scan keeps only ASCII digits, so `digits` is expected to
/// contain nothing else. An empty buffer or a value overflowing the
/// secret's width means "no password": `None`.
#[must_use]
pub fn parse_password(digits: &[u8]) -> Option<i64> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Parse the digit bytes of a FOTO length field as an unsigned count.
#[must_use]
pub fn parse_length(digits: &[u8]) -> Option<u32> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Parse the four-byte checksum trailer as a base-16 string.
///
/// Any byte outside `[0-9a-fA-F]` yields `None`, which callers treat as a
/// guaranteed-mismatch sentinel rather than an error.
#[must_use]
pub fn parse_hex_trailer(trailer: &[u8; TRAILER_LEN]) -> Option<u32> {
    // from_str_radix tolerates a leading sign; the wire format does not.
    if !trailer.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(trailer).ok()?;
    u32::from_str_radix(text, 16).ok()
}
