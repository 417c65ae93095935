//! Binary frame codec (panic-free).
//!
//! Wire layout (all integers little-endian):
//!
//! ```text
//! | len u32 | len u32 | msg_type u16 | encrypt u8 | reserved u8 | body .. | 0x00 |
//! ```
//!
//! `len` is `body.len() + 9` and is written twice. A reader consumes the
//! first copy as the length prefix; what follows (the "remainder") is an
//! 8-byte sub-header, the payload, and the terminator byte.
//!
//! Parsing rules:
//! - Never index raw buffers; use `Buf`, `get()` and length checks.
//! - A truncated or tiny remainder is "no payload", not an error.

use std::borrow::Cow;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{BarrageError, Result};

/// Message type used by every client-originated frame.
pub const MSG_TYPE_C2S: u16 = 689;

/// Size of the length prefix read before each inbound frame.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Sub-header at the start of the remainder (len copy, type, flags).
pub const SUB_HEADER_LEN: usize = 8;

/// len copy (4) + msg_type (2) + encrypt (1) + reserved (1) + terminator (1).
const FRAME_OVERHEAD: usize = 9;

/// Outbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// KV-encoded body text.
    pub body: String,
    /// Message type.
    pub msg_type: u16,
    /// Encryption flag. Always 0.
    pub encrypt: u8,
    /// Reserved. Always 0.
    pub reserved: u8,
}

impl Frame {
    pub fn new(body: impl Into<String>, msg_type: u16) -> Self {
        Self {
            body: body.into(),
            msg_type,
            encrypt: 0,
            reserved: 0,
        }
    }

    /// Client control frame (`MSG_TYPE_C2S`).
    pub fn control(body: impl Into<String>) -> Self {
        Self::new(body, MSG_TYPE_C2S)
    }

    /// Value written in both length slots. Derived from the body only.
    pub fn length_field(&self) -> u32 {
        (self.body.len() + FRAME_OVERHEAD) as u32
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Bytes {
        let len = self.length_field();
        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_LEN + len as usize);
        buf.put_u32_le(len);
        buf.put_u32_le(len);
        buf.put_u16_le(self.msg_type);
        buf.put_u8(self.encrypt);
        buf.put_u8(self.reserved);
        buf.put_slice(self.body.as_bytes());
        buf.put_u8(0);
        buf.freeze()
    }
}

/// Encode `body` as a frame of type `msg_type`.
pub fn encode(body: &str, msg_type: u16) -> Bytes {
    Frame::new(body, msg_type).encode()
}

/// Strip the sub-header and terminator from an inbound remainder.
///
/// Returns `None` when the remainder is too short to carry a payload.
pub fn payload_from_remainder(remainder: &[u8]) -> Option<&[u8]> {
    if remainder.len() <= SUB_HEADER_LEN {
        return None;
    }
    remainder.get(SUB_HEADER_LEN..remainder.len() - 1)
}

/// Payload bytes as text. Invalid UTF-8 sequences become U+FFFD.
pub fn payload_text(payload: &[u8]) -> String {
    match String::from_utf8_lossy(payload) {
        Cow::Borrowed(text) => text.to_owned(),
        Cow::Owned(text) => {
            tracing::trace!(len = payload.len(), "invalid utf-8 in payload replaced");
            text
        }
    }
}

/// Decode a complete in-memory frame (length prefix included).
///
/// `Ok(None)` mirrors the socket reader: zero length or fewer bytes than
/// declared means "no message". Only a missing length prefix is an error.
pub fn decode_wire(mut buf: Bytes) -> Result<Option<String>> {
    if buf.remaining() < LENGTH_PREFIX_LEN {
        return Err(BarrageError::BadFrame("missing length prefix".into()));
    }

    let len = buf.get_u32_le() as usize;
    if len == 0 || buf.remaining() < len {
        return Ok(None);
    }

    let remainder = buf.copy_to_bytes(len);
    Ok(payload_from_remainder(&remainder).map(payload_text))
}
