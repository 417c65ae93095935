//! `key@=value/` body codec.
//!
//! Decoding never fails: segments without exactly one `@=` and keys outside
//! the known set are skipped. Values are kept raw (no unescaping).

use std::fmt::Write;

/// Key/value separator inside a segment.
pub const KV_SEP: &str = "@=";
/// Segment terminator.
pub const SEGMENT_SEP: char = '/';

/// Message type of a chat line.
pub const TYPE_CHATMSG: &str = "chatmsg";

/// Flat record decoded from a server payload. Absent keys stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRecord {
    /// `type`
    pub msg_type: String,
    /// `uid`
    pub uid: String,
    /// `level`
    pub level: String,
    /// `nn`
    pub nickname: String,
    /// `txt`
    pub text: String,
    /// `bnn` (room owner nickname)
    pub owner_nickname: String,
    /// `bl` (room owner level)
    pub owner_level: String,
}

impl MessageRecord {
    /// Resolve a wire key to the field it populates.
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "type" => Some(&mut self.msg_type),
            "uid" => Some(&mut self.uid),
            "nn" => Some(&mut self.nickname),
            "level" => Some(&mut self.level),
            "txt" => Some(&mut self.text),
            "bnn" => Some(&mut self.owner_nickname),
            "bl" => Some(&mut self.owner_level),
            _ => None,
        }
    }

    pub fn is_chat(&self) -> bool {
        self.msg_type == TYPE_CHATMSG
    }
}

/// Decode a payload into a `MessageRecord`.
pub fn decode(payload: &str) -> MessageRecord {
    let mut record = MessageRecord::default();

    for segment in payload.split(SEGMENT_SEP) {
        let mut parts = segment.split(KV_SEP);
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            if !segment.is_empty() {
                tracing::trace!(%segment, "skipping malformed kv segment");
            }
            continue;
        };

        if let Some(field) = record.field_mut(key) {
            *field = value.to_string();
        }
    }

    record
}

/// Builder for outbound bodies.
#[derive(Debug, Default, Clone)]
pub struct KvBody {
    buf: String,
}

impl KvBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key@=value/`.
    pub fn pair(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{key}{KV_SEP}{value}{SEGMENT_SEP}");
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
