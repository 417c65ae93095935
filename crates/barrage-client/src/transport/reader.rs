//! Inbound frame reader.
//!
//! One call performs one length read and one body read, each bounded by the
//! read deadline. "Nothing usable arrived" is `ReadOutcome::Empty`, not an
//! error: deadline expiry, zero length, a declared length above the cap,
//! partial prefix, short body, tiny remainder. Only EOF before any length
//! byte and I/O errors are `Transport` errors.
//!
//! Bytes of a partial prefix or a short body are dropped, so the next length
//! read may land mid-frame. Delivery is best-effort and this is not repaired:
//! such lengths decode as text bytes, exceed the cap and are skipped without
//! allocating until the stream lines up again or the server closes it.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{timeout_at, Instant};

use barrage_core::error::{BarrageError, Result};
use barrage_core::protocol::frame::{payload_from_remainder, payload_text, LENGTH_PREFIX_LEN};

use crate::config::ServerSection;

/// Per-call read bounds.
#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    /// Deadline applied to the length read and again to the body read.
    pub deadline: Duration,
    /// Pause after a zero length prefix.
    pub idle_pause: Duration,
    /// Largest accepted declared length.
    pub max_frame_bytes: usize,
}

impl ReadLimits {
    /// Limits for the steady-state read loop.
    pub fn for_reads(server: &ServerSection) -> Self {
        Self {
            deadline: server.read_timeout(),
            idle_pause: server.idle_pause(),
            max_frame_bytes: server.max_frame_bytes,
        }
    }

    /// Limits for the single login response read.
    pub fn for_login(server: &ServerSection) -> Self {
        Self {
            deadline: server.login_timeout(),
            ..Self::for_reads(server)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Payload text with sub-header and terminator stripped.
    Payload(String),
    /// No message this round.
    Empty,
}

/// Read one inbound frame.
pub async fn read_frame<R>(reader: &mut R, limits: &ReadLimits) -> Result<ReadOutcome>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    let deadline = Instant::now() + limits.deadline;
    match fill_until(reader, &mut prefix, deadline, "read length").await? {
        Fill::Full => {}
        Fill::Eof(0) => return Err(BarrageError::Transport("read length: connection closed".into())),
        Fill::Eof(_) | Fill::Expired(0) => return Ok(ReadOutcome::Empty),
        Fill::Expired(got) => {
            tracing::debug!(got, "partial length prefix dropped");
            return Ok(ReadOutcome::Empty);
        }
    }

    let declared = u32::from_le_bytes(prefix) as usize;
    if declared == 0 {
        tokio::time::sleep(limits.idle_pause).await;
        return Ok(ReadOutcome::Empty);
    }
    if declared > limits.max_frame_bytes {
        tracing::debug!(declared, max = limits.max_frame_bytes, "oversized frame skipped");
        return Ok(ReadOutcome::Empty);
    }

    let mut remainder = vec![0u8; declared];
    let deadline = Instant::now() + limits.deadline;
    match fill_until(reader, &mut remainder, deadline, "read body").await? {
        Fill::Full => {}
        Fill::Eof(filled) | Fill::Expired(filled) => {
            tracing::debug!(declared, filled, "short frame dropped");
            return Ok(ReadOutcome::Empty);
        }
    }

    match payload_from_remainder(&remainder) {
        Some(p) if !p.is_empty() => Ok(ReadOutcome::Payload(payload_text(p))),
        _ => Ok(ReadOutcome::Empty),
    }
}

/// How a bounded fill ended. Partial variants carry the bytes read.
enum Fill {
    Full,
    Eof(usize),
    Expired(usize),
}

/// Read into `buf` until full, EOF, or `deadline`.
async fn fill_until<R>(
    reader: &mut R,
    buf: &mut [u8],
    deadline: Instant,
    what: &'static str,
) -> Result<Fill>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match timeout_at(deadline, reader.read(&mut buf[filled..])).await {
            Err(_elapsed) => return Ok(Fill::Expired(filled)),
            Ok(Ok(0)) => return Ok(Fill::Eof(filled)),
            Ok(Ok(n)) => filled += n,
            Ok(Err(e)) => return Err(BarrageError::Transport(format!("{what}: {e}"))),
        }
    }
    Ok(Fill::Full)
}
