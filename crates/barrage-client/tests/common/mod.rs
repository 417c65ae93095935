//! Fake barrage server helpers shared by the integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

use barrage_client::config::{ReaderSection, ServerSection};
use barrage_client::transport::ReadLimits;
use barrage_core::protocol::frame::{self, payload_from_remainder};

/// Message type the server puts on its frames.
pub const MSG_TYPE_S2C: u16 = 690;

pub fn fast_server() -> ServerSection {
    ServerSection {
        login_timeout_ms: 300,
        read_timeout_ms: 100,
        idle_pause_ms: 5,
        ..ServerSection::default()
    }
}

pub fn fast_limits() -> ReadLimits {
    ReadLimits {
        deadline: std::time::Duration::from_millis(50),
        idle_pause: std::time::Duration::from_millis(1),
        max_frame_bytes: 4096,
    }
}

pub fn retrying(max_consecutive_errors: u32, retry_delay_ms: u64) -> ReaderSection {
    ReaderSection {
        max_consecutive_errors,
        retry_delay_ms,
    }
}

pub async fn write_frame<W: AsyncWrite + Unpin>(w: &mut W, body: &str) {
    w.write_all(&frame::encode(body, MSG_TYPE_S2C)).await.unwrap();
}

/// One client frame as seen by the server.
#[derive(Debug)]
pub struct Received {
    pub len_first: u32,
    pub len_second: u32,
    pub msg_type: u16,
    pub body: String,
}

pub async fn read_client_frame<R: AsyncRead + Unpin>(r: &mut R) -> Received {
    let len_first = r.read_u32_le().await.unwrap();
    let mut rest = vec![0u8; len_first as usize];
    r.read_exact(&mut rest).await.unwrap();

    let len_second = u32::from_le_bytes(rest[0..4].try_into().unwrap());
    let msg_type = u16::from_le_bytes(rest[4..6].try_into().unwrap());
    assert_eq!(rest[6], 0, "encrypt flag");
    assert_eq!(rest[7], 0, "reserved");
    assert_eq!(*rest.last().unwrap(), 0, "terminator");

    let body = String::from_utf8(payload_from_remainder(&rest).unwrap().to_vec()).unwrap();
    assert_eq!(len_first as usize, body.len() + 9, "length derived from body");
    assert_eq!(len_first, len_second, "length copies differ");

    Received {
        len_first,
        len_second,
        msg_type,
        body,
    }
}

/// One step of a `ScriptedReader`.
pub enum Step {
    Bytes(Vec<u8>),
    Fail(&'static str),
}

/// Reader that replays a fixed script, then stays silent forever.
pub struct ScriptedReader {
    steps: VecDeque<Step>,
}

impl ScriptedReader {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}

impl AsyncRead for ScriptedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.steps.pop_front() {
            None => Poll::Pending,
            Some(Step::Fail(msg)) => Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, msg))),
            Some(Step::Bytes(mut bytes)) => {
                let n = bytes.len().min(buf.remaining());
                buf.put_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.steps.push_front(Step::Bytes(bytes.split_off(n)));
                }
                Poll::Ready(Ok(()))
            }
        }
    }
}
