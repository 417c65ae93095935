//! Keep-alive task.
//!
//! Sends `type@=mrkl/` every interval, first beat one interval after start.
//! Send failures are logged and the next tick tries again; the read loop is
//! the one that notices a dead socket.

use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use barrage_core::protocol::control;

use crate::transport::FrameWriter;

pub async fn run<W>(writer: FrameWriter<W>, every: Duration, cancel: CancellationToken)
where
    W: AsyncWrite + Unpin + Send,
{
    let mut tick = interval_at(Instant::now() + every, every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let frame = control::heartbeat();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {
                match writer.send(&frame).await {
                    Ok(()) => tracing::info!("heartbeat sent"),
                    Err(e) => tracing::warn!(code = e.code().as_str(), error = %e, "heartbeat send failed"),
                }
            }
        }
    }

    tracing::debug!("heartbeat stopped");
}
