//! Periodic consumer of the barrage slot.
//!
//! Every interval the slot is taken; non-empty text goes to the `Speaker` on
//! its own task, which the player does not wait for.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use barrage_core::error::Result;

use crate::slot::BarrageSlot;

/// Text-to-speech / playback collaborator.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Speaker that only logs. Used when no audio backend is wired in.
#[derive(Debug, Default)]
pub struct LogSpeaker;

#[async_trait]
impl Speaker for LogSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::info!(%text, "speak");
        Ok(())
    }
}

pub async fn run(
    slot: BarrageSlot,
    speaker: Arc<dyn Speaker>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut tick = interval_at(Instant::now() + every, every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {
                let Some(text) = slot.take().await else { continue };
                if text.is_empty() {
                    continue;
                }

                tracing::info!(%text, "playing");
                let speaker = Arc::clone(&speaker);
                tokio::spawn(async move {
                    if let Err(e) = speaker.speak(&text).await {
                        tracing::warn!(code = e.code().as_str(), error = %e, "speaker failed");
                    }
                });
            }
        }
    }

    tracing::debug!("player stopped");
}
