use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use barrage_core::error::Result;
use barrage_core::protocol::kv::{self, MessageRecord};

use crate::config::ReaderSection;
use crate::slot::BarrageSlot;
use crate::transport::{read_frame, ReadLimits, ReadOutcome};

/// Chat text containing this marker is an emoticon and is never spoken.
pub const EMOTE_MARKER: &str = "emot";

/// Text to hand to the player, if this record qualifies.
pub fn speakable_text(record: &MessageRecord) -> Option<&str> {
    if record.is_chat() && !record.text.contains(EMOTE_MARKER) {
        Some(&record.text)
    } else {
        None
    }
}

/// Decode one payload and publish qualifying chat text. Returns whether the
/// slot was written.
pub async fn dispatch(payload: &str, slot: &BarrageSlot) -> bool {
    let record = kv::decode(payload);
    if !record.is_chat() {
        tracing::trace!(msg_type = %record.msg_type, "ignoring non-chat message");
        return false;
    }

    tracing::info!(uid = %record.uid, nn = %record.nickname, txt = %record.text, "chat");

    match speakable_text(&record) {
        Some(text) => {
            slot.publish(text.to_string()).await;
            true
        }
        None => false,
    }
}

/// Pull frames until cancelled or a read error exceeds the retry budget.
///
/// With `max_consecutive_errors == 0` the first transport error is returned
/// (fail-fast). Otherwise up to that many consecutive errors are logged and
/// retried after `retry_delay`. Any read that completes without error,
/// `Empty` included, resets the count.
pub async fn run_read_loop<R>(
    mut reader: R,
    limits: ReadLimits,
    policy: ReaderSection,
    slot: BarrageSlot,
    cancel: CancellationToken,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut consecutive_errors: u32 = 0;

    loop {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            res = read_frame(&mut reader, &limits) => res,
        };

        match outcome {
            Ok(read) => {
                consecutive_errors = 0;
                if let ReadOutcome::Payload(payload) = read {
                    dispatch(&payload, &slot).await;
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                if consecutive_errors > policy.max_consecutive_errors {
                    tracing::error!(code = e.code().as_str(), error = %e, "read loop failed");
                    return Err(e);
                }

                tracing::warn!(
                    attempt = consecutive_errors,
                    max = policy.max_consecutive_errors,
                    error = %e,
                    "read failed, retrying"
                );
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(policy.retry_delay()) => {}
                }
            }
        }
    }

    tracing::debug!("read loop stopped");
    Ok(())
}
