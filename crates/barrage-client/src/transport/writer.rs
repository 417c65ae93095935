//! Shared frame writer.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use barrage_core::error::{BarrageError, Result};
use barrage_core::protocol::frame::Frame;

/// Cloneable handle to the write half. Each `send` writes one whole frame
/// under the lock.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for FrameWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> FrameWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub async fn send(&self, frame: &Frame) -> Result<()> {
        let wire = frame.encode();
        let mut w = self.inner.lock().await;
        w.write_all(&wire)
            .await
            .map_err(|e| BarrageError::Transport(format!("write frame: {e}")))?;
        w.flush()
            .await
            .map_err(|e| BarrageError::Transport(format!("flush frame: {e}")))?;
        Ok(())
    }

    /// Shut down the write direction.
    pub async fn close(&self) -> Result<()> {
        let mut w = self.inner.lock().await;
        w.shutdown()
            .await
            .map_err(|e| BarrageError::Transport(format!("close: {e}")))
    }
}
