//! Single-item hand-off between the read loop and the player.
//!
//! Latest write wins; `take` reads and clears in one locked step.

use std::sync::Arc;

use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct BarrageSlot {
    inner: Arc<Mutex<Option<String>>>,
}

impl BarrageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text`, returning the value it replaced.
    pub async fn publish(&self, text: String) -> Option<String> {
        self.inner.lock().await.replace(text)
    }

    pub async fn take(&self) -> Option<String> {
        self.inner.lock().await.take()
    }
}
