//! Client runner: dial, login, join, run until interrupted, log out.
//!
//! Every task gets the same `CancellationToken`; shutdown cancels it, waits
//! for the tasks, then closes the connection exactly once. The connection is
//! closed on every path after a successful dial, including failed logins.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use barrage_core::error::Result;

use crate::config::ClientConfig;
use crate::player::{self, Speaker};
use crate::session::Connection;
use crate::slot::BarrageSlot;

pub struct BarrageClient {
    cfg: ClientConfig,
    speaker: Arc<dyn Speaker>,
    slot: BarrageSlot,
}

impl BarrageClient {
    pub fn new(cfg: ClientConfig, speaker: Arc<dyn Speaker>) -> Self {
        Self {
            cfg,
            speaker,
            slot: BarrageSlot::new(),
        }
    }

    pub fn cfg(&self) -> &ClientConfig {
        &self.cfg
    }

    pub fn slot(&self) -> BarrageSlot {
        self.slot.clone()
    }

    /// Dial the configured server and run until `shutdown` resolves or the
    /// read loop fails.
    pub async fn run<F>(&self, room_id: &str, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let conn = Connection::dial(&self.cfg.server).await?;
        self.run_on(conn, room_id, shutdown).await
    }

    /// Same as `run`, over an existing connection.
    pub async fn run_on<S, F>(&self, mut conn: Connection<S>, room_id: &str, shutdown: F) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
        F: Future<Output = ()>,
    {
        let result = self.drive(&mut conn, room_id, shutdown).await;

        if let Err(e) = conn.shutdown().await {
            tracing::warn!(code = e.code().as_str(), error = %e, "logout failed");
        }

        result
    }

    async fn drive<S, F>(&self, conn: &mut Connection<S>, room_id: &str, shutdown: F) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
        F: Future<Output = ()>,
    {
        conn.login(room_id).await?;
        conn.join_group(room_id).await?;

        let cancel = CancellationToken::new();
        let mut workers = conn.enter_running(
            &self.cfg.heartbeat,
            &self.cfg.reader,
            self.slot.clone(),
            cancel.clone(),
        )?;
        let player = tokio::spawn(player::run(
            self.slot.clone(),
            Arc::clone(&self.speaker),
            self.cfg.player.interval(),
            cancel.clone(),
        ));

        tokio::pin!(shutdown);
        let outcome = tokio::select! {
            _ = &mut shutdown => {
                tracing::info!(room = %room_id, "interrupt received, shutting down");
                Ok(())
            }
            res = workers.read_loop_done() => res,
        };

        cancel.cancel();
        let stopped = workers.stop().await;
        if let Err(e) = player.await {
            tracing::warn!(error = %e, "player task failed");
        }

        outcome.and(stopped)
    }
}
