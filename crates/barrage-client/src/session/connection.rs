use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use barrage_core::error::{BarrageError, Result};
use barrage_core::protocol::{control, kv};

use crate::config::{HeartbeatSection, ReaderSection, ServerSection};
use crate::dispatch::run_read_loop;
use crate::heartbeat;
use crate::slot::BarrageSlot;
use crate::transport::{read_frame, FrameWriter, ReadLimits, ReadOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnState {
    /// No transport yet. A `Connection` never holds this state: `dial` and
    /// `from_stream` hand out the value already `Connected`.
    #[default]
    Disconnected,
    Connected,
    LoggedIn,
    Joined,
    Running,
    Closed,
}

impl ConnState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnState::Disconnected => "disconnected",
            ConnState::Connected => "connected",
            ConnState::LoggedIn => "logged_in",
            ConnState::Joined => "joined",
            ConnState::Running => "running",
            ConnState::Closed => "closed",
        }
    }

    /// The only state reachable from this one. `Closed` is terminal.
    pub fn next(self) -> Option<ConnState> {
        match self {
            ConnState::Disconnected => Some(ConnState::Connected),
            ConnState::Connected => Some(ConnState::LoggedIn),
            ConnState::LoggedIn => Some(ConnState::Joined),
            ConnState::Joined => Some(ConnState::Running),
            ConnState::Running => Some(ConnState::Closed),
            ConnState::Closed => None,
        }
    }
}

/// One barrage server connection.
///
/// The read half is used for the login response, then moved into the read
/// loop task. The write half is shared with the heartbeat task.
pub struct Connection<S> {
    state: ConnState,
    reader: Option<ReadHalf<S>>,
    writer: FrameWriter<WriteHalf<S>>,
    server: ServerSection,
}

impl Connection<TcpStream> {
    /// Open the TCP connection. No retry.
    pub async fn dial(server: &ServerSection) -> Result<Self> {
        let addr = server.address.as_str();
        tracing::info!(%addr, "dialing barrage server");

        let stream = match timeout(server.connect_timeout(), TcpStream::connect(addr)).await {
            Err(_elapsed) => return Err(BarrageError::Connect(format!("{addr}: timed out"))),
            Ok(Err(e)) => return Err(BarrageError::Connect(format!("{addr}: {e}"))),
            Ok(Ok(s)) => s,
        };
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "set_nodelay failed");
        }

        Ok(Self::from_stream(stream, server.clone()))
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Wrap an already connected stream.
    pub fn from_stream(stream: S, server: ServerSection) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            state: ConnState::Connected,
            reader: Some(reader),
            writer: FrameWriter::new(writer),
            server,
        }
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn writer(&self) -> FrameWriter<WriteHalf<S>> {
        self.writer.clone()
    }

    fn ensure(&self, to: ConnState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(BarrageError::InvalidState {
                from: self.state.as_str(),
                to: to.as_str(),
            });
        }
        Ok(())
    }

    /// Send `loginreq` and wait for one response. Returns the response payload.
    pub async fn login(&mut self, room_id: &str) -> Result<String> {
        self.ensure(ConnState::LoggedIn)?;

        self.writer.send(&control::login_req(room_id)).await?;

        let limits = ReadLimits::for_login(&self.server);
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| BarrageError::Internal("read half already taken".into()))?;

        match read_frame(reader, &limits).await? {
            ReadOutcome::Payload(resp) => {
                let record = kv::decode(&resp);
                tracing::info!(room = %room_id, resp_type = %record.msg_type, "login success");
                self.state = ConnState::LoggedIn;
                Ok(resp)
            }
            ReadOutcome::Empty => Err(BarrageError::AuthFailed),
        }
    }

    /// Send `joingroup`. The server does not answer it.
    pub async fn join_group(&mut self, room_id: &str) -> Result<()> {
        self.ensure(ConnState::Joined)?;

        self.writer.send(&control::join_group(room_id)).await?;
        tracing::info!(room = %room_id, "join group success");

        self.state = ConnState::Joined;
        Ok(())
    }

    /// Spawn the heartbeat and read loop tasks over this connection.
    pub fn enter_running(
        &mut self,
        heartbeat_cfg: &HeartbeatSection,
        reader_policy: &ReaderSection,
        slot: BarrageSlot,
        cancel: CancellationToken,
    ) -> Result<Workers> {
        self.ensure(ConnState::Running)?;

        let reader = self
            .reader
            .take()
            .ok_or_else(|| BarrageError::Internal("read half already taken".into()))?;

        let hb_task = tokio::spawn(heartbeat::run(
            self.writer.clone(),
            heartbeat_cfg.interval(),
            cancel.clone(),
        ));
        let read_loop = tokio::spawn(run_read_loop(
            reader,
            ReadLimits::for_reads(&self.server),
            reader_policy.clone(),
            slot,
            cancel.clone(),
        ));

        self.state = ConnState::Running;
        Ok(Workers {
            cancel,
            heartbeat: Some(hb_task),
            read_loop: Some(read_loop),
        })
    }

    /// Send `logout` and close the transport. Later calls do nothing.
    ///
    /// The connection ends up `Closed` even when the logout send fails; the
    /// first error is returned.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state == ConnState::Closed {
            return Ok(());
        }
        self.state = ConnState::Closed;
        self.reader = None;

        let sent = self.writer.send(&control::logout()).await;
        let closed = self.writer.close().await;
        tracing::info!("logged out");

        sent.and(closed)
    }
}

/// Handles to the tasks started by `enter_running`.
pub struct Workers {
    cancel: CancellationToken,
    heartbeat: Option<JoinHandle<()>>,
    read_loop: Option<JoinHandle<Result<()>>>,
}

impl Workers {
    /// Resolves when the read loop exits by itself. Pending forever once it
    /// has already been observed.
    pub async fn read_loop_done(&mut self) -> Result<()> {
        let Some(handle) = self.read_loop.as_mut() else {
            return std::future::pending().await;
        };
        let res = handle.await;
        self.read_loop = None;
        flatten(res)
    }

    /// Cancel both tasks and wait for them.
    pub async fn stop(mut self) -> Result<()> {
        self.cancel.cancel();

        if let Some(hb) = self.heartbeat.take() {
            if let Err(e) = hb.await {
                tracing::warn!(error = %e, "heartbeat task failed");
            }
        }

        match self.read_loop.take() {
            Some(handle) => flatten(handle.await),
            None => Ok(()),
        }
    }
}

fn flatten(res: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    res.map_err(|e| BarrageError::Internal(format!("task join failed: {e}")))?
}
