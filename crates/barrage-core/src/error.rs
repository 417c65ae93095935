//! Shared error type across barrage crates.

use thiserror::Error;

/// Stable error codes, used in log fields and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Could not reach the barrage server.
    ConnectFailed,
    /// Login produced no response.
    AuthFailed,
    /// Socket read/write failed.
    Transport,
    /// Malformed in-memory frame.
    BadFrame,
    /// Lifecycle operation called out of order.
    InvalidState,
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ConnectFailed => "CONNECT_FAILED",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::BadFrame => "BAD_FRAME",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BarrageError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum BarrageError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("login rejected: empty response from server")]
    AuthFailed,
    #[error("transport: {0}")]
    Transport(String),
    #[error("bad frame: {0}")]
    BadFrame(String),
    #[error("invalid state: cannot go from {from} to {to}")]
    InvalidState { from: &'static str, to: &'static str },
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl BarrageError {
    /// Map to a stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            BarrageError::Connect(_) => ErrorCode::ConnectFailed,
            BarrageError::AuthFailed => ErrorCode::AuthFailed,
            BarrageError::Transport(_) => ErrorCode::Transport,
            BarrageError::BadFrame(_) => ErrorCode::BadFrame,
            BarrageError::InvalidState { .. } => ErrorCode::InvalidState,
            BarrageError::Config(_) => ErrorCode::Config,
            BarrageError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            BarrageError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<std::io::Error> for BarrageError {
    fn from(e: std::io::Error) -> Self {
        BarrageError::Transport(e.to_string())
    }
}
