use std::time::Duration;

use serde::Deserialize;
use barrage_core::error::{BarrageError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub heartbeat: HeartbeatSection,

    #[serde(default)]
    pub reader: ReaderSection,

    #[serde(default)]
    pub player: PlayerSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            heartbeat: HeartbeatSection::default(),
            reader: ReaderSection::default(),
            player: PlayerSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BarrageError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.heartbeat.validate()?;
        self.reader.validate()?;
        self.player.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_login_timeout_ms")]
    pub login_timeout_ms: u64,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "default_idle_pause_ms")]
    pub idle_pause_ms: u64,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: default_address(),
            connect_timeout_ms: default_connect_timeout_ms(),
            login_timeout_ms: default_login_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            idle_pause_ms: default_idle_pause_ms(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.address.rsplit_once(':').is_none() {
            return Err(BarrageError::Config(
                "server.address must be host:port".into(),
            ));
        }
        if !(100..=60000).contains(&self.connect_timeout_ms) {
            return Err(BarrageError::Config(
                "server.connect_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=60000).contains(&self.login_timeout_ms) {
            return Err(BarrageError::Config(
                "server.login_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=60000).contains(&self.read_timeout_ms) {
            return Err(BarrageError::Config(
                "server.read_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if self.idle_pause_ms > 10000 {
            return Err(BarrageError::Config(
                "server.idle_pause_ms must be at most 10000".into(),
            ));
        }
        if !(64..=16 * 1024 * 1024).contains(&self.max_frame_bytes) {
            return Err(BarrageError::Config(
                "server.max_frame_bytes must be between 64 and 16777216".into(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.login_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn idle_pause(&self) -> Duration {
        Duration::from_millis(self.idle_pause_ms)
    }
}

fn default_address() -> String {
    "openbarrage.douyutv.com:8601".into()
}
fn default_connect_timeout_ms() -> u64 {
    10000
}
fn default_login_timeout_ms() -> u64 {
    5000
}
fn default_read_timeout_ms() -> u64 {
    5000
}
fn default_idle_pause_ms() -> u64 {
    1000
}
fn default_max_frame_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatSection {
    #[serde(default = "default_heartbeat_interval_ms")]
    pub interval_ms: u64,
}

impl Default for HeartbeatSection {
    fn default() -> Self {
        Self {
            interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

impl HeartbeatSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=90000).contains(&self.interval_ms) {
            return Err(BarrageError::Config(
                "heartbeat.interval_ms must be between 1000 and 90000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_heartbeat_interval_ms() -> u64 {
    45000
}

/// Read loop error policy. `max_consecutive_errors == 0` is fail-fast.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderSection {
    #[serde(default)]
    pub max_consecutive_errors: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ReaderSection {
    fn default() -> Self {
        Self {
            max_consecutive_errors: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ReaderSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_consecutive_errors > 100 {
            return Err(BarrageError::Config(
                "reader.max_consecutive_errors must be at most 100".into(),
            ));
        }
        if self.retry_delay_ms > 60000 {
            return Err(BarrageError::Config(
                "reader.retry_delay_ms must be at most 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_retry_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSection {
    #[serde(default = "default_player_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            interval_ms: default_player_interval_ms(),
        }
    }
}

impl PlayerSection {
    pub fn validate(&self) -> Result<()> {
        if !(500..=600000).contains(&self.interval_ms) {
            return Err(BarrageError::Config(
                "player.interval_ms must be between 500 and 600000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_player_interval_ms() -> u64 {
    10000
}
