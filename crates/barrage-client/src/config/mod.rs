//! Client config loader (strict parsing).
//!
//! The file is optional: `ClientConfig::default()` is a valid config.

pub mod schema;

use std::fs;

use barrage_core::error::{BarrageError, Result};

pub use schema::{ClientConfig, HeartbeatSection, PlayerSection, ReaderSection, ServerSection};

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BarrageError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| BarrageError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` when given, defaults otherwise.
pub fn load(path: Option<&str>) -> Result<ClientConfig> {
    match path {
        Some(p) => load_from_file(p),
        None => {
            let cfg = ClientConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
