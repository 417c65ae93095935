//! Protocol modules (binary frames + KV bodies).
//!
//! - `frame`: length-prefixed binary envelope shared by both directions.
//! - `kv`: the `key@=value/` text format carried inside a frame payload.
//! - `control`: fixed client control bodies (login, join, heartbeat, logout).
//!
//! Parsers are panic-free: short or truncated input yields `None` or a
//! `BarrageError`, never an out-of-bounds index.

pub mod control;
pub mod frame;
pub mod kv;
