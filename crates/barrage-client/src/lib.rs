//! barrage client library entry.
//!
//! This crate wires the transport, connection lifecycle, heartbeat, read loop
//! and player into a running client. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod heartbeat;
pub mod player;
pub mod session;
pub mod slot;
pub mod transport;

pub use client::BarrageClient;
