//! barrage core: wire-level primitives for the barrage chat protocol.
//!
//! This crate holds the frame codec, the `key@=value/` body codec, the fixed
//! control bodies and the shared error surface. It carries no runtime or
//! socket dependencies, so everything here is pure and synchronous.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Malformed input surfaces as `BarrageError` or as "no payload", never as a
//! crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{BarrageError, ErrorCode, Result};
