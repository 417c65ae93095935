//! Connection lifecycle.
//!
//! `Disconnected -> Connected -> LoggedIn -> Joined -> Running -> Closed`,
//! strictly forward. Out-of-order calls fail with `InvalidState`.

pub mod connection;

pub use connection::{ConnState, Connection, Workers};
