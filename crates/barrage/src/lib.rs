//! Top-level facade crate for barrage.
//!
//! Re-exports the protocol core and the client library so users can depend on a single crate.

pub mod core {
    pub use barrage_core::*;
}

pub mod client {
    pub use barrage_client::*;
}
