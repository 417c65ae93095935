//! Read loop and chat routing.
//!
//! Re-exports the loop entry point and the routing helpers so the session
//! layer and tests can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{dispatch, run_read_loop, speakable_text, EMOTE_MARKER};
