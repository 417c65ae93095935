//! Transport layer (TCP).
//!
//! The socket is split once: the read half belongs to whoever drives
//! `read_frame` (login, then the read loop), the write half is shared behind
//! `FrameWriter` so whole frames from different tasks never interleave.

pub mod reader;
pub mod writer;

pub use reader::{read_frame, ReadLimits, ReadOutcome};
pub use writer::FrameWriter;
