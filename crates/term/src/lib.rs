//! Terminal display for composed frames.
//!
//! The core crate produces a [`FrameBuffer`] per frame; this crate flushes it
//! to a real terminal through crossterm. Output is encoded into a reusable
//! byte buffer first, so the encoding can be tested without a TTY.

pub mod renderer;

pub use cellglow_core as core;
pub use cellglow_types as types;

pub use cellglow_core::{FrameBuffer, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
