//! # Live-View Module
//!
//! Best-effort frame delivery from the camera to a display sink.
//!
//! This module handles:
//! - The reentrancy-guarded frame pump driven by new-frame notifications
//!   ([`FramePump`])
//! - Scoped ownership of the native frame buffer for one
//!   fetch-copy-release cycle
//! - The hand-off of decoded images to the loop that owns the display
//!   ([`DisplaySink`], [`ChannelSink`])

pub mod pump;
pub mod sink;

pub use pump::FramePump;
pub use sink::{ChannelSink, DisplaySink};
