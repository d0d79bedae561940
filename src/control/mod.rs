//! # Control Module
//!
//! The input-to-command translation loop.
//!
//! This module handles:
//! - Converting calibrated axis movement into rate-limited pan/tilt/zoom
//!   commands ([`AxisTranslator`])
//! - Converting button and hat transitions into discrete one-shot
//!   commands ([`EdgeDispatcher`])
//! - The fixed-period session scheduler tying them together
//!   ([`ControlLoop`])

pub mod control_loop;
pub mod dispatcher;
pub mod translator;

pub use control_loop::ControlLoop;
pub use dispatcher::{hat_bucket, EdgeDispatcher, HAT_CENTERED_BUCKET};
pub use translator::{AxisCommand, AxisTranslator};
