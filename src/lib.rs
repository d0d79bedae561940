//! # PTZ Bridge Library
//!
//! Control a remote pan-tilt-zoom (PTZ) camera with a gamepad.
//!
//! This library provides the core functionality for bridging joystick input
//! to PTZ camera commands, plus a best-effort live-view pump that decodes
//! camera frames pushed by the device library and hands them to a display
//! sink.

pub mod camera;
pub mod config;
pub mod control;
pub mod error;
pub mod joystick;
pub mod liveview;
