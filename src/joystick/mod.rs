//! # Joystick Module
//!
//! Joystick input sampling via the Linux evdev interface.
//!
//! This module handles:
//! - Detecting and opening the first joystick-class input device
//! - Polling the kernel input state into immutable snapshots
//! - The calibration offset captured when a control session arms

pub mod sampler;
pub mod snapshot;

pub use sampler::{InputSource, JoystickSampler};
pub use snapshot::{CalibrationOffset, InputSnapshot, AXIS_COUNT, BUTTON_COUNT};
