//! # Error Types
//!
//! Custom error types for PTZ Bridge using `thiserror`.
//!
//! No error in this crate is fatal to the two loops: the control loop skips
//! the failed tick and the live-view pump skips the failed notification.
//! The next tick or frame notification proceeds independently.

use thiserror::Error;

/// Main error type for PTZ Bridge
#[derive(Debug, Error)]
pub enum PtzBridgeError {
    /// No joystick-class input device was found on the system
    #[error("no joystick found")]
    ControllerNotFound,

    /// Joystick device errors (open, grab, poll)
    #[error("joystick error: {0}")]
    Controller(String),

    /// Camera connection or transport errors
    #[error("camera error: {0}")]
    Camera(String),

    /// The camera rejected an outbound command with a non-zero status
    #[error("command rejected by camera (status {code})")]
    CommandRejected { code: i32 },

    /// Live-view frame fetch failed or returned no data
    #[error("frame fetch failed: {0}")]
    FrameFetch(String),

    /// Live-view frame bytes could not be decoded as an image
    #[error("frame decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PTZ Bridge
pub type Result<T> = std::result::Result<T, PtzBridgeError>;
