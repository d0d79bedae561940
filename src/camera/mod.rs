//! # Camera Module
//!
//! The capability interface to the remote PTZ camera.
//!
//! The camera itself, its transport and its command protocol are owned by
//! an external device-control library; this module only defines the narrow
//! port the bridge calls through, the command vocabulary, and an
//! in-process simulator used by the binary and for integration checks.

pub mod port;
pub mod sim;

pub use port::{
    CameraPort, FrameCallback, HatDirection, NamedCommand, NativeFrame, PROP_ZOOM_OPERATION,
};
pub use sim::SimCameraPort;
