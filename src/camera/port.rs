//! # Camera Port Module
//!
//! Trait abstraction over the external camera library, plus the outbound
//! command vocabulary.
//!
//! All operations are fire-and-forget from the bridge's point of view: a
//! non-ok status is logged by the caller and the cycle is skipped. The one
//! stateful resource is the live-view frame buffer, which stays owned by
//! the device library until copied and must be released exactly once per
//! successful fetch (see [`crate::liveview`] for the lease that enforces
//! this).

use bytes::Bytes;

use crate::error::Result;

/// Device property driving zoom as a signed speed value.
pub const PROP_ZOOM_OPERATION: &str = "Zoom_Operation";

/// Discrete one-shot commands issued on button and hat edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedCommand {
    /// Re-center zoom / return to home position (button 0).
    Home,
    /// Menu key (button 1).
    MenuKey,
    /// Cancel/back key (button 2).
    CancelKey,
    /// Select/enter key (button 3).
    SelectKey,
    /// Display-toggle key (button 11).
    DisplayToggle,
    /// Directional key from a hat transition.
    DirectionKey(HatDirection),
}

/// Eight-way hat direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

/// Callback invoked by the device library when a new live-view frame is
/// available. May fire zero or more times, from any thread.
pub type FrameCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// A live-view frame buffer still owned by the device library.
///
/// Deliberately not `Clone`: the value is a release token as much as it is
/// data. Every frame returned by [`CameraPort::fetch_frame`] must be handed
/// back to [`CameraPort::release_frame`] exactly once.
#[derive(Debug)]
pub struct NativeFrame {
    id: u64,
    data: Bytes,
}

impl NativeFrame {
    /// Wraps a buffer handed out by a port implementation.
    #[must_use]
    pub fn new(id: u64, data: Bytes) -> Self {
        Self { id, data }
    }

    /// Identifier of the underlying native buffer.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the buffer carries no image data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copies the buffer into locally owned bytes.
    #[must_use]
    pub fn copy_bytes(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

/// Capability interface to the remote PTZ camera.
///
/// Implementations wrap the vendor device library. All methods take
/// `&self` and must be safe for concurrent fire-and-forget use: the
/// control loop and the live-view pump call through the same port from
/// different tasks.
pub trait CameraPort: Send + Sync {
    /// Establish a connection. `target` is `<ip-address> [userid] [pass]`.
    fn connect(&self, target: &str) -> Result<()>;

    /// Tear down the connection. Must be a no-op when already disconnected.
    fn disconnect(&self) -> Result<()>;

    /// Request a pan/tilt direction vector with the given signed speeds.
    fn send_direction(&self, pan: i32, tilt: i32) -> Result<()>;

    /// Issue a discrete one-shot command.
    fn send_command(&self, command: NamedCommand) -> Result<()>;

    /// Set a device property. `blocking = false` returns without waiting
    /// for the property-changed event.
    fn set_property(&self, name: &str, value: i64, blocking: bool) -> Result<()>;

    /// Save the current PTZ position as preset `index`.
    fn set_preset(&self, index: i32) -> Result<()>;

    /// Fetch the latest live-view frame. The returned buffer is owned by
    /// the device library; pair every success with exactly one
    /// [`CameraPort::release_frame`].
    fn fetch_frame(&self) -> Result<NativeFrame>;

    /// Release a frame buffer back to the device library.
    fn release_frame(&self, frame: NativeFrame);

    /// Register the new-frame notification handler.
    fn register_frame_callback(&self, handler: FrameCallback);
}
