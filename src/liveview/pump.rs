//! # Frame Pump Module
//!
//! Reentrancy-guarded handler for "new frame available" notifications.
//!
//! ## Policy
//!
//! At most one fetch is in flight at a time. Notifications arriving while
//! a fetch runs are dropped, never queued: the camera keeps producing
//! frames, so the next notification catches up naturally. The guard is an
//! atomic exchange because notifications may arrive on any device-library
//! thread.
//!
//! ## Buffer Ownership
//!
//! The fetched native buffer is owned by the device library. It is held
//! through a [`FrameLease`] for exactly one fetch-copy-release cycle and
//! released on every exit path, including fetch of an empty buffer and
//! decode failure. Decoding happens only after the native buffer has been
//! handed back.
//!
//! Decode failure is reported and the previous image stays on the sink;
//! the sink is only ever called with a fully decoded image.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::camera::port::{CameraPort, NativeFrame};
use crate::liveview::sink::DisplaySink;

/// Scoped ownership of one native frame buffer.
///
/// Releases the buffer back to the port when dropped, on every exit path.
struct FrameLease<'a, P: CameraPort + ?Sized> {
    port: &'a P,
    frame: Option<NativeFrame>,
}

impl<'a, P: CameraPort + ?Sized> FrameLease<'a, P> {
    fn new(port: &'a P, frame: NativeFrame) -> Self {
        Self {
            port,
            frame: Some(frame),
        }
    }

    fn is_empty(&self) -> bool {
        self.frame.as_ref().map_or(true, NativeFrame::is_empty)
    }

    fn copy_bytes(&self) -> Vec<u8> {
        self.frame
            .as_ref()
            .map_or_else(Vec::new, NativeFrame::copy_bytes)
    }
}

impl<P: CameraPort + ?Sized> Drop for FrameLease<'_, P> {
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.port.release_frame(frame);
        }
    }
}

/// Clears the running flag when the pump exits, on every path.
struct IdleOnDrop<'a>(&'a AtomicBool);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Fetches the latest camera frame and hands the decoded image to the
/// display sink.
pub struct FramePump<P: CameraPort, S: DisplaySink> {
    port: Arc<P>,
    sink: S,
    running: AtomicBool,
}

impl<P: CameraPort, S: DisplaySink> FramePump<P, S> {
    /// Creates an idle pump.
    pub fn new(port: Arc<P>, sink: S) -> Self {
        Self {
            port,
            sink,
            running: AtomicBool::new(false),
        }
    }

    /// Handle one "new frame available" notification.
    ///
    /// Safe to call from any thread. Returns immediately when a fetch is
    /// already in flight.
    pub fn on_frame_available(&self) {
        if self.running.swap(true, Ordering::AcqRel) {
            trace!("frame notification dropped: fetch already in flight");
            return;
        }
        let _idle = IdleOnDrop(&self.running);

        let frame = match self.port.fetch_frame() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("live-view fetch failed: {}", e);
                return;
            }
        };
        let lease = FrameLease::new(self.port.as_ref(), frame);
        if lease.is_empty() {
            debug!("live-view fetch returned an empty buffer");
            return;
        }

        let bytes = lease.copy_bytes();
        // Hand the native buffer back before decoding
        drop(lease);

        match image::load_from_memory(&bytes) {
            Ok(image) => self.sink.set_image(image),
            Err(e) => warn!("live-view decode failed, previous image kept: {}", e),
        }
    }
}
