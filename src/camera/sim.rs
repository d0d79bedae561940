//! # Camera Simulator Module
//!
//! In-process stand-in for the vendor device library.
//!
//! The simulator logs every outbound command and synthesizes JPEG live-view
//! frames on a background thread while connected, firing the registered
//! frame callback the way the real library does. The binary runs against
//! it out of the box; real deployments provide their own [`CameraPort`]
//! implementation over the vendor SDK.

use bytes::Bytes;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::camera::port::{CameraPort, FrameCallback, NamedCommand, NativeFrame};
use crate::error::{PtzBridgeError, Result};

/// Live-view frame rate of the simulator.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Dimensions of the synthesized test frame.
const FRAME_WIDTH: u32 = 160;
const FRAME_HEIGHT: u32 = 120;

/// Simulated camera port.
pub struct SimCameraPort {
    connected: Arc<AtomicBool>,
    callback: Arc<Mutex<Option<FrameCallback>>>,
    frame_jpeg: Bytes,
    outstanding: AtomicI64,
    next_frame_id: AtomicU64,
    frame_thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SimCameraPort {
    /// Create a simulator with a pre-encoded test frame.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the constant test frame cannot be encoded.
    pub fn new() -> Result<Self> {
        let img = image::RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, image::Rgb([32, 96, 160]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img).write_to(&mut buf, image::ImageFormat::Jpeg)?;

        Ok(Self {
            connected: Arc::new(AtomicBool::new(false)),
            callback: Arc::new(Mutex::new(None)),
            frame_jpeg: Bytes::from(buf.into_inner()),
            outstanding: AtomicI64::new(0),
            next_frame_id: AtomicU64::new(0),
            frame_thread: Mutex::new(None),
        })
    }

    /// Number of fetched frames not yet released.
    pub fn outstanding_frames(&self) -> i64 {
        self.outstanding.load(Ordering::Relaxed)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(PtzBridgeError::Camera("not connected".to_string()))
        }
    }
}

impl CameraPort for SimCameraPort {
    fn connect(&self, target: &str) -> Result<()> {
        if self.connected.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        info!("sim camera connected to {}", target);

        let connected = Arc::clone(&self.connected);
        let callback = Arc::clone(&self.callback);
        let handle = thread::spawn(move || {
            while connected.load(Ordering::Relaxed) {
                thread::sleep(FRAME_INTERVAL);
                if let Some(cb) = callback.lock().unwrap().as_ref() {
                    cb();
                }
            }
        });
        *self.frame_thread.lock().unwrap() = Some(handle);
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        if !self.connected.swap(false, Ordering::AcqRel) {
            // Already disconnected
            return Ok(());
        }
        if let Some(handle) = self.frame_thread.lock().unwrap().take() {
            let _ = handle.join();
        }
        let leaked = self.outstanding.load(Ordering::Relaxed);
        if leaked != 0 {
            warn!("sim camera disconnected with {} unreleased frame(s)", leaked);
        } else {
            info!("sim camera disconnected");
        }
        Ok(())
    }

    fn send_direction(&self, pan: i32, tilt: i32) -> Result<()> {
        self.ensure_connected()?;
        debug!(pan, tilt, "direction command");
        Ok(())
    }

    fn send_command(&self, command: NamedCommand) -> Result<()> {
        self.ensure_connected()?;
        debug!(?command, "named command");
        Ok(())
    }

    fn set_property(&self, name: &str, value: i64, blocking: bool) -> Result<()> {
        self.ensure_connected()?;
        debug!(name, value, blocking, "set property");
        Ok(())
    }

    fn set_preset(&self, index: i32) -> Result<()> {
        self.ensure_connected()?;
        debug!(index, "preset save");
        Ok(())
    }

    fn fetch_frame(&self) -> Result<NativeFrame> {
        self.ensure_connected()
            .map_err(|_| PtzBridgeError::FrameFetch("not connected".to_string()))?;
        let id = self.next_frame_id.fetch_add(1, Ordering::Relaxed);
        self.outstanding.fetch_add(1, Ordering::Relaxed);
        Ok(NativeFrame::new(id, self.frame_jpeg.clone()))
    }

    fn release_frame(&self, frame: NativeFrame) {
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
        drop(frame);
    }

    fn register_frame_callback(&self, handler: FrameCallback) {
        *self.callback.lock().unwrap() = Some(handler);
    }
}

impl Drop for SimCameraPort {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}
