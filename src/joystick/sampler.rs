//! # Joystick Sampler Module
//!
//! Detection, exclusive acquisition and polling of a joystick-class input
//! device via the Linux evdev interface.
//!
//! ## Device Class
//!
//! The sampler accepts the first device that reports an `ABS_X` axis and
//! the classic joystick button range (`BTN_TRIGGER`). Devices report axes
//! in whatever range their descriptor declares (0..255 and 0..1023 are
//! common); each reading is rescaled into the signed 16-bit range the
//! snapshot model uses. Centering error is handled upstream by the
//! calibration offset, not here.
//!
//! ## Polling Model
//!
//! Unlike an event-driven reader, the sampler queries the kernel state
//! synchronously on every call, so a poll never blocks waiting for input.
//! The hat angle is synthesized from `ABS_HAT0X`/`ABS_HAT0Y` into the
//! hundredths-of-a-degree convention used by the snapshot model.

use evdev::{AbsoluteAxisType, Device, Key};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{PtzBridgeError, Result};
use crate::joystick::snapshot::{InputSnapshot, AXIS_COUNT, BUTTON_COUNT};

/// Axes sampled into [`InputSnapshot::axes`], in index order.
const AXIS_CODES: [AbsoluteAxisType; AXIS_COUNT] = [
    AbsoluteAxisType::ABS_X,
    AbsoluteAxisType::ABS_Y,
    AbsoluteAxisType::ABS_Z,
    AbsoluteAxisType::ABS_RZ,
];

/// Buttons sampled into [`InputSnapshot::buttons`], in index order.
const BUTTON_CODES: [Key; BUTTON_COUNT] = [
    Key::BTN_TRIGGER,
    Key::BTN_THUMB,
    Key::BTN_THUMB2,
    Key::BTN_TOP,
    Key::BTN_TOP2,
    Key::BTN_PINKIE,
    Key::BTN_BASE,
    Key::BTN_BASE2,
    Key::BTN_BASE3,
    Key::BTN_BASE4,
    Key::BTN_BASE5,
    Key::BTN_BASE6,
];

/// Source of input snapshots for the control loop.
///
/// Abstracts [`JoystickSampler`] so the control loop can be driven by
/// scripted snapshots in tests.
pub trait InputSource: Send {
    /// Produce a fresh snapshot, or `None` if the device cannot be read.
    ///
    /// A `None` poll is silent: the caller skips the tick and tries again
    /// on the next one.
    fn poll(&mut self) -> Option<InputSnapshot>;
}

/// Joystick handle backed by an evdev device.
pub struct JoystickSampler {
    device: Device,
    device_path: String,
}

impl JoystickSampler {
    /// Detect and open the first available joystick-class device.
    ///
    /// Scans `/dev/input/event*` in sorted order for deterministic
    /// selection when multiple devices are attached, and grabs the device
    /// for exclusive input access. A failed grab is logged and tolerated.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: no joystick-class device on the system
    /// - `Controller`: `/dev/input` cannot be enumerated
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptz_bridge::joystick::JoystickSampler;
    ///
    /// let sampler = JoystickSampler::open()?;
    /// println!("joystick at: {}", sampler.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(PtzBridgeError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| PtzBridgeError::Controller(format!("failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                PtzBridgeError::Controller(format!("failed to read directory entry: {}", e))
            })?;

        // Sort entries for deterministic device selection
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            if let Some(filename) = path.file_name() {
                if !filename.to_string_lossy().starts_with("event") {
                    continue;
                }
            } else {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    if !Self::is_joystick(&device) {
                        continue;
                    }
                    let device_path = path.to_string_lossy().to_string();
                    info!(
                        "Found joystick {:?} at: {}",
                        device.name().unwrap_or("unknown"),
                        device_path
                    );
                    return Ok(Self::acquire(device, device_path));
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(PtzBridgeError::ControllerNotFound)
    }

    /// Open a specific evdev device path as a joystick.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: the device exists but is not joystick-class
    /// - `Controller`: the path cannot be opened
    pub fn open_path(path: &str) -> Result<Self> {
        let device = Device::open(path)
            .map_err(|e| PtzBridgeError::Controller(format!("failed to open {}: {}", path, e)))?;
        if !Self::is_joystick(&device) {
            return Err(PtzBridgeError::ControllerNotFound);
        }
        Ok(Self::acquire(device, path.to_string()))
    }

    fn acquire(mut device: Device, device_path: String) -> Self {
        if let Err(e) = device.grab() {
            warn!("Could not grab {} for exclusive access: {}", device_path, e);
        }
        Self {
            device,
            device_path,
        }
    }

    /// Whether a device looks like a joystick: an X axis plus the classic
    /// joystick button range.
    fn is_joystick(device: &Device) -> bool {
        let has_axes = device
            .supported_absolute_axes()
            .map_or(false, |axes| axes.contains(AbsoluteAxisType::ABS_X));
        let has_buttons = device
            .supported_keys()
            .map_or(false, |keys| keys.contains(Key::BTN_TRIGGER));
        has_axes && has_buttons
    }

    /// Get the device path of this joystick
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Get the joystick name from evdev
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }
}

impl InputSource for JoystickSampler {
    fn poll(&mut self) -> Option<InputSnapshot> {
        let abs = match self.device.get_abs_state() {
            Ok(abs) => abs,
            Err(e) => {
                debug!("axis state query failed: {}", e);
                return None;
            }
        };
        let keys = match self.device.get_key_state() {
            Ok(keys) => keys,
            Err(e) => {
                debug!("key state query failed: {}", e);
                return None;
            }
        };

        let mut snapshot = InputSnapshot::default();
        for (i, axis) in AXIS_CODES.iter().enumerate() {
            let info = abs[axis.0 as usize];
            snapshot.axes[i] = scale_axis(info.value, info.minimum, info.maximum);
        }
        for (i, button) in BUTTON_CODES.iter().enumerate() {
            snapshot.buttons[i] = keys.contains(*button);
        }
        snapshot.hat = hat_angle(
            abs[AbsoluteAxisType::ABS_HAT0X.0 as usize].value,
            abs[AbsoluteAxisType::ABS_HAT0Y.0 as usize].value,
        );
        Some(snapshot)
    }
}

/// Rescale a raw axis reading into the signed 16-bit snapshot range.
///
/// Joystick descriptors declare arbitrary axis ranges (0..255 and 0..1023
/// are common); the downstream deadzone and speed math assume
/// `[-32768, 32767]`. Readings outside the declared range are clamped to
/// it first. A degenerate descriptor (`maximum <= minimum`) passes the
/// reading through unchanged.
fn scale_axis(value: i32, minimum: i32, maximum: i32) -> i32 {
    if maximum <= minimum {
        return value;
    }
    let span = i64::from(maximum) - i64::from(minimum);
    let pos = (i64::from(value) - i64::from(minimum)).clamp(0, span);
    (pos * 65535 / span - 32768) as i32
}

/// Synthesize a hat angle in hundredths of a degree from the d-pad axes.
///
/// evdev reports the hat as two axes in `{-1, 0, 1}` with negative Y = up.
/// `None` means centered.
///
/// # Examples
///
/// ```
/// use ptz_bridge::joystick::sampler::hat_angle;
///
/// assert_eq!(hat_angle(0, -1), Some(0));     // up
/// assert_eq!(hat_angle(1, 0), Some(9000));   // right
/// assert_eq!(hat_angle(0, 0), None);         // centered
/// ```
#[must_use]
pub fn hat_angle(x: i32, y: i32) -> Option<u16> {
    match (x.signum(), y.signum()) {
        (0, -1) => Some(0),
        (1, -1) => Some(4500),
        (1, 0) => Some(9000),
        (1, 1) => Some(13500),
        (0, 1) => Some(18000),
        (-1, 1) => Some(22500),
        (-1, 0) => Some(27000),
        (-1, -1) => Some(31500),
        _ => None,
    }
}
