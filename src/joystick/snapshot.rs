//! # Input Snapshot Module
//!
//! Immutable per-poll snapshots of the joystick state and the calibration
//! offset captured when a session arms.
//!
//! ## Axis Layout
//!
//! | Index | Axis | Role |
//! |-------|------|------|
//! | 0 | X | tracked, unmapped |
//! | 1 | Y | zoom speed |
//! | 2 | Z | pan speed |
//! | 3 | RZ | tilt speed |
//!
//! Axis values are raw signed readings in the 16-bit range. Centering error
//! is zeroed out by subtracting the [`CalibrationOffset`] captured from the
//! first snapshot after connect.
//!
//! The hat (POV) position is an angle in hundredths of a degree in
//! `[0, 35999]`, or `None` when centered.

/// Number of sampled axes.
pub const AXIS_COUNT: usize = 4;

/// Number of sampled buttons.
pub const BUTTON_COUNT: usize = 12;

/// Axis index driving zoom (stick Y).
pub const AXIS_ZOOM: usize = 1;

/// Axis index driving pan (stick Z).
pub const AXIS_PAN: usize = 2;

/// Axis index driving tilt (stick RZ).
pub const AXIS_TILT: usize = 3;

/// One poll of the joystick state. Produced fresh on every tick and
/// immutable once captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Raw axis values, indexed X=0, Y=1, Z=2, RZ=3.
    pub axes: [i32; AXIS_COUNT],
    /// Button states, pressed = true.
    pub buttons: [bool; BUTTON_COUNT],
    /// Hat angle in hundredths of a degree, `None` = centered.
    pub hat: Option<u16>,
}

impl Default for InputSnapshot {
    /// All axes at rest, all buttons released, hat centered.
    fn default() -> Self {
        Self {
            axes: [0; AXIS_COUNT],
            buttons: [false; BUTTON_COUNT],
            hat: None,
        }
    }
}

impl InputSnapshot {
    /// Returns the axes with `offset` subtracted.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptz_bridge::joystick::{CalibrationOffset, InputSnapshot};
    ///
    /// let mut snap = InputSnapshot::default();
    /// snap.axes = [100, -200, 0, 50];
    /// let offset = CalibrationOffset { axes: [100, 100, 100, 100] };
    /// assert_eq!(snap.calibrated(&offset), [0, -300, -100, -50]);
    /// ```
    #[must_use]
    pub fn calibrated(&self, offset: &CalibrationOffset) -> [i32; AXIS_COUNT] {
        let mut out = [0; AXIS_COUNT];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.axes[i] - offset.axes[i];
        }
        out
    }
}

/// Baseline axis readings captured from the first snapshot after connect.
///
/// Subtracted from every subsequent snapshot to zero out stick drift and
/// centering error. Created when the control session arms, never mutated
/// while armed, discarded on disarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationOffset {
    /// Baseline axis values, same layout as [`InputSnapshot::axes`].
    pub axes: [i32; AXIS_COUNT],
}

impl CalibrationOffset {
    /// Captures the offset from a snapshot.
    #[must_use]
    pub fn capture(snapshot: &InputSnapshot) -> Self {
        Self {
            axes: snapshot.axes,
        }
    }
}
