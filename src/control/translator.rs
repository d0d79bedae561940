//! # Axis Translator Module
//!
//! Stateless converter from a pair of input snapshots (previous tick,
//! current tick) into at most one outbound axis command.
//!
//! ## Algorithm
//!
//! 1. Calibrate both snapshots by subtracting the session offset.
//! 2. Pan/tilt preempts zoom: if either the pan axis (Z) or the tilt axis
//!    (RZ) moved more than the deadzone since the previous tick, emit a
//!    pan/tilt direction command. Otherwise, if the zoom axis (Y) moved
//!    more than the deadzone, emit a zoom command.
//! 3. Pan and tilt speeds are the calibrated reading scaled into
//!    `[-speed_max, speed_max]` and sign-inverted. Zoom is the calibrated
//!    reading sign-inverted and clamped to the signed 16-bit range.
//!
//! The deadzone compares against the previous tick's calibrated value,
//! not the calibration baseline. Small jitter around the last sent state
//! is suppressed; a slow continuous drift below the threshold per tick
//! never emits a command. This matches the deployed controller behavior
//! and is kept as-is.

use crate::joystick::snapshot::{
    CalibrationOffset, InputSnapshot, AXIS_PAN, AXIS_TILT, AXIS_ZOOM,
};

/// Full scale of a signed 16-bit axis, used to scale speeds.
const AXIS_FULL_SCALE: f64 = 32768.0;

/// Zoom value range accepted by the zoom property.
const ZOOM_LIMIT: i32 = 32767;

/// At most one axis command is emitted per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisCommand {
    /// Pan/tilt direction vector with signed speeds in
    /// `[-speed_max, speed_max]`.
    PanTilt { pan: i32, tilt: i32 },
    /// Zoom speed in `[-32767, 32767]`, issued as a non-blocking
    /// property set.
    Zoom { speed: i32 },
}

/// Converts calibrated axis movement into outbound commands.
#[derive(Debug, Clone, Copy)]
pub struct AxisTranslator {
    deadzone: i32,
    speed_max: i32,
}

impl AxisTranslator {
    /// Creates a translator with the given per-tick deadzone and pan/tilt
    /// speed ceiling.
    #[must_use]
    pub fn new(deadzone: i32, speed_max: i32) -> Self {
        Self { deadzone, speed_max }
    }

    /// Translate one tick of axis movement into zero or one command.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptz_bridge::control::{AxisCommand, AxisTranslator};
    /// use ptz_bridge::joystick::{CalibrationOffset, InputSnapshot};
    ///
    /// let translator = AxisTranslator::new(5000, 50);
    /// let offset = CalibrationOffset { axes: [0; 4] };
    /// let prev = InputSnapshot::default();
    /// let mut curr = InputSnapshot::default();
    /// curr.axes[2] = 32768; // pan stick hard over
    ///
    /// assert_eq!(
    ///     translator.translate(&prev, &curr, &offset),
    ///     Some(AxisCommand::PanTilt { pan: -50, tilt: 0 })
    /// );
    /// ```
    #[must_use]
    pub fn translate(
        &self,
        prev: &InputSnapshot,
        curr: &InputSnapshot,
        offset: &CalibrationOffset,
    ) -> Option<AxisCommand> {
        let prev_cal = prev.calibrated(offset);
        let cal = curr.calibrated(offset);

        let pan_moved = (prev_cal[AXIS_PAN] - cal[AXIS_PAN]).abs() > self.deadzone;
        let tilt_moved = (prev_cal[AXIS_TILT] - cal[AXIS_TILT]).abs() > self.deadzone;

        // Pan/tilt always wins ties with zoom
        if pan_moved || tilt_moved {
            return Some(AxisCommand::PanTilt {
                pan: self.speed(cal[AXIS_PAN]),
                tilt: self.speed(cal[AXIS_TILT]),
            });
        }

        let zoom_moved = (prev_cal[AXIS_ZOOM] - cal[AXIS_ZOOM]).abs() > self.deadzone;
        if zoom_moved {
            return Some(AxisCommand::Zoom {
                speed: (-cal[AXIS_ZOOM]).clamp(-ZOOM_LIMIT, ZOOM_LIMIT),
            });
        }

        None
    }

    /// Scale a calibrated axis reading into a sign-inverted speed within
    /// `[-speed_max, speed_max]`.
    fn speed(&self, calibrated: i32) -> i32 {
        let scaled = (f64::from(calibrated) * f64::from(self.speed_max) / AXIS_FULL_SCALE).round();
        (-(scaled as i32)).clamp(-self.speed_max, self.speed_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::snapshot::AXIS_COUNT;

    const DEADZONE: i32 = 5000;
    const SPEED_MAX: i32 = 50;

    fn translator() -> AxisTranslator {
        AxisTranslator::new(DEADZONE, SPEED_MAX)
    }

    fn zero_offset() -> CalibrationOffset {
        CalibrationOffset {
            axes: [0; AXIS_COUNT],
        }
    }

    fn snapshot(axes: [i32; AXIS_COUNT]) -> InputSnapshot {
        InputSnapshot {
            axes,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn test_deadzone_holds() {
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);

        // All deltas at or below the threshold
        for axes in [
            [0, 5000, 0, 0],
            [0, -5000, 0, 0],
            [0, 0, 5000, 0],
            [0, 0, 0, -5000],
            [0, 4999, 4999, 4999],
        ] {
            assert_eq!(t.translate(&prev, &snapshot(axes), &offset), None);
        }
    }

    #[test]
    fn test_pan_tilt_emitted_above_threshold() {
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);
        let curr = snapshot([0, 0, 5001, 0]);

        match t.translate(&prev, &curr, &offset) {
            Some(AxisCommand::PanTilt { pan, tilt }) => {
                assert!(pan < 0, "pan must be sign-inverted");
                assert_eq!(tilt, 0);
            }
            other => panic!("expected pan/tilt, got {:?}", other),
        }
    }

    #[test]
    fn test_pan_tilt_clamped_and_sign_inverted() {
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);

        // Full positive deflection maps to -SPEED_MAX, full negative to +SPEED_MAX
        let curr = snapshot([0, 0, 32767, -32768]);
        assert_eq!(
            t.translate(&prev, &curr, &offset),
            Some(AxisCommand::PanTilt {
                pan: -SPEED_MAX,
                tilt: SPEED_MAX
            })
        );
    }

    #[test]
    fn test_pan_tilt_always_within_speed_ceiling() {
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);

        for raw in (-32768..=32767).step_by(997) {
            let curr = snapshot([0, 0, raw, raw]);
            if let Some(AxisCommand::PanTilt { pan, tilt }) = t.translate(&prev, &curr, &offset) {
                assert!((-SPEED_MAX..=SPEED_MAX).contains(&pan), "pan {} for raw {}", pan, raw);
                assert!((-SPEED_MAX..=SPEED_MAX).contains(&tilt));
                // Sign inversion relative to the raw reading
                assert!(raw == 0 || pan.signum() == -raw.signum() || pan == 0);
            }
        }
    }

    #[test]
    fn test_pan_tilt_preempts_zoom() {
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);

        // Both the zoom axis and the pan axis exceed the threshold
        let curr = snapshot([0, 20000, 20000, 0]);
        match t.translate(&prev, &curr, &offset) {
            Some(AxisCommand::PanTilt { .. }) => {}
            other => panic!("pan/tilt must preempt zoom, got {:?}", other),
        }
    }

    #[test]
    fn test_zoom_emitted_when_pan_tilt_quiet() {
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);
        let curr = snapshot([0, 12000, 0, 0]);

        assert_eq!(
            t.translate(&prev, &curr, &offset),
            Some(AxisCommand::Zoom { speed: -12000 })
        );
    }

    #[test]
    fn test_zoom_clamped_to_signed_16bit() {
        let t = translator();
        let offset = CalibrationOffset {
            axes: [0, 1000, 0, 0],
        };
        let prev = snapshot([0, 1000, 0, 0]);
        // Calibrated zoom reading of -33768 clamps at +32767 after inversion
        let curr = snapshot([0, -32768, 0, 0]);

        assert_eq!(
            t.translate(&prev, &curr, &offset),
            Some(AxisCommand::Zoom { speed: 32767 })
        );
    }

    #[test]
    fn test_calibration_offset_applied() {
        let t = translator();
        // Stick rests off-center; resting reading must not trigger commands
        let offset = CalibrationOffset {
            axes: [300, -400, 7000, -7000],
        };
        let rest = snapshot([300, -400, 7000, -7000]);
        assert_eq!(t.translate(&rest, &rest, &offset), None);

        // Movement is measured from the calibrated position
        let curr = snapshot([300, -400, 13000, -7000]);
        match t.translate(&rest, &curr, &offset) {
            Some(AxisCommand::PanTilt { pan, .. }) => assert!(pan < 0),
            other => panic!("expected pan/tilt, got {:?}", other),
        }
    }

    #[test]
    fn test_threshold_is_relative_to_previous_tick() {
        let t = translator();
        let offset = zero_offset();

        // A slow drift of 4000 units per tick stays under the threshold
        // forever, even though it walks far from the baseline.
        let mut prev = snapshot([0, 0, 0, 0]);
        for step in 1..=8 {
            let curr = snapshot([0, 0, step * 4000, 0]);
            assert_eq!(t.translate(&prev, &curr, &offset), None, "step {}", step);
            prev = curr;
        }

        // A single jump of the same total size fires immediately.
        let jump = snapshot([0, 0, 32000, 0]);
        assert!(t
            .translate(&snapshot([0, 0, 0, 0]), &jump, &offset)
            .is_some());
    }

    #[test]
    fn test_at_most_one_command_per_tick() {
        // Enforced by the return type; this documents the tie behavior:
        // zoom movement alongside pan movement yields only the pan command.
        let t = translator();
        let offset = zero_offset();
        let prev = snapshot([0, 0, 0, 0]);
        let curr = snapshot([0, 32000, 32000, 32000]);

        assert_eq!(
            t.translate(&prev, &curr, &offset),
            Some(AxisCommand::PanTilt {
                pan: -SPEED_MAX,
                tilt: -SPEED_MAX
            })
        );
    }
}
