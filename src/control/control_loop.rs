//! # Control Loop Module
//!
//! The fixed-period session scheduler driving the input-to-command
//! translation.
//!
//! ## State Machine
//!
//! - **Idle**: no session; ticks do nothing.
//! - **Armed**: a connection is established, the calibration offset has
//!   been captured from the first snapshot, and each tick runs
//!   poll -> translate -> dispatch -> commit.
//!
//! Arming fails (and the loop stays idle) when the input source produces
//! no snapshot, which is how a missing joystick is reported. Disarming is
//! idempotent and discards all per-session state.
//!
//! All outbound calls are fire-and-forget: a rejected command is logged
//! and the next tick proceeds regardless. Session state is committed only
//! after every command derived from the current snapshot has been issued.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::camera::port::{CameraPort, PROP_ZOOM_OPERATION};
use crate::config::ControlConfig;
use crate::control::dispatcher::{hat_bucket, EdgeDispatcher};
use crate::control::translator::{AxisCommand, AxisTranslator};
use crate::joystick::sampler::InputSource;
use crate::joystick::snapshot::{CalibrationOffset, InputSnapshot};

/// Per-session state, created on arm and discarded on disarm.
#[derive(Debug)]
struct Session {
    offset: CalibrationOffset,
    last: InputSnapshot,
    last_hat_bucket: i8,
}

/// Scheduler tying the input source, the axis translator and the edge
/// dispatcher together. Single-writer: only the timer task calls into it.
pub struct ControlLoop<P: CameraPort, S: InputSource> {
    port: Arc<P>,
    source: S,
    translator: AxisTranslator,
    dispatcher: EdgeDispatcher,
    session: Option<Session>,
}

impl<P: CameraPort, S: InputSource> ControlLoop<P, S> {
    /// Creates an idle control loop.
    pub fn new(port: Arc<P>, source: S, config: &ControlConfig) -> Self {
        Self {
            port,
            source,
            translator: AxisTranslator::new(config.deadzone, config.speed_max),
            dispatcher: EdgeDispatcher::new(),
            session: None,
        }
    }

    /// Whether a session is active.
    pub fn is_armed(&self) -> bool {
        self.session.is_some()
    }

    /// Arm the loop: capture the calibration offset from the first
    /// snapshot and start reacting to ticks.
    ///
    /// Returns `false` (and stays idle) when the input source produces no
    /// snapshot. Arming an already-armed loop is a no-op returning `true`.
    pub fn arm(&mut self) -> bool {
        if self.session.is_some() {
            return true;
        }
        let Some(first) = self.source.poll() else {
            debug!("arm skipped: input source produced no snapshot");
            return false;
        };
        let offset = CalibrationOffset::capture(&first);
        let last_hat_bucket = hat_bucket(first.hat);
        self.session = Some(Session {
            offset,
            last: first,
            last_hat_bucket,
        });
        debug!("control loop armed");
        true
    }

    /// Disarm the loop and discard all per-session state. Idempotent.
    pub fn disarm(&mut self) {
        if self.session.take().is_some() {
            debug!("control loop disarmed");
        }
    }

    /// Run one tick: poll, react, commit.
    ///
    /// Does nothing when idle. A failed poll skips the tick without
    /// touching session state.
    pub fn tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(curr) = self.source.poll() else {
            return;
        };

        if let Some(command) = self
            .translator
            .translate(&session.last, &curr, &session.offset)
        {
            let result = match command {
                AxisCommand::PanTilt { pan, tilt } => self.port.send_direction(pan, tilt),
                AxisCommand::Zoom { speed } => {
                    self.port
                        .set_property(PROP_ZOOM_OPERATION, i64::from(speed), false)
                }
            };
            if let Err(e) = result {
                warn!("axis command failed: {}", e);
            }
        }

        let (commands, bucket) =
            self.dispatcher
                .dispatch(&session.last, &curr, session.last_hat_bucket);
        for command in commands {
            if let Err(e) = self.port.send_command(command) {
                warn!("edge command failed: {}", e);
            }
        }

        // Commit only after every command from this snapshot has gone out
        session.last = curr;
        session.last_hat_bucket = bucket;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::port::mocks::MockCameraPort;
    use crate::camera::port::{HatDirection, NamedCommand};
    use std::collections::VecDeque;
    use std::sync::atomic::Ordering;

    /// Input source replaying a fixed script of polls.
    struct ScriptedSource {
        polls: VecDeque<Option<InputSnapshot>>,
    }

    impl ScriptedSource {
        fn new(polls: Vec<Option<InputSnapshot>>) -> Self {
            Self {
                polls: polls.into(),
            }
        }
    }

    impl InputSource for ScriptedSource {
        fn poll(&mut self) -> Option<InputSnapshot> {
            self.polls.pop_front().flatten()
        }
    }

    fn config() -> ControlConfig {
        ControlConfig::default()
    }

    fn snapshot(axes: [i32; 4]) -> InputSnapshot {
        InputSnapshot {
            axes,
            ..InputSnapshot::default()
        }
    }

    fn armed_loop(
        polls: Vec<Option<InputSnapshot>>,
    ) -> (Arc<MockCameraPort>, ControlLoop<MockCameraPort, ScriptedSource>) {
        let port = Arc::new(MockCameraPort::new());
        let mut control = ControlLoop::new(Arc::clone(&port), ScriptedSource::new(polls), &config());
        assert!(control.arm());
        (port, control)
    }

    #[test]
    fn test_no_device_never_arms() {
        let port = Arc::new(MockCameraPort::new());
        let mut control =
            ControlLoop::new(Arc::clone(&port), ScriptedSource::new(vec![None]), &config());

        assert!(!control.arm());
        assert!(!control.is_armed());

        // Ticks while idle are no-ops
        control.tick();
        assert!(port.directions.lock().unwrap().is_empty());
        assert!(port.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_arm_captures_offset_from_first_snapshot() {
        // Stick rests well off-center; the resting position must not
        // produce commands after calibration.
        let rest = snapshot([0, 3000, 8000, -8000]);
        let (port, mut control) = armed_loop(vec![Some(rest.clone()), Some(rest)]);

        control.tick();
        assert!(port.directions.lock().unwrap().is_empty());
        assert!(port.properties.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pan_tilt_command_issued_and_committed() {
        let rest = snapshot([0, 0, 0, 0]);
        let moved = snapshot([0, 0, 32767, 0]);
        let polls = vec![
            Some(rest),
            Some(moved.clone()),
            Some(moved), // unchanged: deadzone vs previous tick holds
        ];
        let (port, mut control) = armed_loop(polls);

        control.tick();
        control.tick();

        // Exactly one direction command despite two ticks at deflection
        let directions = port.directions.lock().unwrap();
        assert_eq!(*directions, vec![(-50, 0)]);
    }

    #[test]
    fn test_zoom_goes_out_as_nonblocking_property() {
        let rest = snapshot([0, 0, 0, 0]);
        let zoomed = snapshot([0, 10000, 0, 0]);
        let (port, mut control) = armed_loop(vec![Some(rest), Some(zoomed)]);

        control.tick();

        let properties = port.properties.lock().unwrap();
        assert_eq!(
            *properties,
            vec![(PROP_ZOOM_OPERATION.to_string(), -10000, false)]
        );
        assert!(port.directions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_deadzone_suppresses_jitter() {
        let rest = snapshot([0, 0, 0, 0]);
        let jitter = snapshot([0, 4000, -4000, 4000]);
        let (port, mut control) = armed_loop(vec![Some(rest), Some(jitter)]);

        control.tick();

        assert!(port.directions.lock().unwrap().is_empty());
        assert!(port.properties.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_poll_skips_tick_and_preserves_state() {
        let rest = snapshot([0, 0, 0, 0]);
        let moved = snapshot([0, 0, 32767, 0]);
        let polls = vec![Some(rest), None, Some(moved)];
        let (port, mut control) = armed_loop(polls);

        control.tick(); // poll fails: skipped
        control.tick(); // movement still measured against the rest state

        assert_eq!(*port.directions.lock().unwrap(), vec![(-50, 0)]);
    }

    #[test]
    fn test_simultaneous_button_edges_emit_lowest_only() {
        let rest = InputSnapshot::default();
        let mut pressed = InputSnapshot::default();
        pressed.buttons[1] = true;
        pressed.buttons[3] = true;
        let (port, mut control) = armed_loop(vec![Some(rest), Some(pressed)]);

        control.tick();

        assert_eq!(*port.commands.lock().unwrap(), vec![NamedCommand::MenuKey]);
    }

    #[test]
    fn test_hat_transition_emits_once_per_bucket_change() {
        let centered = InputSnapshot::default();
        let up = InputSnapshot {
            hat: Some(0),
            ..InputSnapshot::default()
        };
        let polls = vec![
            Some(centered.clone()),
            Some(up.clone()),
            Some(up),
            Some(centered),
        ];
        let (port, mut control) = armed_loop(polls);

        control.tick(); // centered -> bucket 0: Up fires
        control.tick(); // bucket 0 -> bucket 0: nothing
        control.tick(); // bucket 0 -> centered: nothing

        assert_eq!(
            *port.commands.lock().unwrap(),
            vec![NamedCommand::DirectionKey(HatDirection::Up)]
        );
    }

    #[test]
    fn test_rejected_command_does_not_stall_the_loop() {
        let rest = snapshot([0, 0, 0, 0]);
        let moved = snapshot([0, 0, 32767, 0]);
        let back = snapshot([0, 0, 0, 0]);
        let (port, mut control) = armed_loop(vec![Some(rest), Some(moved), Some(back)]);

        port.command_status.store(-1, Ordering::Relaxed);
        control.tick(); // rejected, logged, state still committed

        port.command_status.store(0, Ordering::Relaxed);
        control.tick(); // movement back to center fires a fresh command

        assert_eq!(*port.directions.lock().unwrap(), vec![(0, 0)]);
    }

    #[test]
    fn test_disarm_is_idempotent() {
        let rest = snapshot([0, 0, 0, 0]);
        let (port, mut control) = armed_loop(vec![Some(rest.clone()), Some(rest)]);

        control.disarm();
        assert!(!control.is_armed());
        control.disarm(); // second disarm is a no-op
        assert!(!control.is_armed());

        // Ticks after disarm do nothing
        control.tick();
        assert!(port.directions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rearm_recaptures_calibration() {
        let first_rest = snapshot([0, 0, 0, 0]);
        let second_rest = snapshot([0, 0, 20000, 0]);
        let polls = vec![
            Some(first_rest),
            Some(second_rest.clone()),
            Some(second_rest),
        ];
        let (port, mut control) = armed_loop(polls);

        control.disarm();
        assert!(control.arm()); // offset recaptured at the new resting point

        control.tick();
        assert!(port.directions.lock().unwrap().is_empty());
    }
}
