//! # Edge Dispatcher Module
//!
//! Converts button and hat state transitions into discrete one-shot
//! commands.
//!
//! ## Button Edges
//!
//! A command fires on a press edge (released -> pressed). The scan stops
//! at the lowest transitioning index per tick, whether or not that index
//! maps to a command, so at most one button command goes out per tick.
//! This first-found-wins behavior matches the deployed controller and is
//! kept as-is.
//!
//! ## Button Mapping
//!
//! | index | command |
//! |-------|---------|
//! | 0 | zoom-recenter / home |
//! | 1 | menu key |
//! | 2 | cancel/back key |
//! | 3 | select/enter key |
//! | 11 | display-toggle key |
//!
//! Other indices are tracked but unmapped.
//!
//! ## Hat Edges
//!
//! The hat angle (hundredths of a degree) divides into 8 directional
//! buckets of 45 degrees each; centered maps to bucket -1. A directional
//! key command fires once per bucket transition, not per tick, and the
//! centered bucket emits nothing.

use crate::camera::port::{HatDirection, NamedCommand};
use crate::joystick::snapshot::{InputSnapshot, BUTTON_COUNT};

/// Bucket value representing a centered hat.
pub const HAT_CENTERED_BUCKET: i8 = -1;

/// Width of one hat bucket in hundredths of a degree.
const HAT_BUCKET_SPAN: u16 = 4500;

/// Converts a hat angle into a directional bucket (0..=7), or
/// [`HAT_CENTERED_BUCKET`] when centered.
#[must_use]
pub fn hat_bucket(hat: Option<u16>) -> i8 {
    match hat {
        Some(angle) => (angle / HAT_BUCKET_SPAN) as i8,
        None => HAT_CENTERED_BUCKET,
    }
}

/// Maps a button index to its one-shot command, if any.
#[must_use]
fn command_for_button(index: usize) -> Option<NamedCommand> {
    match index {
        0 => Some(NamedCommand::Home),
        1 => Some(NamedCommand::MenuKey),
        2 => Some(NamedCommand::CancelKey),
        3 => Some(NamedCommand::SelectKey),
        11 => Some(NamedCommand::DisplayToggle),
        _ => None,
    }
}

/// Maps a directional bucket to its hat direction. Out-of-range buckets
/// (including centered) map to nothing.
#[must_use]
fn direction_for_bucket(bucket: i8) -> Option<HatDirection> {
    match bucket {
        0 => Some(HatDirection::Up),
        1 => Some(HatDirection::UpRight),
        2 => Some(HatDirection::Right),
        3 => Some(HatDirection::DownRight),
        4 => Some(HatDirection::Down),
        5 => Some(HatDirection::DownLeft),
        6 => Some(HatDirection::Left),
        7 => Some(HatDirection::UpLeft),
        _ => None,
    }
}

/// Stateless edge detector; the caller owns the last hat bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDispatcher;

impl EdgeDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Detect edges between two snapshots.
    ///
    /// Returns the commands to issue this tick (at most one button command
    /// plus at most one hat command) and the new hat bucket to commit.
    #[must_use]
    pub fn dispatch(
        &self,
        prev: &InputSnapshot,
        curr: &InputSnapshot,
        last_bucket: i8,
    ) -> (Vec<NamedCommand>, i8) {
        let mut commands = Vec::new();

        if let Some(command) = Self::button_edge(prev, curr) {
            commands.push(command);
        }

        let bucket = hat_bucket(curr.hat);
        if bucket != last_bucket {
            if let Some(direction) = direction_for_bucket(bucket) {
                commands.push(NamedCommand::DirectionKey(direction));
            }
        }

        (commands, bucket)
    }

    /// Scan for the lowest press edge and map it. The scan stops at the
    /// first transitioning index even when it is unmapped.
    fn button_edge(prev: &InputSnapshot, curr: &InputSnapshot) -> Option<NamedCommand> {
        for index in 0..BUTTON_COUNT {
            if !prev.buttons[index] && curr.buttons[index] {
                return command_for_button(index);
            }
        }
        None
    }
}
