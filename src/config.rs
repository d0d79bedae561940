//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Configuration is read-only input: the bridge never writes it back.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub joystick: JoystickConfig,

    #[serde(default)]
    pub control: ControlConfig,
}

/// Camera connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// Connect target: `<ip-address> [userid] [password]`
    #[serde(default = "default_camera_target")]
    pub target: String,
}

/// Joystick configuration
#[derive(Debug, Deserialize, Clone)]
pub struct JoystickConfig {
    /// Explicit evdev device path. Empty = auto-detect the first
    /// joystick-class device.
    #[serde(default)]
    pub device_path: String,
}

/// Control loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    /// Poll period for the input-to-command loop, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Per-tick axis deadzone in raw axis units. A calibrated axis must
    /// move more than this since the previous tick to emit a command.
    #[serde(default = "default_deadzone")]
    pub deadzone: i32,

    /// Pan/tilt speed ceiling. Kept well below the protocol maximum of
    /// 127 as a safety derate.
    #[serde(default = "default_speed_max")]
    pub speed_max: i32,
}

// Default value functions
fn default_camera_target() -> String { "192.168.0.100".to_string() }

fn default_tick_interval_ms() -> u64 { 50 }
fn default_deadzone() -> i32 { 5000 }
fn default_speed_max() -> i32 { 50 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target: default_camera_target(),
        }
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            deadzone: default_deadzone(),
            speed_max: default_speed_max(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            joystick: JoystickConfig::default(),
            control: ControlConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptz_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.camera.target.is_empty() {
            return Err(crate::error::PtzBridgeError::Config(
                toml::de::Error::custom("camera target cannot be empty"),
            ));
        }

        if self.control.tick_interval_ms == 0 || self.control.tick_interval_ms > 1000 {
            return Err(crate::error::PtzBridgeError::Config(
                toml::de::Error::custom("tick_interval_ms must be between 1 and 1000"),
            ));
        }

        if self.control.deadzone < 1 || self.control.deadzone > 32766 {
            return Err(crate::error::PtzBridgeError::Config(
                toml::de::Error::custom("deadzone must be between 1 and 32766"),
            ));
        }

        if self.control.speed_max < 1 || self.control.speed_max > 127 {
            return Err(crate::error::PtzBridgeError::Config(
                toml::de::Error::custom("speed_max must be between 1 and 127"),
            ));
        }

        Ok(())
    }
}
