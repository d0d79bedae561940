//! # PTZ Bridge
//!
//! Control a remote pan-tilt-zoom (PTZ) camera with a gamepad.
//!
//! This application bridges joystick input to PTZ camera commands at a
//! fixed 50ms cadence and pumps live-view frames pushed by the camera
//! library into a display sink.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

mod camera;
mod config;
mod control;
mod error;
mod joystick;
mod liveview;

use camera::{CameraPort, SimCameraPort};
use config::Config;
use control::ControlLoop;
use joystick::JoystickSampler;
use liveview::{ChannelSink, FramePump};

/// Configuration file used when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for PTZ Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (defaults when no file is present)
///    - Connect to the camera and register the frame callback
///    - Detect and arm the joystick control loop
///
/// 2. **Main Loop**
///    - Tick the control loop at the configured cadence (50ms default)
///    - Drain decoded live-view frames on a display task
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Disarm the control session
///    - Disconnect from the camera
///
/// A missing joystick is reported, not fatal: the control loop stays idle
/// and live view keeps running.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("PTZ Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        info!("no config file at {}, using defaults", config_path);
        Config::default()
    };

    // The simulated port stands in for the vendor device library; real
    // deployments provide their own CameraPort implementation.
    let port = Arc::new(SimCameraPort::new()?);
    port.connect(&config.camera.target)?;
    info!("camera connected to {}", config.camera.target);

    // Live view: device callback -> pump -> channel -> display task
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let pump = Arc::new(FramePump::new(Arc::clone(&port), ChannelSink::new(frame_tx)));
    {
        let pump = Arc::clone(&pump);
        port.register_frame_callback(Box::new(move || pump.on_frame_available()));
    }
    let display_task = tokio::spawn(async move {
        while let Some(image) = frame_rx.recv().await {
            // Stand-in display sink; a windowed frontend would swap its
            // texture here, dropping the previous image.
            debug!(
                width = image.width(),
                height = image.height(),
                "live-view frame updated"
            );
        }
    });

    // Control loop: joystick absence leaves it idle
    let mut control = match open_joystick(&config) {
        Ok(sampler) => {
            info!(
                "joystick {:?} at {}",
                sampler.name().unwrap_or("unknown"),
                sampler.device_path()
            );
            let mut control = ControlLoop::new(Arc::clone(&port), sampler, &config.control);
            if !control.arm() {
                warn!("joystick produced no snapshot; control loop stays idle");
            }
            Some(control)
        }
        Err(e) => {
            warn!("no joystick available ({}); control loop stays idle", e);
            None
        }
    };

    let mut tick = interval(Duration::from_millis(config.control.tick_interval_ms));
    info!(
        "control loop ticking every {}ms, press Ctrl+C to exit",
        config.control.tick_interval_ms
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Some(control) = control.as_mut() {
                    control.tick();
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    if let Some(control) = control.as_mut() {
        control.disarm();
    }
    port.disconnect()?;
    display_task.abort();

    Ok(())
}

/// Open the configured joystick, auto-detecting when no path is set.
fn open_joystick(config: &Config) -> error::Result<JoystickSampler> {
    if config.joystick.device_path.is_empty() {
        JoystickSampler::open()
    } else {
        JoystickSampler::open_path(&config.joystick.device_path)
    }
}
