//! # Display Sink Module
//!
//! Destination for decoded live-view images.
//!
//! The pump may run on an arbitrary device-library thread, so display
//! mutation is modeled as a message-passing hand-off: [`ChannelSink`]
//! posts the decoded image onto a channel owned by the display loop
//! instead of touching display state directly. The consumer replaces its
//! held image with the received one, dropping the previous image's
//! resources.

use image::DynamicImage;
use tokio::sync::mpsc;
use tracing::debug;

/// Consumer of decoded live-view images.
///
/// Implementations must be safe to call repeatedly and from any thread;
/// the pump guarantees `set_image` is called with a fully decoded image
/// or not at all.
pub trait DisplaySink: Send + Sync {
    /// Replace the currently displayed image.
    fn set_image(&self, image: DynamicImage);
}

/// Display sink posting images onto a tokio channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DynamicImage>,
}

impl ChannelSink {
    /// Wraps the sending half of the display loop's channel.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<DynamicImage>) -> Self {
        Self { tx }
    }
}

impl DisplaySink for ChannelSink {
    fn set_image(&self, image: DynamicImage) {
        if self.tx.send(image).is_err() {
            debug!("display receiver gone; live-view frame discarded");
        }
    }
}
