//! Channel from capability providers to the screen loop
//!
//! Providers run on arbitrary tasks; the terminal belongs to the screen loop.
//! Anything a provider wants to show is sent as a [`UiRequest`] and applied
//! by the loop on its next turn.

use std::time::Duration;

use capdeck::{PickedFile, ScreenId};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Something a provider asks the screen to do.
#[derive(Debug)]
pub enum UiRequest {
    Navigate(ScreenId),
    Back,
    /// Blocking notice; stays until acknowledged.
    Dialog {
        title: String,
        message: String,
    },
    /// Ephemeral notice.
    Banner(String),
    /// Shake the screen border for a while.
    Shake(Duration),
    /// Play the button pulse transition.
    Pulse,
    /// Show the file picker; the user's choice (or `None`) goes to `reply`.
    OpenPicker {
        entries: Vec<PickedFile>,
        reply: oneshot::Sender<Option<PickedFile>>,
    },
    /// A scheduled notification fired.
    NotificationDelivered {
        title: String,
        body: String,
        data: serde_json::Value,
    },
    /// Playback started (`Some(label)`) or stopped (`None`).
    NowPlaying(Option<String>),
}

/// Cloneable sender half handed to providers.
#[derive(Debug, Clone)]
pub struct UiBridge {
    tx: mpsc::UnboundedSender<UiRequest>,
}

impl UiBridge {
    /// Create a bridge and the receiver the screen loop drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Send a request. Returns `false` once the screen is gone.
    pub fn send(&self, request: UiRequest) -> bool {
        match self.tx.send(request) {
            Ok(()) => true,
            Err(mpsc::error::SendError(request)) => {
                debug!(?request, "Screen closed, dropping UI request");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
