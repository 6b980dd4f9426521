use std::io::Write;
use std::time::Duration;

use capdeck::{Haptics, Intensity};
use tracing::debug;

use crate::bridge::{UiBridge, UiRequest};

/// Terminal stand-in for a vibration motor: rings the bell and shakes the
/// screen border for the pulse duration.
pub struct TerminalHaptics {
    bridge: UiBridge,
    bell: bool,
}

impl TerminalHaptics {
    pub fn new(bridge: UiBridge) -> Self {
        Self { bridge, bell: true }
    }

    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }
}

impl Haptics for TerminalHaptics {
    fn pulse(&self, intensity: Intensity, duration: Duration) {
        debug!(?intensity, ?duration, "Haptic pulse");
        if self.bell && intensity != Intensity::Light {
            let mut out = std::io::stdout();
            // A lost bell is not worth surfacing.
            let _ = out.write_all(b"\x07").and_then(|()| out.flush());
        }
        self.bridge.send(UiRequest::Shake(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_shakes_for_duration() {
        let (bridge, mut rx) = UiBridge::channel();
        let haptics = TerminalHaptics::new(bridge).with_bell(false);

        haptics.pulse(Intensity::Heavy, Duration::from_millis(400));
        assert!(matches!(
            rx.try_recv(),
            Ok(UiRequest::Shake(d)) if d == Duration::from_millis(400)
        ));
    }
}
