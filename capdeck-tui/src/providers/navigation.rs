use capdeck::{Navigator, ScreenId, Transition};

use crate::bridge::{UiBridge, UiRequest};

/// Pushes and pops screens on the screen loop's stack.
#[derive(Clone)]
pub struct ChannelNavigator {
    bridge: UiBridge,
}

impl ChannelNavigator {
    pub fn new(bridge: UiBridge) -> Self {
        Self { bridge }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, screen: ScreenId) {
        self.bridge.send(UiRequest::Navigate(screen));
    }

    fn go_back(&self) {
        self.bridge.send(UiRequest::Back);
    }
}

/// Pulses the focused button. Fire-and-forget; the screen loop animates it.
pub struct PulseTransition {
    bridge: UiBridge,
}

impl PulseTransition {
    pub fn new(bridge: UiBridge) -> Self {
        Self { bridge }
    }
}

impl Transition for PulseTransition {
    fn start(&self) {
        self.bridge.send(UiRequest::Pulse);
    }
}
