//! Capability providers for a terminal session
//!
//! Every provider talks to the screen loop through a [`UiBridge`]; none of
//! them touch the terminal directly except the haptics bell.

mod audio;
mod haptics;
mod navigation;
mod notices;
mod picker;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use capdeck::{Capabilities, ShowcaseConfig};

pub use audio::TerminalAudio;
pub use haptics::TerminalHaptics;
pub use navigation::{ChannelNavigator, PulseTransition};
pub use notices::TerminalNotices;
pub use picker::DirectoryPicker;
pub use scheduler::{decode_payload, TimerScheduler};

use crate::bridge::UiBridge;

/// Build the full provider set for a terminal screen.
pub fn terminal_capabilities(bridge: &UiBridge, config: &ShowcaseConfig) -> Capabilities {
    let pick_dir = config
        .picker
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    Capabilities {
        audio: Arc::new(TerminalAudio::new(bridge.clone(), &config.assets_dir)),
        haptics: Arc::new(TerminalHaptics::new(bridge.clone())),
        files: Arc::new(DirectoryPicker::new(bridge.clone(), pick_dir)),
        notices: Arc::new(TerminalNotices::new(bridge.clone())),
        scheduler: Arc::new(TimerScheduler::new(bridge.clone())),
        navigator: Arc::new(ChannelNavigator::new(bridge.clone())),
        transition: Arc::new(PulseTransition::new(bridge.clone())),
    }
}
