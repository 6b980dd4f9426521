//! Screens and visual state the dispatcher knows about

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::capability::Navigator;

/// Navigation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenId {
    Home,
    Video,
}

impl ScreenId {
    pub fn title(self) -> &'static str {
        match self {
            ScreenId::Home => "Home",
            ScreenId::Video => "Video",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Two-valued background flag flipped by `ToggleBackground`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backdrop {
    #[default]
    Primary,
    Secondary,
}

impl Backdrop {
    pub fn toggled(self) -> Self {
        match self {
            Backdrop::Primary => Backdrop::Secondary,
            Backdrop::Secondary => Backdrop::Primary,
        }
    }
}

/// The video screen: a player bound to one fixed content id, plus "go back".
pub struct VideoScreen {
    video_id: String,
    navigator: Arc<dyn Navigator>,
}

impl VideoScreen {
    pub fn new(video_id: impl Into<String>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            video_id: video_id.into(),
            navigator,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Link a player (or a browser) can open for the bound content.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    /// Request the previous navigation state.
    pub fn go_back(&self) {
        tracing::debug!(video_id = %self.video_id, "Leaving video screen");
        self.navigator.go_back();
    }
}

impl fmt::Debug for VideoScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoScreen")
            .field("video_id", &self.video_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{NavEvent, RecordingNavigator};

    #[test]
    fn test_backdrop_toggles() {
        let bg = Backdrop::default();
        assert_eq!(bg, Backdrop::Primary);
        assert_eq!(bg.toggled(), Backdrop::Secondary);
        assert_eq!(bg.toggled().toggled(), Backdrop::Primary);
    }

    #[test]
    fn test_video_screen_goes_back() {
        let nav = Arc::new(RecordingNavigator::default());
        let screen = VideoScreen::new("dQw4w9WgXcQ", nav.clone());

        assert_eq!(
            screen.watch_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );

        screen.go_back();
        assert_eq!(nav.events(), vec![NavEvent::Back]);
    }

    #[test]
    fn test_screen_id_serde() {
        let json = serde_json::to_string(&ScreenId::Video).unwrap();
        assert_eq!(json, "\"video\"");
        let back: ScreenId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScreenId::Video);
    }
}
