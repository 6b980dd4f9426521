use capdeck::NoticeSurface;

use crate::bridge::{UiBridge, UiRequest};

/// Notices drawn by the screen loop: a modal dialog, or a banner along the
/// bottom edge when banners are enabled.
pub struct TerminalNotices {
    bridge: UiBridge,
    banners: bool,
}

impl TerminalNotices {
    pub fn new(bridge: UiBridge) -> Self {
        Self {
            bridge,
            banners: true,
        }
    }

    /// Disable banners so every notice becomes a dialog.
    pub fn with_banners(mut self, banners: bool) -> Self {
        self.banners = banners;
        self
    }
}

impl NoticeSurface for TerminalNotices {
    fn notify_user(&self, title: &str, message: &str) {
        self.bridge.send(UiRequest::Dialog {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn supports_banner(&self) -> bool {
        self.banners
    }

    fn show_banner(&self, message: &str) {
        if self.banners {
            self.bridge.send(UiRequest::Banner(message.to_string()));
        } else {
            self.notify_user("Notice", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_and_dialog() {
        let (bridge, mut rx) = UiBridge::channel();
        let notices = TerminalNotices::new(bridge);

        assert!(notices.supports_banner());
        notices.show_banner("Hello Toast!");
        notices.notify_user("Error", "Failed to pick file");

        assert!(matches!(rx.try_recv(), Ok(UiRequest::Banner(m)) if m == "Hello Toast!"));
        assert!(matches!(
            rx.try_recv(),
            Ok(UiRequest::Dialog { title, message }) if title == "Error" && message == "Failed to pick file"
        ));
    }

    #[test]
    fn test_banners_disabled() {
        let (bridge, mut rx) = UiBridge::channel();
        let notices = TerminalNotices::new(bridge).with_banners(false);

        assert!(!notices.supports_banner());
        notices.show_banner("Hello Toast!");
        assert!(matches!(rx.try_recv(), Ok(UiRequest::Dialog { .. })));
    }
}
