//! Colors for the showcase screens

use capdeck::{ActionKind, Backdrop};
use ratatui::style::{Color, Modifier, Style};

/// Screen colors for one backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub muted: Color,
}

impl Palette {
    pub fn for_backdrop(backdrop: Backdrop) -> Self {
        match backdrop {
            Backdrop::Primary => Self {
                bg: Color::Rgb(24, 28, 44),
                fg: Color::Rgb(236, 236, 240),
                border: Color::Rgb(78, 205, 196),
                muted: Color::Rgb(120, 128, 150),
            },
            Backdrop::Secondary => Self {
                bg: Color::Rgb(52, 30, 46),
                fg: Color::Rgb(244, 236, 230),
                border: Color::Rgb(255, 107, 107),
                muted: Color::Rgb(160, 128, 140),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Fill color of each home screen button.
pub fn button_color(kind: ActionKind) -> Color {
    match kind {
        ActionKind::ToggleBackground => Color::Rgb(0xFF, 0x6B, 0x6B),
        ActionKind::PlayNetworkAudio => Color::Rgb(0x4E, 0xCD, 0xC4),
        ActionKind::PlayLocalAudio => Color::Rgb(0x45, 0xB7, 0xD1),
        ActionKind::Vibrate => Color::Rgb(0x96, 0xCE, 0xB4),
        ActionKind::PickFile => Color::Rgb(0xFF, 0xEE, 0xAD),
        ActionKind::ShowToast => Color::Rgb(0xD4, 0xA5, 0xA5),
        ActionKind::ScheduleNotification => Color::Rgb(0xF7, 0xB2, 0x67),
        ActionKind::NavigateToVideo => Color::Rgb(0x9B, 0x59, 0xB6),
    }
}

/// Label color readable on top of [`button_color`].
pub fn button_text(kind: ActionKind) -> Color {
    match kind {
        ActionKind::PickFile | ActionKind::Vibrate | ActionKind::ScheduleNotification => {
            Color::Rgb(40, 40, 40)
        }
        _ => Color::White,
    }
}

pub fn selected_border() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Shake border color.
pub const SHAKE: Color = Color::Rgb(255, 80, 80);

/// Modal surface color.
pub const MODAL_BG: Color = Color::Rgb(30, 30, 40);

/// Video screen background and its back button.
pub const VIDEO_BG: Color = Color::Black;
pub const BACK_BUTTON: Color = Color::Rgb(0xFF, 0x6B, 0x6B);
