use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::component::Component;
use crate::theme::Palette;

pub struct StatusBarProps<'a> {
    /// Ephemeral banner, drawn on the first line
    pub banner: Option<&'a str>,
    pub now_playing: Option<&'a str>,
    pub hints: &'a str,
    pub palette: Palette,
}

/// Two-line footer: banner above, playback state and key hints below.
#[derive(Default)]
pub struct StatusBar;

impl StatusBar {
    pub const HEIGHT: u16 = 2;
}

impl<A> Component<A> for StatusBar {
    type Props<'a> = StatusBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [banner_area, status_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        if let Some(banner) = props.banner {
            frame.render_widget(
                Paragraph::new(format!(" {banner} "))
                    .alignment(Alignment::Center)
                    .style(
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Rgb(0xFF, 0xEE, 0xAD))
                            .add_modifier(Modifier::BOLD),
                    ),
                banner_area,
            );
        }

        let playing = match props.now_playing {
            Some(source) => Span::styled(
                format!(" ♪ {source}"),
                Style::default().fg(props.palette.fg).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(" nothing playing", Style::default().fg(props.palette.muted)),
        };
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(props.hints.len() as u16 + 1)])
                .areas(status_area);
        frame.render_widget(Paragraph::new(Line::from(playing)).style(props.palette.base()), left);
        frame.render_widget(
            Paragraph::new(props.hints)
                .alignment(Alignment::Right)
                .style(props.palette.base().fg(props.palette.muted)),
            right,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RenderHarness;
    use capdeck::Backdrop;

    fn render(banner: Option<&str>, now_playing: Option<&str>) -> String {
        let mut harness = RenderHarness::new(80, 2);
        harness.render_to_string_plain(|frame| {
            let props = StatusBarProps {
                banner,
                now_playing,
                hints: "q quit",
                palette: Palette::for_backdrop(Backdrop::Primary),
            };
            let area = frame.area();
            <StatusBar as Component<()>>::render(&mut StatusBar, frame, area, props);
        })
    }

    #[test]
    fn test_idle() {
        let output = render(None, None);
        assert!(output.contains("nothing playing"));
        assert!(output.contains("q quit"));
    }

    #[test]
    fn test_banner_and_source() {
        let output = render(Some("Hello Toast!"), Some("asset:ringtone.mp3"));
        assert!(output.contains("Hello Toast!"));
        assert!(output.contains("asset:ringtone.mp3"));
    }
}
