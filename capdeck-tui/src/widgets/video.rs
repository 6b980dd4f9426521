use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::component::Component;
use crate::event::EventKind;
use crate::theme;

pub struct VideoPanelProps<'a, A> {
    pub video_id: &'a str,
    pub watch_url: &'a str,
    pub is_focused: bool,
    pub on_back: fn() -> A,
}

/// Player placeholder for the video screen with a "Back to Home" button.
#[derive(Default)]
pub struct VideoPanel;

impl<A> Component<A> for VideoPanel {
    type Props<'a> = VideoPanelProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        match event {
            EventKind::Key(key)
                if props.is_focused
                    && matches!(
                        key.code,
                        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('b')
                    ) =>
            {
                Some((props.on_back)())
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::VIDEO_BG)),
            area,
        );

        let [_, player, _, back, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);

        let player_text = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "▶",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::raw(format!("video {}", props.video_id)),
            Line::from(Span::styled(
                props.watch_url,
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(player_text)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .style(Style::default().fg(Color::White).bg(theme::VIDEO_BG)),
                ),
            player,
        );

        frame.render_widget(
            Paragraph::new("Back to Home")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
                .style(
                    Style::default()
                        .fg(Color::White)
                        .bg(theme::BACK_BUTTON)
                        .add_modifier(Modifier::BOLD),
                ),
            back,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, RenderHarness};

    fn back_on(pressed: &str, is_focused: bool) -> bool {
        let props = VideoPanelProps {
            video_id: "dQw4w9WgXcQ",
            watch_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            is_focused,
            on_back: || (),
        };
        VideoPanel
            .handle_event(&EventKind::Key(key(pressed)), props)
            .into_iter()
            .next()
            .is_some()
    }

    #[test]
    fn test_back_keys() {
        assert!(back_on("b", true));
        assert!(back_on("esc", true));
        assert!(!back_on("x", true));
        assert!(!back_on("b", false));
    }

    #[test]
    fn test_render_shows_id_and_url() {
        let mut render = RenderHarness::new(70, 20);
        let output = render.render_to_string_plain(|frame| {
            let props = VideoPanelProps {
                video_id: "dQw4w9WgXcQ",
                watch_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                is_focused: true,
                on_back: || (),
            };
            let area = frame.area();
            VideoPanel.render(frame, area, props);
        });

        assert!(output.contains("video dQw4w9WgXcQ"));
        assert!(output.contains("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(output.contains("Back to Home"));
    }
}
