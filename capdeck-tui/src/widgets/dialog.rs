use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::component::Component;
use crate::event::EventKind;
use crate::widgets::modal::open_overlay;

pub struct NoticeDialogProps<'a, A> {
    pub title: &'a str,
    pub message: &'a str,
    pub on_dismiss: fn() -> A,
}

/// Blocking notice with an OK button. Enter or Esc dismisses it.
#[derive(Default)]
pub struct NoticeDialog;

impl<A> Component<A> for NoticeDialog {
    type Props<'a> = NoticeDialogProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        match event {
            EventKind::Key(key) if matches!(key.code, KeyCode::Enter | KeyCode::Esc) => {
                Some((props.on_dismiss)())
            }
            _ => None,
        }
    }

    /// `area` is the whole screen; the dialog centers itself.
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let lines = props.message.lines().count().max(1) as u16;
        let overlay = open_overlay(frame, area, 48, lines + 5, props.title);

        let mut text: Vec<Line> = props.message.lines().map(Line::raw).collect();
        text.push(Line::raw(""));
        text.push(Line::from(Span::styled(
            "[ OK ]",
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));

        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(overlay.block),
            overlay.area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, RenderHarness};

    fn dismiss_on(pressed: &str) -> bool {
        let props = NoticeDialogProps {
            title: "File Selected",
            message: "Name: a.txt",
            on_dismiss: || (),
        };
        NoticeDialog
            .handle_event(&EventKind::Key(key(pressed)), props)
            .into_iter()
            .next()
            .is_some()
    }

    #[test]
    fn test_dismiss_keys() {
        assert!(dismiss_on("enter"));
        assert!(dismiss_on("esc"));
        assert!(!dismiss_on("q"));
    }

    #[test]
    fn test_render_multiline_message() {
        let mut render = RenderHarness::new(60, 16);
        let output = render.render_to_string_plain(|frame| {
            let props = NoticeDialogProps {
                title: "File Selected",
                message: "Name: report.pdf\nSize: 2048 bytes",
                on_dismiss: || (),
            };
            let area = frame.area();
            NoticeDialog.render(frame, area, props);
        });

        assert!(output.contains("File Selected"));
        assert!(output.contains("Name: report.pdf"));
        assert!(output.contains("Size: 2048 bytes"));
        assert!(output.contains("[ OK ]"));
    }
}
