//! Centered overlay shared by the notice dialog and the file picker
//!
//! The screen underneath is shaded fresh on each frame so banners and the
//! shake border keep animating while an overlay is open.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Clear},
    Frame,
};

use crate::theme;

/// Where an overlay sits and the frame to draw its content in.
pub struct Overlay {
    pub area: Rect,
    pub block: Block<'static>,
}

/// Shade the screen drawn so far and clear a `width` x `height` box in the
/// middle of `screen`, keeping a one cell margin.
///
/// The returned block is titled and styled; callers may add a bottom title
/// before rendering their content into it.
pub fn open_overlay(
    frame: &mut Frame,
    screen: Rect,
    width: u16,
    height: u16,
    title: &str,
) -> Overlay {
    shade(frame.buffer_mut());

    let area = overlay_area(screen, width, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).bg(theme::MODAL_BG));
    Overlay { area, block }
}

fn overlay_area(screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width.saturating_sub(2));
    let height = height.min(screen.height.saturating_sub(2));
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(screen);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    area
}

/// Halve every RGB color; palette colors fall back to dark gray.
fn shade(buffer: &mut Buffer) {
    for cell in buffer.content.iter_mut() {
        cell.fg = halve(cell.fg);
        cell.bg = halve(cell.bg);
    }
}

fn halve(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        Color::Reset | Color::Black => color,
        _ => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RenderHarness;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_overlay_draws_over_screen() {
        let mut harness = RenderHarness::new(40, 10);

        let output = harness.render_to_string_plain(|frame| {
            let screen = frame.area();
            frame.render_widget(Paragraph::new("x".repeat(400)), screen);
            let overlay = open_overlay(frame, screen, 20, 4, "Notice");
            frame.render_widget(Paragraph::new("inside").block(overlay.block), overlay.area);
        });

        assert!(output.contains("Notice"));
        assert!(output.contains("inside"));
    }

    #[test]
    fn test_screen_is_shaded_outside_overlay() {
        let mut harness = RenderHarness::new(30, 10);
        let buffer = harness.render(|frame| {
            let screen = frame.area();
            frame.render_widget(
                Paragraph::new("home").style(Style::default().bg(Color::Rgb(200, 100, 50))),
                screen,
            );
            let overlay = open_overlay(frame, screen, 10, 4, "Notice");
            frame.render_widget(overlay.block, overlay.area);
        });

        assert_eq!(buffer[(0, 0)].bg, Color::Rgb(100, 50, 25));
        assert_eq!(buffer[(15, 5)].bg, theme::MODAL_BG);
    }

    #[test]
    fn test_overlay_is_centered() {
        let area = overlay_area(Rect::new(0, 0, 80, 24), 40, 10);
        assert_eq!(area, Rect::new(20, 7, 40, 10));
    }

    #[test]
    fn test_overlay_keeps_a_margin_on_small_screens() {
        let area = overlay_area(Rect::new(0, 0, 30, 10), 100, 50);
        assert_eq!((area.width, area.height), (28, 8));
        assert_eq!((area.x, area.y), (1, 1));
    }
}
