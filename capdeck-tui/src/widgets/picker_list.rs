//! File picker modal list

use capdeck::PickedFile;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::component::Component;
use crate::event::EventKind;
use crate::widgets::modal::open_overlay;

pub struct PickerListProps<'a, A> {
    pub entries: &'a [PickedFile],
    pub selected: usize,
    /// Label for the filter shown in the title
    pub filter: &'a str,
    pub on_move: fn(usize) -> A,
    pub on_confirm: fn(usize) -> A,
    pub on_cancel: fn() -> A,
}

/// Scrollable file list in a modal
///
/// j/k/up/down move, g/G jump, Enter picks the highlighted file, Esc cancels.
#[derive(Default)]
pub struct PickerList {
    scroll_offset: usize,
}

impl PickerList {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + viewport_height {
            self.scroll_offset = selected.saturating_sub(viewport_height - 1);
        }
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

impl<A> Component<A> for PickerList {
    type Props<'a> = PickerListProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        let EventKind::Key(key) = event else {
            return None;
        };
        if key.code == KeyCode::Esc {
            return Some((props.on_cancel)());
        }
        if props.entries.is_empty() {
            return None;
        }

        let last = props.entries.len() - 1;
        let target = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (props.selected + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => props.selected.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => last,
            KeyCode::Enter => return Some((props.on_confirm)(props.selected.min(last))),
            _ => return None,
        };
        (target != props.selected).then(|| (props.on_move)(target))
    }

    /// `area` is the whole screen; the list centers itself.
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let overlay = open_overlay(frame, area, 56, 16, &format!("Pick File ({})", props.filter));
        let modal = overlay.area;
        let block = overlay
            .block
            .title_bottom(Line::raw(" Enter select · Esc cancel ").centered());

        if props.entries.is_empty() {
            frame.render_widget(
                Paragraph::new("No files here")
                    .alignment(Alignment::Center)
                    .block(block),
                modal,
            );
            return;
        }

        let viewport_height = modal.height.saturating_sub(2) as usize;
        self.ensure_visible(props.selected, viewport_height);

        let name_width = modal.width.saturating_sub(16) as usize;
        let items: Vec<ListItem> = props
            .entries
            .iter()
            .map(|entry| {
                ListItem::new(Line::raw(format!(
                    "{:<name_width$} {:>10}",
                    entry.name,
                    format_size(entry.size_bytes)
                )))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default().with_selected(Some(props.selected));
        *state.offset_mut() = self.scroll_offset;

        frame.render_stateful_widget(list, modal, &mut state);
    }
}
