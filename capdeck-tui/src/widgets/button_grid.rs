//! Home screen button grid

use capdeck::ActionKind;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};

use crate::component::Component;
use crate::event::EventKind;
use crate::theme::{self, Palette};

/// Buttons per row.
pub const COLUMNS: usize = 2;

/// One button of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridButton {
    pub label: String,
    pub kind: ActionKind,
}

/// Props for ButtonGrid component
pub struct ButtonGridProps<'a, A> {
    pub buttons: &'a [GridButton],
    /// Currently highlighted button
    pub selected: usize,
    /// Draw the highlighted button enlarged (navigation transition)
    pub pulsing: bool,
    pub is_focused: bool,
    pub palette: Palette,
    /// Highlight moved
    pub on_select: fn(usize) -> A,
    /// Button pressed (Enter, or its digit)
    pub on_trigger: fn(usize) -> A,
}

/// Grid of buttons, [`COLUMNS`] wide, in registration order.
///
/// Arrows and h/j/k/l move the highlight, Enter presses the highlighted
/// button and digits 1-9 press a button directly.
#[derive(Default)]
pub struct ButtonGrid;

impl ButtonGrid {
    pub fn new() -> Self {
        Self
    }

    fn moved(selected: usize, len: usize, code: KeyCode) -> Option<usize> {
        let column = selected % COLUMNS;
        let target = match code {
            KeyCode::Left | KeyCode::Char('h') if column > 0 => selected - 1,
            KeyCode::Right | KeyCode::Char('l') if column + 1 < COLUMNS => selected + 1,
            KeyCode::Up | KeyCode::Char('k') => selected.checked_sub(COLUMNS)?,
            KeyCode::Down | KeyCode::Char('j') => selected + COLUMNS,
            _ => return None,
        };
        (target < len && target != selected).then_some(target)
    }
}

impl<A> Component<A> for ButtonGrid {
    type Props<'a> = ButtonGridProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused || props.buttons.is_empty() {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let len = props.buttons.len();

        match key.code {
            KeyCode::Enter => Some((props.on_trigger)(props.selected.min(len - 1))),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                (index < len).then(|| (props.on_trigger)(index))
            }
            code => Self::moved(props.selected, len, code).map(props.on_select),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.buttons.is_empty() {
            return;
        }
        let rows = props.buttons.len().div_ceil(COLUMNS) as u32;
        let row_areas = Layout::vertical((0..rows).map(|_| Constraint::Ratio(1, rows))).split(area);

        for (index, button) in props.buttons.iter().enumerate() {
            let row = row_areas[index / COLUMNS];
            let cells =
                Layout::horizontal([Constraint::Ratio(1, COLUMNS as u32); COLUMNS]).split(row);
            let cell = cells[index % COLUMNS];

            let is_selected = props.is_focused && index == props.selected;
            let cell = if is_selected && props.pulsing {
                cell
            } else {
                cell.inner(Margin::new(1, 0))
            };

            let fill = Style::default()
                .bg(theme::button_color(button.kind))
                .fg(theme::button_text(button.kind))
                .add_modifier(Modifier::BOLD);
            let border = if is_selected {
                theme::selected_border().bg(props.palette.bg)
            } else {
                Style::default().fg(props.palette.muted).bg(props.palette.bg)
            };
            let inner_height = cell.height.saturating_sub(2);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(if is_selected {
                    BorderType::Thick
                } else {
                    BorderType::Rounded
                })
                .border_style(border)
                .padding(Padding::top(inner_height.saturating_sub(1) / 2))
                .style(fill);

            let label = format!("{} {}", index + 1, button.label);
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Center)
                    .block(block),
                cell,
            );
        }
    }
}
