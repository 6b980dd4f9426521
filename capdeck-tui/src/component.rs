//! Component trait for screen elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A UI element that renders from props and answers input with actions
///
/// Components follow these rules:
/// 1. Props contain everything needed to render
/// 2. `handle_event` returns actions and never mutates shell state
/// 3. `render` is a function of props plus internal UI state (scroll offset)
///
/// Focus is passed through props, so a component never needs to know which
/// layer of the shell is on top.
///
/// # Example
///
/// ```ignore
/// use capdeck_tui::{Component, EventKind};
///
/// struct BackButton;
///
/// struct BackButtonProps {
///     is_focused: bool,
/// }
///
/// impl Component<ShellAction> for BackButton {
///     type Props<'a> = BackButtonProps;
///
///     fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> impl IntoIterator<Item = ShellAction> {
///         match event {
///             EventKind::Key(key) if props.is_focused && key.code == KeyCode::Esc => Some(ShellAction::Back),
///             _ => None,
///         }
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, _props: Self::Props<'_>) {
///         frame.render_widget(Paragraph::new("Back to Home"), area);
///     }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions for the shell
    ///
    /// Returns any `IntoIterator<Item = A>`: `None`, `Some(action)` or a
    /// vec. Render-only components keep the default, which returns nothing.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    /// Render the component to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
