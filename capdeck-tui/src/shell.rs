//! Screen state for the showcase
//!
//! The shell owns everything drawn on screen: the navigation stack, the
//! backdrop, banners, dialogs, the picker modal and the short animations.
//! Input becomes [`ShellAction`]s through the components; [`Shell::update`]
//! reduces them and returns the [`Effect`]s the event loop has to perform
//! (triggering an action, navigating, quitting). Provider output arrives as
//! [`UiRequest`]s through [`Shell::apply`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use capdeck::{Action, DispatchResult, Outcome, PickedFile, ScreenId};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tokio::sync::oneshot;
use tracing::debug;

use crate::bridge::UiRequest;
use crate::component::Component;
use crate::event::EventKind;
use crate::providers::decode_payload;
use crate::theme::{self, Palette};
use crate::widgets::{
    ButtonGrid, ButtonGridProps, GridButton, NoticeDialog, NoticeDialogProps, PickerList,
    PickerListProps, StatusBar, StatusBarProps, VideoPanel, VideoPanelProps,
};

/// How long a banner stays up.
pub const BANNER_TTL: Duration = Duration::from_secs(2);
/// Length of the button pulse played before navigating.
pub const PULSE: Duration = Duration::from_millis(250);
const SHAKE_STEP_MS: u128 = 60;

/// What the user asked for, produced by the components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    Select(usize),
    Trigger(usize),
    DismissDialog,
    PickerMove(usize),
    PickerConfirm(usize),
    PickerCancel,
    Back,
    OpenNotification,
    Quit,
}

/// Work the event loop performs after a reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Trigger the named action on the dispatcher
    Trigger(String),
    /// Leave the video screen through its navigator
    GoBack,
    /// Open a screen through the navigator
    Navigate(ScreenId),
    Quit,
}

/// Result of [`Shell::update`]: whether to redraw, and what to do next.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShellUpdate {
    pub changed: bool,
    pub effects: Vec<Effect>,
}

impl ShellUpdate {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: Vec::new(),
        }
    }

    pub fn changed_with(effect: Effect) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }
}

#[derive(Debug)]
struct Banner {
    text: String,
    until: Instant,
}

#[derive(Debug)]
struct Dialog {
    title: String,
    message: String,
}

#[derive(Debug)]
struct PickerModal {
    entries: Vec<PickedFile>,
    selected: usize,
    reply: Option<oneshot::Sender<Option<PickedFile>>>,
}

impl PickerModal {
    fn answer(&mut self, choice: Option<PickedFile>) {
        if let Some(reply) = self.reply.take() {
            let _ = reply.send(choice);
        }
    }
}

/// A delivered notification waiting to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub title: String,
    pub body: String,
    pub target: Option<ScreenId>,
}

/// Static content the shell shows.
#[derive(Debug, Clone)]
pub struct ShellContent {
    /// `(action name, button)` in grid order
    pub buttons: Vec<(String, GridButton)>,
    pub video_id: String,
    pub watch_url: String,
    pub filter: String,
}

impl ShellContent {
    pub fn from_actions<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        let buttons = actions
            .into_iter()
            .map(|action| {
                (
                    action.name().to_string(),
                    GridButton {
                        label: action.label().to_string(),
                        kind: action.kind(),
                    },
                )
            })
            .collect();
        Self {
            buttons,
            video_id: String::new(),
            watch_url: String::new(),
            filter: "*/*".into(),
        }
    }

    pub fn with_video(mut self, video_id: impl Into<String>, watch_url: impl Into<String>) -> Self {
        self.video_id = video_id.into();
        self.watch_url = watch_url.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

pub struct Shell {
    content: ShellContent,
    grid_buttons: Vec<GridButton>,
    selected: usize,
    stack: Vec<ScreenId>,
    backdrop: capdeck::Backdrop,
    banner: Option<Banner>,
    dialogs: VecDeque<Dialog>,
    picker: Option<PickerModal>,
    shake_until: Option<Instant>,
    pulse_until: Option<Instant>,
    deferred_nav: Option<ScreenId>,
    now_playing: Option<String>,
    notification: Option<PendingNotification>,

    grid: ButtonGrid,
    picker_list: PickerList,
    dialog: NoticeDialog,
    video: VideoPanel,
    status: StatusBar,
}

impl Shell {
    pub fn new(content: ShellContent) -> Self {
        let grid_buttons = content.buttons.iter().map(|(_, b)| b.clone()).collect();
        Self {
            content,
            grid_buttons,
            selected: 0,
            stack: vec![ScreenId::Home],
            backdrop: capdeck::Backdrop::default(),
            banner: None,
            dialogs: VecDeque::new(),
            picker: None,
            shake_until: None,
            pulse_until: None,
            deferred_nav: None,
            now_playing: None,
            notification: None,
            grid: ButtonGrid::new(),
            picker_list: PickerList::new(),
            dialog: NoticeDialog,
            video: VideoPanel,
            status: StatusBar,
        }
    }

    pub fn screen(&self) -> ScreenId {
        self.stack.last().copied().unwrap_or(ScreenId::Home)
    }

    pub fn backdrop(&self) -> capdeck::Backdrop {
        self.backdrop
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.text.as_str())
    }

    /// Title of the dialog on top, if any.
    pub fn dialog_title(&self) -> Option<&str> {
        self.dialogs.front().map(|d| d.title.as_str())
    }

    pub fn picker_open(&self) -> bool {
        self.picker.is_some()
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn notification(&self) -> Option<&PendingNotification> {
        self.notification.as_ref()
    }

    pub fn is_shaking(&self, now: Instant) -> bool {
        self.shake_until.is_some_and(|until| now < until)
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    /// Whether something on screen changes with time alone.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.is_shaking(now) || self.is_pulsing(now)
    }

    /// Apply a provider request.
    pub fn apply(&mut self, request: UiRequest, now: Instant) {
        match request {
            UiRequest::Navigate(screen) => {
                if self.is_pulsing(now) {
                    self.deferred_nav = Some(screen);
                } else {
                    self.push(screen);
                }
            }
            UiRequest::Back => self.pop(),
            UiRequest::Dialog { title, message } => {
                self.dialogs.push_back(Dialog { title, message });
            }
            UiRequest::Banner(text) => {
                self.banner = Some(Banner {
                    text,
                    until: now + BANNER_TTL,
                });
            }
            UiRequest::Shake(duration) => {
                self.shake_until = Some(now + duration);
            }
            UiRequest::Pulse => {
                self.pulse_until = Some(now + PULSE);
            }
            UiRequest::OpenPicker { entries, reply } => {
                if let Some(mut previous) = self.picker.take() {
                    previous.answer(None);
                }
                self.picker = Some(PickerModal {
                    entries,
                    selected: 0,
                    reply: Some(reply),
                });
            }
            UiRequest::NotificationDelivered { title, body, data } => {
                let target = decode_payload(&data).map(|payload| payload.screen);
                self.banner = Some(Banner {
                    text: format!("{title}: {body}"),
                    until: now + BANNER_TTL,
                });
                self.notification = Some(PendingNotification {
                    title,
                    body,
                    target,
                });
            }
            UiRequest::NowPlaying(label) => {
                self.now_playing = label;
            }
        }
    }

    /// Record what a trigger produced.
    pub fn record(&mut self, result: &DispatchResult) {
        if let Some(Outcome::Background(backdrop)) = result.outcome() {
            self.backdrop = *backdrop;
        }
    }

    /// Expire timed state. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.banner.as_ref().is_some_and(|b| now >= b.until) {
            self.banner = None;
            changed = true;
        }
        if self.shake_until.is_some_and(|until| now >= until) {
            self.shake_until = None;
            changed = true;
        }
        if self.pulse_until.is_some_and(|until| now >= until) {
            self.pulse_until = None;
            changed = true;
        }
        if !self.is_pulsing(now) {
            if let Some(screen) = self.deferred_nav.take() {
                self.push(screen);
                changed = true;
            }
        }
        changed || self.is_animating(now)
    }

    fn push(&mut self, screen: ScreenId) {
        if let Some(pos) = self.stack.iter().position(|s| *s == screen) {
            self.stack.truncate(pos + 1);
        } else {
            self.stack.push(screen);
        }
        debug!(?screen, depth = self.stack.len(), "Navigated");
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Route an input event to the layer on top.
    pub fn handle_event(&mut self, event: &EventKind) -> Vec<ShellAction> {
        if let EventKind::Key(key) = event {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return vec![ShellAction::Quit];
            }
        }

        if let Some(picker) = &self.picker {
            let props = PickerListProps {
                entries: &picker.entries,
                selected: picker.selected,
                filter: &self.content.filter,
                on_move: ShellAction::PickerMove,
                on_confirm: ShellAction::PickerConfirm,
                on_cancel: || ShellAction::PickerCancel,
            };
            return self.picker_list.handle_event(event, props).into_iter().collect();
        }

        if let Some(dialog) = self.dialogs.front() {
            let props = NoticeDialogProps {
                title: &dialog.title,
                message: &dialog.message,
                on_dismiss: || ShellAction::DismissDialog,
            };
            return self.dialog.handle_event(event, props).into_iter().collect();
        }

        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Char('q') => return vec![ShellAction::Quit],
                KeyCode::Char('o') if self.notification.is_some() => {
                    return vec![ShellAction::OpenNotification]
                }
                _ => {}
            }
        }

        match self.screen() {
            ScreenId::Home => {
                let props = ButtonGridProps {
                    buttons: &self.grid_buttons,
                    selected: self.selected,
                    pulsing: false,
                    is_focused: true,
                    palette: Palette::for_backdrop(self.backdrop),
                    on_select: ShellAction::Select,
                    on_trigger: ShellAction::Trigger,
                };
                self.grid.handle_event(event, props).into_iter().collect()
            }
            ScreenId::Video => {
                let props = VideoPanelProps {
                    video_id: &self.content.video_id,
                    watch_url: &self.content.watch_url,
                    is_focused: true,
                    on_back: || ShellAction::Back,
                };
                self.video.handle_event(event, props).into_iter().collect()
            }
        }
    }

    /// Reduce one action.
    pub fn update(&mut self, action: ShellAction) -> ShellUpdate {
        match action {
            ShellAction::Select(index) => {
                self.selected = index;
                ShellUpdate::changed()
            }
            ShellAction::Trigger(index) => match self.content.buttons.get(index) {
                Some((name, _)) => {
                    self.selected = index;
                    ShellUpdate::changed_with(Effect::Trigger(name.clone()))
                }
                None => ShellUpdate::unchanged(),
            },
            ShellAction::DismissDialog => {
                self.dialogs.pop_front();
                ShellUpdate::changed()
            }
            ShellAction::PickerMove(index) => {
                if let Some(picker) = &mut self.picker {
                    picker.selected = index;
                }
                ShellUpdate::changed()
            }
            ShellAction::PickerConfirm(index) => {
                if let Some(mut picker) = self.picker.take() {
                    let choice = picker.entries.get(index).cloned();
                    picker.answer(choice);
                }
                ShellUpdate::changed()
            }
            ShellAction::PickerCancel => {
                if let Some(mut picker) = self.picker.take() {
                    picker.answer(None);
                }
                ShellUpdate::changed()
            }
            ShellAction::Back => ShellUpdate::changed_with(Effect::GoBack),
            ShellAction::OpenNotification => match self.notification.take() {
                Some(PendingNotification {
                    target: Some(screen),
                    ..
                }) => ShellUpdate::changed_with(Effect::Navigate(screen)),
                Some(_) => {
                    debug!("Notification has no target screen");
                    ShellUpdate::changed()
                }
                None => ShellUpdate::unchanged(),
            },
            ShellAction::Quit => {
                if let Some(mut picker) = self.picker.take() {
                    picker.answer(None);
                }
                ShellUpdate::changed_with(Effect::Quit)
            }
        }
    }

    fn hints(&self) -> &'static str {
        match (self.screen(), self.notification.is_some()) {
            (ScreenId::Home, true) => "arrows move · enter run · o open notification · q quit ",
            (ScreenId::Home, false) => "arrows move · enter run · q quit ",
            (ScreenId::Video, true) => "b back · o open notification · q quit ",
            (ScreenId::Video, false) => "b back · q quit ",
        }
    }

    pub fn render(&mut self, frame: &mut Frame, now: Instant) {
        let palette = Palette::for_backdrop(self.backdrop);
        let full = frame.area();
        frame.render_widget(Block::default().style(palette.base()), full);

        let shaking = self.shake_until.filter(|until| now < *until);
        let area = match shaking {
            Some(until) if (until - now).as_millis() / SHAKE_STEP_MS % 2 == 1 => Rect {
                x: full.x + 1,
                width: full.width.saturating_sub(1),
                ..full
            },
            _ => full,
        };

        let border = if shaking.is_some() {
            Style::default().fg(theme::SHAKE)
        } else {
            Style::default().fg(palette.border)
        };
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(if shaking.is_some() {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(border)
            .title(format!(" capdeck · {} ", self.screen()));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(StatusBar::HEIGHT)])
                .areas(inner);

        match self.screen() {
            ScreenId::Home => {
                let props = ButtonGridProps {
                    buttons: &self.grid_buttons,
                    selected: self.selected,
                    pulsing: self.is_pulsing(now),
                    is_focused: true,
                    palette,
                    on_select: ShellAction::Select,
                    on_trigger: ShellAction::Trigger,
                };
                self.grid.render(frame, body.inner(Margin::new(1, 1)), props);
            }
            ScreenId::Video => {
                let props = VideoPanelProps {
                    video_id: &self.content.video_id,
                    watch_url: &self.content.watch_url,
                    is_focused: true,
                    on_back: || ShellAction::Back,
                };
                self.video.render(frame, body, props);
            }
        }

        let props = StatusBarProps {
            banner: self.banner.as_ref().map(|b| b.text.as_str()),
            now_playing: self.now_playing.as_deref(),
            hints: self.hints(),
            palette,
        };
        <StatusBar as Component<ShellAction>>::render(&mut self.status, frame, footer, props);

        if let Some(dialog) = self.dialogs.front() {
            let props = NoticeDialogProps {
                title: &dialog.title,
                message: &dialog.message,
                on_dismiss: || ShellAction::DismissDialog,
            };
            self.dialog.render(frame, full, props);
        }

        if let Some(picker) = &self.picker {
            let props = PickerListProps {
                entries: &picker.entries,
                selected: picker.selected,
                filter: &self.content.filter,
                on_move: ShellAction::PickerMove,
                on_confirm: ShellAction::PickerConfirm,
                on_cancel: || ShellAction::PickerCancel,
            };
            self.picker_list.render(frame, full, props);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, RenderHarness};
    use capdeck::{standard_actions, Backdrop, ShowcaseConfig};

    fn shell() -> Shell {
        let config = ShowcaseConfig::default();
        let actions = standard_actions(&config);
        Shell::new(
            ShellContent::from_actions(&actions)
                .with_video("dQw4w9WgXcQ", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
        )
    }

    fn press(shell: &mut Shell, pressed: &str) -> Vec<Effect> {
        let actions = shell.handle_event(&EventKind::Key(key(pressed)));
        actions
            .into_iter()
            .flat_map(|action| shell.update(action).effects)
            .collect()
    }

    #[test]
    fn test_enter_triggers_selected_action() {
        let mut shell = shell();
        assert!(press(&mut shell, "right").is_empty());
        assert_eq!(shell.selected(), 1);
        assert_eq!(
            press(&mut shell, "enter"),
            vec![Effect::Trigger("play-local-audio".into())]
        );
    }

    #[test]
    fn test_digit_triggers_directly() {
        let mut shell = shell();
        assert_eq!(
            press(&mut shell, "8"),
            vec![Effect::Trigger("go-to-video".into())]
        );
        assert_eq!(shell.selected(), 7);
    }

    #[test]
    fn test_banner_expires() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::Banner("Hello Toast!".into()), now);
        assert_eq!(shell.banner(), Some("Hello Toast!"));

        assert!(!shell.tick(now + Duration::from_secs(1)));
        assert_eq!(shell.banner(), Some("Hello Toast!"));

        assert!(shell.tick(now + BANNER_TTL));
        assert_eq!(shell.banner(), None);
    }

    #[test]
    fn test_dialog_blocks_grid_until_dismissed() {
        let mut shell = shell();
        shell.apply(
            UiRequest::Dialog {
                title: "Error".into(),
                message: "Failed to pick file".into(),
            },
            Instant::now(),
        );

        assert!(press(&mut shell, "enter").is_empty());
        assert_eq!(shell.dialog_title(), None);
        assert_eq!(
            press(&mut shell, "enter"),
            vec![Effect::Trigger("play-network-audio".into())]
        );
    }

    #[test]
    fn test_navigation_waits_for_pulse() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::Pulse, now);
        shell.apply(UiRequest::Navigate(ScreenId::Video), now);
        assert_eq!(shell.screen(), ScreenId::Home);
        assert!(shell.is_pulsing(now));

        shell.tick(now + PULSE);
        assert_eq!(shell.screen(), ScreenId::Video);
    }

    #[test]
    fn test_video_back_and_stack_floor() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::Navigate(ScreenId::Video), now);
        assert_eq!(shell.screen(), ScreenId::Video);

        assert_eq!(press(&mut shell, "b"), vec![Effect::GoBack]);
        shell.apply(UiRequest::Back, now);
        assert_eq!(shell.screen(), ScreenId::Home);

        shell.apply(UiRequest::Back, now);
        assert_eq!(shell.screen(), ScreenId::Home);
    }

    #[test]
    fn test_navigating_to_open_screen_does_not_stack() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::Navigate(ScreenId::Video), now);
        shell.apply(UiRequest::Navigate(ScreenId::Video), now);
        shell.apply(UiRequest::Back, now);
        assert_eq!(shell.screen(), ScreenId::Home);
    }

    #[test]
    fn test_picker_confirm_replies_with_entry() {
        let mut shell = shell();
        let (reply, mut chosen) = oneshot::channel();
        shell.apply(
            UiRequest::OpenPicker {
                entries: vec![
                    PickedFile {
                        name: "a.txt".into(),
                        size_bytes: 1,
                    },
                    PickedFile {
                        name: "b.txt".into(),
                        size_bytes: 2,
                    },
                ],
                reply,
            },
            Instant::now(),
        );
        assert!(shell.picker_open());

        press(&mut shell, "j");
        press(&mut shell, "enter");
        assert!(!shell.picker_open());
        assert_eq!(
            chosen.try_recv().unwrap(),
            Some(PickedFile {
                name: "b.txt".into(),
                size_bytes: 2,
            })
        );
    }

    #[test]
    fn test_picker_cancel_replies_none() {
        let mut shell = shell();
        let (reply, mut chosen) = oneshot::channel();
        shell.apply(
            UiRequest::OpenPicker {
                entries: Vec::new(),
                reply,
            },
            Instant::now(),
        );

        press(&mut shell, "esc");
        assert_eq!(chosen.try_recv().unwrap(), None);
    }

    #[test]
    fn test_quit_cancels_open_picker() {
        let mut shell = shell();
        let (reply, mut chosen) = oneshot::channel();
        shell.apply(
            UiRequest::OpenPicker {
                entries: Vec::new(),
                reply,
            },
            Instant::now(),
        );

        let effects: Vec<_> = [ShellAction::Quit]
            .into_iter()
            .flat_map(|action| shell.update(action).effects)
            .collect();
        assert_eq!(effects, vec![Effect::Quit]);
        assert_eq!(chosen.try_recv().unwrap(), None);
    }

    #[test]
    fn test_notification_opens_target() {
        let mut shell = shell();
        shell.apply(
            UiRequest::NotificationDelivered {
                title: "Check out this video!".into(),
                body: "Tap to watch the video".into(),
                data: serde_json::json!({ "screen": "video" }),
            },
            Instant::now(),
        );
        assert_eq!(
            shell.banner(),
            Some("Check out this video!: Tap to watch the video")
        );
        assert_eq!(
            shell.notification().and_then(|n| n.target),
            Some(ScreenId::Video)
        );

        assert_eq!(
            press(&mut shell, "o"),
            vec![Effect::Navigate(ScreenId::Video)]
        );
        assert!(shell.notification().is_none());
        assert!(press(&mut shell, "o").is_empty());
    }

    #[test]
    fn test_record_background_outcome() {
        let mut shell = shell();
        shell.record(&DispatchResult::Ok(Outcome::Background(Backdrop::Secondary)));
        assert_eq!(shell.backdrop(), Backdrop::Secondary);
        shell.record(&DispatchResult::done());
        assert_eq!(shell.backdrop(), Backdrop::Secondary);
    }

    #[test]
    fn test_shake_lasts_for_duration() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::Shake(Duration::from_millis(400)), now);
        assert!(shell.is_shaking(now + Duration::from_millis(399)));
        assert!(!shell.is_shaking(now + Duration::from_millis(400)));
    }

    #[test]
    fn test_render_home_and_status() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::NowPlaying(Some("asset:ringtone.mp3".into())), now);
        shell.apply(UiRequest::Banner("Hello Toast!".into()), now);

        let mut render = RenderHarness::new(100, 30);
        let output = render.render_to_string_plain(|frame| shell.render(frame, now));

        assert!(output.contains("capdeck · Home"));
        assert!(output.contains("Toggle Background"));
        assert!(output.contains("Go to Video"));
        assert!(output.contains("asset:ringtone.mp3"));
        assert!(output.contains("Hello Toast!"));
    }

    #[test]
    fn test_render_dialog_over_video() {
        let mut shell = shell();
        let now = Instant::now();
        shell.apply(UiRequest::Navigate(ScreenId::Video), now);
        shell.apply(
            UiRequest::Dialog {
                title: "File Selection".into(),
                message: "No file was selected".into(),
            },
            now,
        );

        let mut render = RenderHarness::new(100, 30);
        let output = render.render_to_string_plain(|frame| shell.render(frame, now));

        assert!(output.contains("capdeck · Video"));
        assert!(output.contains("No file was selected"));
    }
}
