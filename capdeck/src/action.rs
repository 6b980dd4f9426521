//! Actions and their outcomes

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capability::{AudioSource, FileFilter, Intensity, NotificationRequest, PickedFile};
use crate::resource::HandleId;
use crate::screen::{Backdrop, ScreenId};

/// Which capability an action drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    PlayNetworkAudio,
    PlayLocalAudio,
    Vibrate,
    PickFile,
    ShowToast,
    ScheduleNotification,
    ToggleBackground,
    NavigateToVideo,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::PlayNetworkAudio,
        ActionKind::PlayLocalAudio,
        ActionKind::Vibrate,
        ActionKind::PickFile,
        ActionKind::ShowToast,
        ActionKind::ScheduleNotification,
        ActionKind::ToggleBackground,
        ActionKind::NavigateToVideo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::PlayNetworkAudio => "PlayNetworkAudio",
            ActionKind::PlayLocalAudio => "PlayLocalAudio",
            ActionKind::Vibrate => "Vibrate",
            ActionKind::PickFile => "PickFile",
            ActionKind::ShowToast => "ShowToast",
            ActionKind::ScheduleNotification => "ScheduleNotification",
            ActionKind::ToggleBackground => "ToggleBackground",
            ActionKind::NavigateToVideo => "NavigateToVideo",
        }
    }

    /// Whether running this kind may leave a resource handle behind.
    pub fn acquires_resource(self) -> bool {
        matches!(
            self,
            ActionKind::PlayNetworkAudio | ActionKind::PlayLocalAudio
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The one capability call an action performs, with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    PlayAudio(AudioSource),
    Vibrate {
        intensity: Intensity,
        duration: Duration,
    },
    PickFile(FileFilter),
    ShowToast {
        title: String,
        message: String,
    },
    ScheduleNotification(NotificationRequest),
    ToggleBackground,
    Navigate(ScreenId),
}

impl Command {
    pub fn kind(&self) -> ActionKind {
        match self {
            Command::PlayAudio(AudioSource::Remote(_)) => ActionKind::PlayNetworkAudio,
            Command::PlayAudio(AudioSource::Bundled(_)) => ActionKind::PlayLocalAudio,
            Command::Vibrate { .. } => ActionKind::Vibrate,
            Command::PickFile(_) => ActionKind::PickFile,
            Command::ShowToast { .. } => ActionKind::ShowToast,
            Command::ScheduleNotification(_) => ActionKind::ScheduleNotification,
            Command::ToggleBackground => ActionKind::ToggleBackground,
            Command::Navigate(_) => ActionKind::NavigateToVideo,
        }
    }
}

/// A named, triggerable unit wrapping one capability invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    name: String,
    label: String,
    command: Command,
}

impl Action {
    pub fn new(name: impl Into<String>, command: Command) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            command,
        }
    }

    /// Set the text shown on the action's button.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ActionKind {
        self.command.kind()
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// What a successful action produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Side effect issued, nothing to report.
    Done,
    /// Audio is playing on the dispatcher's live handle.
    Playing(HandleId),
    /// File picker completed; `None` means the user cancelled.
    Picked(Option<PickedFile>),
    /// Notification accepted by the scheduler.
    Scheduled,
    /// Background flag after the toggle.
    Background(Backdrop),
    /// Navigation requested.
    Navigated(ScreenId),
}

/// Why a provider-backed action failed. Recoverable; already surfaced to
/// the user by the time it is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("file pick failed: {0}")]
    FilePick(String),
    #[error("notification failed: {0}")]
    Notification(String),
}

/// Outcome of running an action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum DispatchResult {
    Ok(Outcome),
    Failed(Failure),
}

impl DispatchResult {
    #[inline]
    pub fn done() -> Self {
        Self::Ok(Outcome::Done)
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Self::Ok(outcome) => Some(outcome),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Handle id carried by a successful audio action.
    pub fn handle(&self) -> Option<HandleId> {
        match self {
            Self::Ok(Outcome::Playing(id)) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::NotificationPayload;

    #[test]
    fn test_kind_follows_command() {
        let cases = [
            (
                Command::PlayAudio(AudioSource::Remote("https://x/a.mp3".into())),
                ActionKind::PlayNetworkAudio,
            ),
            (
                Command::PlayAudio(AudioSource::Bundled("a.mp3".into())),
                ActionKind::PlayLocalAudio,
            ),
            (
                Command::Vibrate {
                    intensity: Intensity::Heavy,
                    duration: Duration::from_millis(400),
                },
                ActionKind::Vibrate,
            ),
            (Command::PickFile(FileFilter::any()), ActionKind::PickFile),
            (
                Command::ShowToast {
                    title: "Toast".into(),
                    message: "Hello Toast!".into(),
                },
                ActionKind::ShowToast,
            ),
            (
                Command::ScheduleNotification(NotificationRequest {
                    title: "t".into(),
                    body: "b".into(),
                    payload: NotificationPayload {
                        screen: ScreenId::Video,
                    },
                    delay: Duration::from_secs(5),
                }),
                ActionKind::ScheduleNotification,
            ),
            (Command::ToggleBackground, ActionKind::ToggleBackground),
            (
                Command::Navigate(ScreenId::Video),
                ActionKind::NavigateToVideo,
            ),
        ];

        for (command, kind) in cases {
            assert_eq!(command.kind(), kind);
        }
    }

    #[test]
    fn test_action_label_defaults_to_name() {
        let action = Action::new("toggle", Command::ToggleBackground);
        assert_eq!(action.label(), "toggle");

        let action = action.with_label("Toggle Background");
        assert_eq!(action.name(), "toggle");
        assert_eq!(action.label(), "Toggle Background");
    }

    #[test]
    fn test_only_audio_acquires() {
        let acquiring: Vec<_> = ActionKind::ALL
            .into_iter()
            .filter(|k| k.acquires_resource())
            .collect();
        assert_eq!(
            acquiring,
            vec![ActionKind::PlayNetworkAudio, ActionKind::PlayLocalAudio]
        );
    }

    #[test]
    fn test_dispatch_result_accessors() {
        let r = DispatchResult::Ok(Outcome::Playing(HandleId::new(3)));
        assert!(r.is_ok());
        assert_eq!(r.handle(), Some(HandleId::new(3)));
        assert!(r.failure().is_none());

        let r = DispatchResult::Failed(Failure::FilePick("denied".into()));
        assert!(r.is_failed());
        assert!(r.outcome().is_none());
        assert_eq!(r.failure().map(ToString::to_string).as_deref(), Some("file pick failed: denied"));

        assert_eq!(DispatchResult::done(), DispatchResult::Ok(Outcome::Done));
    }
}
