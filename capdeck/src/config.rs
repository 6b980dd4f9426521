//! Screen configuration
//!
//! Every constant the home screen's actions use, loadable from TOML. Missing
//! sections and fields fall back to the defaults, so an empty file is valid.
//!
//! ```toml
//! assets_dir = "assets"
//!
//! [audio]
//! network_uri = "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3"
//! local_asset = "ringtone.mp3"
//!
//! [vibration]
//! intensity = "heavy"
//! duration_ms = 400
//!
//! [notification]
//! delay_secs = 5
//! target = "video"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind, Command};
use crate::capability::{AudioSource, FileFilter, Intensity, NotificationPayload, NotificationRequest};
use crate::error::ConfigError;
use crate::screen::ScreenId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Remote stream for the network audio button.
    pub network_uri: String,
    /// Asset path (relative to `assets_dir`) for the local audio button.
    pub local_asset: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            network_uri: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3".into(),
            local_asset: "ringtone.mp3".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VibrationConfig {
    pub intensity: Intensity,
    pub duration_ms: u64,
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self {
            intensity: Intensity::Heavy,
            duration_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
    /// Used only where the platform falls back to a dialog.
    pub title: String,
    pub message: String,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            title: "Toast".into(),
            message: "Hello Toast!".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    pub title: String,
    pub body: String,
    /// Screen the notification opens.
    pub target: ScreenId,
    pub delay_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "Check out this video!".into(),
            body: "Tap to watch the video".into(),
            target: ScreenId::Video,
            delay_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    pub filter: FileFilter,
    /// Directory the terminal picker lists. Defaults to the working directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub video_id: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            video_id: "dQw4w9WgXcQ".into(),
        }
    }
}

/// Configuration of the home and video screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowcaseConfig {
    /// Root bundled audio assets are resolved against.
    pub assets_dir: PathBuf,
    /// Log destination. `None` means "next to the platform cache dir".
    pub log_file: Option<PathBuf>,
    pub audio: AudioConfig,
    pub vibration: VibrationConfig,
    pub toast: ToastConfig,
    pub notification: NotificationConfig,
    pub picker: PickerConfig,
    pub video: VideoConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            log_file: None,
            audio: AudioConfig::default(),
            vibration: VibrationConfig::default(),
            toast: ToastConfig::default(),
            notification: NotificationConfig::default(),
            picker: PickerConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let uri = &self.audio.network_uri;
        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "audio.network_uri",
                reason: format!("expected an http(s) URI, got {uri:?}"),
            });
        }
        if self.audio.local_asset.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "audio.local_asset",
                reason: "must not be empty".into(),
            });
        }
        if self.vibration.duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "vibration.duration_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.video.video_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "video.video_id",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// The notification the schedule button requests.
    pub fn notification_request(&self) -> NotificationRequest {
        NotificationRequest {
            title: self.notification.title.clone(),
            body: self.notification.body.clone(),
            payload: NotificationPayload {
                screen: self.notification.target,
            },
            delay: Duration::from_secs(self.notification.delay_secs),
        }
    }
}

/// Registry name used for each kind by [`standard_actions`].
pub fn standard_name(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::PlayNetworkAudio => "play-network-audio",
        ActionKind::PlayLocalAudio => "play-local-audio",
        ActionKind::Vibrate => "vibrate",
        ActionKind::PickFile => "pick-file",
        ActionKind::ShowToast => "show-toast",
        ActionKind::ScheduleNotification => "schedule-notification",
        ActionKind::ToggleBackground => "toggle-background",
        ActionKind::NavigateToVideo => "go-to-video",
    }
}

/// One action per kind, in [`ActionKind::ALL`] order.
pub fn standard_actions(config: &ShowcaseConfig) -> Vec<Action> {
    ActionKind::ALL
        .into_iter()
        .map(|kind| {
            let (label, command) = match kind {
                ActionKind::PlayNetworkAudio => (
                    "Play Network Audio",
                    Command::PlayAudio(AudioSource::Remote(config.audio.network_uri.clone())),
                ),
                ActionKind::PlayLocalAudio => (
                    "Play Local Audio",
                    Command::PlayAudio(AudioSource::Bundled(config.audio.local_asset.clone())),
                ),
                ActionKind::Vibrate => (
                    "Vibrate",
                    Command::Vibrate {
                        intensity: config.vibration.intensity,
                        duration: Duration::from_millis(config.vibration.duration_ms),
                    },
                ),
                ActionKind::PickFile => ("Pick File", Command::PickFile(config.picker.filter.clone())),
                ActionKind::ShowToast => (
                    "Show Toast",
                    Command::ShowToast {
                        title: config.toast.title.clone(),
                        message: config.toast.message.clone(),
                    },
                ),
                ActionKind::ScheduleNotification => (
                    "Schedule Notification",
                    Command::ScheduleNotification(config.notification_request()),
                ),
                ActionKind::ToggleBackground => ("Toggle Background", Command::ToggleBackground),
                ActionKind::NavigateToVideo => ("Go to Video", Command::Navigate(ScreenId::Video)),
            };
            Action::new(standard_name(kind), command).with_label(label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ShowcaseConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShowcaseConfig::default());
        assert_eq!(config.vibration.duration_ms, 400);
        assert_eq!(config.notification.delay_secs, 5);
        assert_eq!(config.picker.filter, FileFilter::any());
    }

    #[test]
    fn test_partial_override() {
        let config = ShowcaseConfig::from_toml_str(
            r#"
            [vibration]
            intensity = "light"

            [notification]
            delay_secs = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.vibration.intensity, Intensity::Light);
        assert_eq!(config.vibration.duration_ms, 400);
        assert_eq!(config.notification.delay_secs, 1);
        assert_eq!(config.notification.title, "Check out this video!");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ShowcaseConfig::from_toml_str("[audio]\nvolume = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation() {
        let err = ShowcaseConfig::from_toml_str("[audio]\nnetwork_uri = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "audio.network_uri",
                ..
            }
        ));

        let err = ShowcaseConfig::from_toml_str("[vibration]\nduration_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "vibration.duration_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[video]\nvideo_id = \"abc123\"").unwrap();

        let config = ShowcaseConfig::load(file.path()).unwrap();
        assert_eq!(config.video.video_id, "abc123");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ShowcaseConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_standard_actions_cover_every_kind() {
        let actions = standard_actions(&ShowcaseConfig::default());
        let kinds: Vec<_> = actions.iter().map(Action::kind).collect();
        assert_eq!(kinds, ActionKind::ALL.to_vec());

        let names: Vec<_> = actions.iter().map(Action::name).collect();
        assert_eq!(names[0], "play-network-audio");
        assert_eq!(names[7], "go-to-video");
        assert_eq!(actions[7].label(), "Go to Video");
    }

    #[test]
    fn test_notification_request_from_config() {
        let request = ShowcaseConfig::default().notification_request();
        assert_eq!(request.delay, Duration::from_secs(5));
        assert_eq!(request.payload.screen, ScreenId::Video);
        assert_eq!(request.body, "Tap to watch the video");
    }

    #[test]
    fn test_sample_config_parses() {
        let config =
            ShowcaseConfig::from_toml_str(include_str!("../../demos/showcase/showcase.toml"))
                .unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("demos/showcase/assets"));
        assert_eq!(config.notification.target, ScreenId::Video);
        assert_eq!(config.audio, AudioConfig::default());
    }
}
