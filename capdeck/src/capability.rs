//! Capability provider contracts
//!
//! Each device feature the dispatcher drives is reached through one trait.
//! Platform code implements these; tests substitute the fakes from
//! [`testing`](crate::testing).
//!
//! | Trait | Feature |
//! |-------|---------|
//! | [`AudioProvider`] | acquire / play / release a playback resource |
//! | [`Haptics`] | tactile feedback or vibration motor |
//! | [`FilePicker`] | file-selection dialog |
//! | [`NoticeSurface`] | toast banner or blocking alert |
//! | [`NotificationScheduler`] | one-shot local notifications |
//! | [`Navigator`] | screen navigation |
//! | [`Transition`] | cosmetic transition played before navigating |

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::resource::{HandleId, ResourceHandle};
use crate::screen::ScreenId;

// ============================================================================
// Value types
// ============================================================================

/// Where audio comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum AudioSource {
    /// Remote URI streamed over the network.
    Remote(String),
    /// Asset bundled with the application, relative to its asset root.
    Bundled(String),
}

impl AudioSource {
    pub fn location(&self) -> &str {
        match self {
            AudioSource::Remote(uri) | AudioSource::Bundled(uri) => uri,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AudioSource::Remote(_))
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::Remote(uri) => write!(f, "{uri}"),
            AudioSource::Bundled(path) => write!(f, "asset:{path}"),
        }
    }
}

/// Strength of a haptic pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Medium,
    #[default]
    Heavy,
}

/// Which files a picker should offer. `"*/*"` accepts everything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileFilter(String);

impl FileFilter {
    pub fn new(mime: impl Into<String>) -> Self {
        Self(mime.into())
    }

    pub fn any() -> Self {
        Self::new("*/*")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a file with `extension` passes this filter.
    ///
    /// Only the wildcard and the `*/<ext>` / `<type>/<ext>` subtype forms are
    /// understood; anything else is compared against the subtype.
    pub fn accepts_extension(&self, extension: Option<&str>) -> bool {
        let subtype = match self.0.split_once('/') {
            Some((_, subtype)) => subtype,
            None => self.0.as_str(),
        };
        if subtype == "*" {
            return true;
        }
        extension.is_some_and(|ext| ext.eq_ignore_ascii_case(subtype))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::any()
    }
}

/// A file chosen in the picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedFile {
    pub name: String,
    pub size_bytes: u64,
}

/// Result of a completed picker interaction. Cancelling is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(PickedFile),
    Cancelled,
}

/// Data carried by a local notification, read back when it is opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub screen: ScreenId,
}

/// A one-shot local notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
    pub delay: Duration,
}

// ============================================================================
// Provider traits
// ============================================================================

/// Screen navigation collaborator.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, screen: ScreenId);
    fn go_back(&self);
}

/// Audio playback engine.
#[async_trait]
pub trait AudioProvider: Send + Sync {
    /// Load `source` and return a handle to the loaded resource.
    async fn acquire(&self, source: &AudioSource) -> Result<ResourceHandle, ProviderError>;

    /// Start playing an acquired resource.
    async fn play(&self, id: HandleId) -> Result<(), ProviderError>;

    /// Unload a resource. Must not fail; unloading is best effort.
    fn release(&self, handle: ResourceHandle);
}

/// Tactile feedback or vibration motor.
pub trait Haptics: Send + Sync {
    fn pulse(&self, intensity: Intensity, duration: Duration);
}

/// File-selection dialog.
#[async_trait]
pub trait FilePicker: Send + Sync {
    async fn pick(&self, filter: &FileFilter) -> Result<PickOutcome, ProviderError>;
}

/// User-facing notices.
///
/// Platforms with an ephemeral banner (a toast) report it through
/// [`supports_banner`](NoticeSurface::supports_banner); everything else gets
/// a blocking acknowledgment dialog via
/// [`notify_user`](NoticeSurface::notify_user).
pub trait NoticeSurface: Send + Sync {
    fn notify_user(&self, title: &str, message: &str);

    fn supports_banner(&self) -> bool {
        false
    }

    /// Show a transient banner. Falls back to a dialog titled "Notice".
    fn show_banner(&self, message: &str) {
        self.notify_user("Notice", message);
    }
}

/// Local notification scheduler. Delivery itself is asynchronous and not
/// observed by the caller.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn schedule_one_shot(&self, request: NotificationRequest) -> Result<(), ProviderError>;
}

/// Cosmetic transition. Fire-and-forget; must return without waiting for
/// the animation.
pub trait Transition: Send + Sync {
    fn start(&self);
}

// ============================================================================
// Bundle
// ============================================================================

/// Every provider a [`Dispatcher`](crate::Dispatcher) may call.
#[derive(Clone)]
pub struct Capabilities {
    pub audio: Arc<dyn AudioProvider>,
    pub haptics: Arc<dyn Haptics>,
    pub files: Arc<dyn FilePicker>,
    pub notices: Arc<dyn NoticeSurface>,
    pub scheduler: Arc<dyn NotificationScheduler>,
    pub navigator: Arc<dyn Navigator>,
    pub transition: Arc<dyn Transition>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}
