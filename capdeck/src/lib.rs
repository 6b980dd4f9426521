//! Named capability actions with owned resource lifecycles
//!
//! capdeck maps named actions (the buttons of a screen) onto device
//! capabilities: audio playback, haptics, file picking, notices, local
//! notifications and navigation. The [`Dispatcher`] runs an action on demand
//! and owns the one resource an action may leave behind (an audio playback
//! handle), releasing it exactly once.
//!
//! # Core Concepts
//!
//! - **Action**: a name, a label and the [`Command`] it performs
//! - **Capabilities**: one trait per provider, bundled in [`Capabilities`]
//! - **Dispatcher**: registry + runner + handle owner
//! - **Middleware**: hooks around every trigger, e.g. [`LoggingMiddleware`]
//!
//! # Basic Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use capdeck::prelude::*;
//!
//! let config = ShowcaseConfig::default();
//! let dispatcher = Arc::new(
//!     Dispatcher::with_actions(capabilities, standard_actions(&config))?
//!         .with_middleware(LoggingMiddleware::new()),
//! );
//!
//! let result = dispatcher.trigger("play-local-audio").await?;
//! assert!(result.is_ok());
//!
//! dispatcher.teardown();
//! ```
//!
//! # Errors
//!
//! Registering a name twice or triggering an unknown name is a wiring
//! mistake and returns [`DispatchError`]. Provider failures (playback, file
//! pick, notification scheduling) are shown to the user through the
//! [`NoticeSurface`] and come back as [`DispatchResult::Failed`]; they never
//! escape `trigger` as errors.

pub mod action;
pub mod capability;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod resource;
pub mod screen;
pub mod testing;

pub use action::{Action, ActionKind, Command, DispatchResult, Failure, Outcome};
pub use capability::{
    AudioProvider, AudioSource, Capabilities, FileFilter, FilePicker, Haptics, Intensity,
    Navigator, NoticeSurface, NotificationPayload, NotificationRequest, NotificationScheduler,
    PickOutcome, PickedFile, Transition,
};
pub use config::{standard_actions, standard_name, ShowcaseConfig};
pub use dispatcher::Dispatcher;
pub use error::{ConfigError, DispatchError, ProviderError};
pub use middleware::{ComposedMiddleware, LoggingMiddleware, Middleware, NoopMiddleware};
pub use resource::{HandleId, HandleIds, ResourceHandle};
pub use screen::{Backdrop, ScreenId, VideoScreen};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionKind, Command, DispatchResult, Failure, Outcome};
    pub use crate::capability::{
        AudioProvider, AudioSource, Capabilities, FileFilter, FilePicker, Haptics, Intensity,
        Navigator, NoticeSurface, NotificationPayload, NotificationRequest,
        NotificationScheduler, PickOutcome, PickedFile, Transition,
    };
    pub use crate::config::{standard_actions, ShowcaseConfig};
    pub use crate::dispatcher::Dispatcher;
    pub use crate::error::{DispatchError, ProviderError};
    pub use crate::middleware::{LoggingMiddleware, Middleware, NoopMiddleware};
    pub use crate::resource::{HandleId, ResourceHandle};
    pub use crate::screen::{Backdrop, ScreenId, VideoScreen};
}
