//! The capability action dispatcher
//!
//! Owns a registry of named [`Action`]s, runs them on demand against a
//! [`Capabilities`] bundle, and owns the single [`ResourceHandle`] slot.
//!
//! # Resource invariant
//!
//! At most one handle is live per dispatcher. Storing a new handle releases
//! the previous one right after the swap. [`Dispatcher::teardown`] (also run
//! on drop) releases the live handle and marks the dispatcher torn down, so
//! an acquisition that completes afterwards is released instead of stored.
//! Handles are consumed on release, so none is ever released twice.
//!
//! # Example
//!
//! ```ignore
//! let mut dispatcher = Dispatcher::new(capabilities);
//! for action in standard_actions(&config) {
//!     dispatcher.register(action)?;
//! }
//! let dispatcher = Arc::new(dispatcher);
//!
//! // From any task
//! match dispatcher.trigger("play-network-audio").await? {
//!     DispatchResult::Ok(outcome) => { /* update the screen */ }
//!     DispatchResult::Failed(failure) => { /* already shown to the user */ }
//! }
//!
//! // Leaving the screen
//! dispatcher.teardown();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::action::{Action, Command, DispatchResult, Failure, Outcome};
use crate::capability::{AudioSource, Capabilities, FileFilter, Intensity, NotificationRequest, PickOutcome};
use crate::error::DispatchError;
use crate::middleware::{Middleware, NoopMiddleware};
use crate::resource::{HandleId, HandleSlot, Stored};
use crate::screen::{Backdrop, ScreenId};

const ERROR_TITLE: &str = "Error";
const TORN_DOWN: &str = "dispatcher torn down";
const SUPERSEDED: &str = "superseded by a newer audio trigger";

/// Registers and runs [`Action`]s while enforcing the resource invariant.
///
/// Registration needs `&mut self`; once the dispatcher is shared (usually in
/// an `Arc`) the registry is fixed. Triggers take `&self` and may overlap.
pub struct Dispatcher {
    caps: Capabilities,
    actions: Vec<Action>,
    index: HashMap<String, usize>,
    slot: Mutex<HandleSlot>,
    backdrop: Mutex<Backdrop>,
    middleware: Box<dyn Middleware>,
}

impl Dispatcher {
    /// Create an empty dispatcher over the given providers.
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            actions: Vec::new(),
            index: HashMap::new(),
            slot: Mutex::new(HandleSlot::default()),
            backdrop: Mutex::new(Backdrop::default()),
            middleware: Box::new(NoopMiddleware),
        }
    }

    /// Create a dispatcher and register `actions` in order.
    pub fn with_actions(
        caps: Capabilities,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<Self, DispatchError> {
        let mut dispatcher = Self::new(caps);
        for action in actions {
            dispatcher.register(action)?;
        }
        Ok(dispatcher)
    }

    /// Replace the middleware wrapped around every trigger.
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = Box::new(middleware);
        self
    }

    /// Add an action under its unique name.
    ///
    /// On a duplicate name the existing action stays bound.
    pub fn register(&mut self, action: Action) -> Result<(), DispatchError> {
        if self.index.contains_key(action.name()) {
            return Err(DispatchError::DuplicateName(action.name().to_string()));
        }
        debug!(action = %action.name(), kind = %action.kind(), "Registered action");
        self.index.insert(action.name().to_string(), self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    /// Registered actions in registration order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.index.get(name).map(|&i| &self.actions[i])
    }

    /// Run the action bound to `name`.
    ///
    /// Provider failures come back as [`DispatchResult::Failed`] after being
    /// shown to the user; only registry errors are returned as `Err`.
    pub async fn trigger(&self, name: &str) -> Result<DispatchResult, DispatchError> {
        let action = self
            .action(name)
            .ok_or_else(|| DispatchError::UnknownAction(name.to_string()))?;

        self.middleware.before(action);
        let result = self.run(action.command()).await;
        self.middleware.after(action, &result);
        Ok(result)
    }

    /// Release the live handle, if any. Safe to call any number of times.
    pub fn teardown(&self) {
        let released = {
            let mut slot = self.slot();
            let first = !slot.is_torn_down();
            let handle = slot.tear_down();
            if first {
                info!(live = ?handle.as_ref().map(|h| h.id()), "Dispatcher torn down");
            }
            handle
        };
        if let Some(handle) = released {
            debug!(handle = %handle.id(), label = handle.label(), "Releasing handle on teardown");
            self.caps.audio.release(handle);
        }
    }

    /// Id of the currently held handle.
    pub fn live_handle(&self) -> Option<HandleId> {
        self.slot().live_id()
    }

    pub fn is_torn_down(&self) -> bool {
        self.slot().is_torn_down()
    }

    /// Current background flag.
    pub fn backdrop(&self) -> Backdrop {
        *self.backdrop.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self) -> MutexGuard<'_, HandleSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self, command: &Command) -> DispatchResult {
        match command {
            Command::PlayAudio(source) => self.play_audio(source).await,
            Command::Vibrate {
                intensity,
                duration,
            } => self.vibrate(*intensity, *duration),
            Command::PickFile(filter) => self.pick_file(filter).await,
            Command::ShowToast { title, message } => self.show_toast(title, message),
            Command::ScheduleNotification(request) => self.schedule(request).await,
            Command::ToggleBackground => self.toggle_background(),
            Command::Navigate(screen) => self.navigate(*screen),
        }
    }

    async fn play_audio(&self, source: &AudioSource) -> DispatchResult {
        let notice = if source.is_remote() {
            "Failed to play network audio"
        } else {
            "Failed to play local audio"
        };

        let handle = match self.caps.audio.acquire(source).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(%source, error = %err, "Audio acquisition failed");
                self.caps.notices.notify_user(ERROR_TITLE, notice);
                return DispatchResult::Failed(Failure::Playback(err.to_string()));
            }
        };
        let id = handle.id();

        let stored = self.slot().store(handle);
        match stored {
            Stored::Rejected(handle) => {
                debug!(handle = %id, "Acquired after teardown, releasing");
                self.caps.audio.release(handle);
                return DispatchResult::Failed(Failure::Playback(TORN_DOWN.to_string()));
            }
            Stored::Replaced(Some(previous)) => {
                debug!(
                    previous = %previous.id(),
                    label = previous.label(),
                    next = %id,
                    "Replacing live handle"
                );
                self.caps.audio.release(previous);
            }
            Stored::Replaced(None) => {}
        }

        if self.live_handle() != Some(id) {
            return self.released_early(id);
        }

        if let Err(err) = self.caps.audio.play(id).await {
            let ours = self.slot().take_if(id);
            let Some(handle) = ours else {
                // Replaced or torn down while `play` was pending; the error
                // is about a handle nobody owns any more.
                return self.released_early(id);
            };
            warn!(%source, handle = %id, error = %err, "Playback did not start");
            self.caps.audio.release(handle);
            self.caps.notices.notify_user(ERROR_TITLE, notice);
            return DispatchResult::Failed(Failure::Playback(err.to_string()));
        }

        DispatchResult::Ok(Outcome::Playing(id))
    }

    /// Result for an audio trigger whose handle was released by someone else
    /// before playback could start. Nothing is shown to the user.
    fn released_early(&self, id: HandleId) -> DispatchResult {
        let reason = if self.is_torn_down() {
            TORN_DOWN
        } else {
            SUPERSEDED
        };
        debug!(handle = %id, reason, "Handle released before playback");
        DispatchResult::Failed(Failure::Playback(reason.to_string()))
    }

    fn vibrate(&self, intensity: Intensity, duration: Duration) -> DispatchResult {
        self.caps.haptics.pulse(intensity, duration);
        DispatchResult::done()
    }

    async fn pick_file(&self, filter: &FileFilter) -> DispatchResult {
        match self.caps.files.pick(filter).await {
            Ok(PickOutcome::Selected(file)) => {
                self.caps.notices.notify_user(
                    "File Selected",
                    &format!("Name: {}\nSize: {} bytes", file.name, file.size_bytes),
                );
                DispatchResult::Ok(Outcome::Picked(Some(file)))
            }
            Ok(PickOutcome::Cancelled) => {
                self.caps
                    .notices
                    .notify_user("File Selection", "No file was selected");
                DispatchResult::Ok(Outcome::Picked(None))
            }
            Err(err) => {
                warn!(filter = %filter.as_str(), error = %err, "File pick failed");
                self.caps
                    .notices
                    .notify_user(ERROR_TITLE, "Failed to pick file");
                DispatchResult::Failed(Failure::FilePick(err.to_string()))
            }
        }
    }

    fn show_toast(&self, title: &str, message: &str) -> DispatchResult {
        let notices = &self.caps.notices;
        if notices.supports_banner() {
            notices.show_banner(message);
        } else {
            notices.notify_user(title, message);
        }
        DispatchResult::done()
    }

    async fn schedule(&self, request: &NotificationRequest) -> DispatchResult {
        match self.caps.scheduler.schedule_one_shot(request.clone()).await {
            Ok(()) => {
                debug!(delay = ?request.delay, target = %request.payload.screen, "Notification scheduled");
                DispatchResult::Ok(Outcome::Scheduled)
            }
            Err(err) => {
                warn!(error = %err, "Notification scheduling failed");
                self.caps
                    .notices
                    .notify_user(ERROR_TITLE, "Failed to schedule notification");
                DispatchResult::Failed(Failure::Notification(err.to_string()))
            }
        }
    }

    fn toggle_background(&self) -> DispatchResult {
        let mut backdrop = self.backdrop.lock().unwrap_or_else(PoisonError::into_inner);
        *backdrop = backdrop.toggled();
        DispatchResult::Ok(Outcome::Background(*backdrop))
    }

    fn navigate(&self, screen: ScreenId) -> DispatchResult {
        // The transition is cosmetic; navigation never waits on it.
        self.caps.transition.start();
        self.caps.navigator.navigate_to(screen);
        DispatchResult::Ok(Outcome::Navigated(screen))
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", &self.actions.len())
            .field("live_handle", &self.live_handle())
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}
