//! Test utilities for capdeck
//!
//! Recording fakes for every capability trait, plus [`FakeCapabilities`] to
//! bundle them. Each fake records what it was asked to do and can be
//! scripted to fail.
//!
//! # Example
//!
//! ```ignore
//! use capdeck::testing::FakeCapabilities;
//!
//! let fakes = FakeCapabilities::new();
//! let dispatcher = Dispatcher::with_actions(fakes.capabilities(), actions)?;
//!
//! dispatcher.trigger("play-local").await?;
//! dispatcher.teardown();
//!
//! assert_eq!(fakes.audio.released().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::capability::{
    AudioProvider, AudioSource, Capabilities, FileFilter, FilePicker, Haptics, Intensity,
    Navigator, NoticeSurface, NotificationRequest, NotificationScheduler, PickOutcome, PickedFile,
    Transition,
};
use crate::error::ProviderError;
use crate::resource::{HandleId, HandleIds, ResourceHandle};
use crate::screen::ScreenId;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Audio
// ============================================================================

/// Audio provider that records acquire / play / release calls.
#[derive(Debug, Default)]
pub struct FakeAudio {
    ids: HandleIds,
    acquired: Mutex<Vec<(HandleId, AudioSource)>>,
    played: Mutex<Vec<HandleId>>,
    released: Mutex<Vec<HandleId>>,
    acquire_failure: Mutex<Option<String>>,
    play_failure: Mutex<Option<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    play_gate: Mutex<Option<Arc<Semaphore>>>,
}

async fn pass(gate: &Mutex<Option<Arc<Semaphore>>>) {
    let gate = lock(gate).clone();
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

impl FakeAudio {
    /// Make every following `acquire` fail with `reason`.
    pub fn fail_acquire(&self, reason: impl Into<String>) {
        *lock(&self.acquire_failure) = Some(reason.into());
    }

    /// Make every following `play` fail with `reason`.
    pub fn fail_play(&self, reason: impl Into<String>) {
        *lock(&self.play_failure) = Some(reason.into());
    }

    /// Park every following `acquire` on the returned [`Semaphore`].
    ///
    /// Each permit added lets one acquisition through.
    pub fn hold_acquisitions(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *lock(&self.gate) = Some(gate.clone());
        gate
    }

    /// Park every following `play` on the returned [`Semaphore`], after the
    /// handle is already stored by the dispatcher.
    pub fn hold_plays(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *lock(&self.play_gate) = Some(gate.clone());
        gate
    }

    pub fn acquired(&self) -> Vec<HandleId> {
        lock(&self.acquired).iter().map(|(id, _)| *id).collect()
    }

    pub fn sources(&self) -> Vec<AudioSource> {
        lock(&self.acquired).iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn played(&self) -> Vec<HandleId> {
        lock(&self.played).clone()
    }

    pub fn released(&self) -> Vec<HandleId> {
        lock(&self.released).clone()
    }

    /// How many times `id` was released.
    pub fn release_count(&self, id: HandleId) -> usize {
        lock(&self.released).iter().filter(|r| **r == id).count()
    }

    /// Acquired handles that were never released.
    pub fn outstanding(&self) -> Vec<HandleId> {
        let released = self.released();
        self.acquired()
            .into_iter()
            .filter(|id| !released.contains(id))
            .collect()
    }
}

#[async_trait]
impl AudioProvider for FakeAudio {
    async fn acquire(&self, source: &AudioSource) -> Result<ResourceHandle, ProviderError> {
        pass(&self.gate).await;
        if let Some(reason) = lock(&self.acquire_failure).clone() {
            return Err(ProviderError::rejected(reason));
        }
        let id = self.ids.next_id();
        lock(&self.acquired).push((id, source.clone()));
        Ok(ResourceHandle::new(id, source.to_string()))
    }

    async fn play(&self, id: HandleId) -> Result<(), ProviderError> {
        pass(&self.play_gate).await;
        if lock(&self.released).contains(&id) {
            return Err(ProviderError::rejected("not loaded"));
        }
        if let Some(reason) = lock(&self.play_failure).clone() {
            return Err(ProviderError::rejected(reason));
        }
        lock(&self.played).push(id);
        Ok(())
    }

    fn release(&self, handle: ResourceHandle) {
        lock(&self.released).push(handle.id());
    }
}

// ============================================================================
// Haptics
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeHaptics {
    pulses: Mutex<Vec<(Intensity, Duration)>>,
}

impl FakeHaptics {
    pub fn pulses(&self) -> Vec<(Intensity, Duration)> {
        lock(&self.pulses).clone()
    }
}

impl Haptics for FakeHaptics {
    fn pulse(&self, intensity: Intensity, duration: Duration) {
        lock(&self.pulses).push((intensity, duration));
    }
}

// ============================================================================
// File picker
// ============================================================================

/// File picker answering from a script. With an empty script the user
/// "cancels".
#[derive(Debug, Default)]
pub struct FakeFilePicker {
    script: Mutex<VecDeque<Result<PickOutcome, String>>>,
    filters: Mutex<Vec<FileFilter>>,
}

impl FakeFilePicker {
    pub fn select(&self, name: impl Into<String>, size_bytes: u64) {
        lock(&self.script).push_back(Ok(PickOutcome::Selected(PickedFile {
            name: name.into(),
            size_bytes,
        })));
    }

    pub fn cancel(&self) {
        lock(&self.script).push_back(Ok(PickOutcome::Cancelled));
    }

    pub fn fail(&self, reason: impl Into<String>) {
        lock(&self.script).push_back(Err(reason.into()));
    }

    /// Filters the picker was opened with.
    pub fn filters(&self) -> Vec<FileFilter> {
        lock(&self.filters).clone()
    }
}

#[async_trait]
impl FilePicker for FakeFilePicker {
    async fn pick(&self, filter: &FileFilter) -> Result<PickOutcome, ProviderError> {
        lock(&self.filters).push(filter.clone());
        let next = lock(&self.script).pop_front();
        match next {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(reason)) => Err(ProviderError::unavailable(reason)),
            None => Ok(PickOutcome::Cancelled),
        }
    }
}

// ============================================================================
// Notices
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Dialog { title: String, message: String },
    Banner(String),
}

/// Notice surface that records what it showed.
#[derive(Debug, Default)]
pub struct RecordingNotices {
    banners: bool,
    shown: Mutex<Vec<Notice>>,
}

impl RecordingNotices {
    /// A surface that supports ephemeral banners.
    pub fn with_banners() -> Self {
        Self {
            banners: true,
            ..Self::default()
        }
    }

    pub fn shown(&self) -> Vec<Notice> {
        lock(&self.shown).clone()
    }

    /// Titles of the dialogs shown, in order.
    pub fn dialog_titles(&self) -> Vec<String> {
        lock(&self.shown)
            .iter()
            .filter_map(|n| match n {
                Notice::Dialog { title, .. } => Some(title.clone()),
                Notice::Banner(_) => None,
            })
            .collect()
    }
}

impl NoticeSurface for RecordingNotices {
    fn notify_user(&self, title: &str, message: &str) {
        lock(&self.shown).push(Notice::Dialog {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn supports_banner(&self) -> bool {
        self.banners
    }

    fn show_banner(&self, message: &str) {
        lock(&self.shown).push(Notice::Banner(message.to_string()));
    }
}

// ============================================================================
// Scheduler
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeScheduler {
    scheduled: Mutex<Vec<NotificationRequest>>,
    failure: Mutex<Option<String>>,
}

impl FakeScheduler {
    pub fn fail(&self, reason: impl Into<String>) {
        *lock(&self.failure) = Some(reason.into());
    }

    pub fn scheduled(&self) -> Vec<NotificationRequest> {
        lock(&self.scheduled).clone()
    }
}

#[async_trait]
impl NotificationScheduler for FakeScheduler {
    async fn schedule_one_shot(&self, request: NotificationRequest) -> Result<(), ProviderError> {
        if let Some(reason) = lock(&self.failure).clone() {
            return Err(ProviderError::unavailable(reason));
        }
        lock(&self.scheduled).push(request);
        Ok(())
    }
}

// ============================================================================
// Navigation and transition
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    To(ScreenId),
    Back,
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavEvent>>,
}

impl RecordingNavigator {
    pub fn events(&self) -> Vec<NavEvent> {
        lock(&self.events).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, screen: ScreenId) {
        lock(&self.events).push(NavEvent::To(screen));
    }

    fn go_back(&self) {
        lock(&self.events).push(NavEvent::Back);
    }
}

#[derive(Debug, Default)]
pub struct FakeTransition {
    starts: AtomicUsize,
}

impl FakeTransition {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

impl Transition for FakeTransition {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// All fakes, kept concrete so tests can inspect them.
#[derive(Clone, Debug)]
pub struct FakeCapabilities {
    pub audio: Arc<FakeAudio>,
    pub haptics: Arc<FakeHaptics>,
    pub files: Arc<FakeFilePicker>,
    pub notices: Arc<RecordingNotices>,
    pub scheduler: Arc<FakeScheduler>,
    pub navigator: Arc<RecordingNavigator>,
    pub transition: Arc<FakeTransition>,
}

impl Default for FakeCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCapabilities {
    pub fn new() -> Self {
        Self::with_notices(RecordingNotices::default())
    }

    pub fn with_notices(notices: RecordingNotices) -> Self {
        Self {
            audio: Arc::default(),
            haptics: Arc::default(),
            files: Arc::default(),
            notices: Arc::new(notices),
            scheduler: Arc::default(),
            navigator: Arc::default(),
            transition: Arc::default(),
        }
    }

    /// Type-erased bundle to hand to a [`Dispatcher`](crate::Dispatcher).
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            audio: self.audio.clone(),
            haptics: self.haptics.clone(),
            files: self.files.clone(),
            notices: self.notices.clone(),
            scheduler: self.scheduler.clone(),
            navigator: self.navigator.clone(),
            transition: self.transition.clone(),
        }
    }
}
