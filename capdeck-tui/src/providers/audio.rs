//! Audio provider for the terminal
//!
//! There is no sound card behind this provider. Acquisition does the part of
//! loading that can fail (the remote stream answers, the bundled asset
//! exists) and playback state is tracked per handle and shown in the status
//! line.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use capdeck::{AudioProvider, AudioSource, HandleId, HandleIds, ProviderError, ResourceHandle};
use tracing::{debug, info};

use crate::bridge::{UiBridge, UiRequest};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
struct Playback {
    loaded: HashMap<HandleId, String>,
    playing: Option<HandleId>,
}

pub struct TerminalAudio {
    bridge: UiBridge,
    assets_dir: PathBuf,
    http: reqwest::Client,
    ids: HandleIds,
    state: Mutex<Playback>,
}

impl TerminalAudio {
    pub fn new(bridge: UiBridge, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            bridge,
            assets_dir: assets_dir.into(),
            http: reqwest::Client::new(),
            ids: HandleIds::new(),
            state: Mutex::new(Playback::default()),
        }
    }

    /// Number of handles acquired and not yet released.
    pub fn loaded(&self) -> usize {
        self.state().loaded.len()
    }

    pub fn playing(&self) -> Option<HandleId> {
        self.state().playing
    }

    fn state(&self) -> MutexGuard<'_, Playback> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn probe(&self, source: &AudioSource) -> Result<(), ProviderError> {
        match source {
            AudioSource::Remote(uri) => {
                let response = self
                    .http
                    .head(uri)
                    .timeout(PROBE_TIMEOUT)
                    .send()
                    .await
                    .map_err(|e| ProviderError::request(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ProviderError::rejected(format!("{uri} answered {status}")));
                }
            }
            AudioSource::Bundled(asset) => {
                let path = self.assets_dir.join(asset);
                let meta = tokio::fs::metadata(&path).await?;
                if !meta.is_file() {
                    return Err(ProviderError::rejected(format!(
                        "{} is not a file",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AudioProvider for TerminalAudio {
    async fn acquire(&self, source: &AudioSource) -> Result<ResourceHandle, ProviderError> {
        self.probe(source).await?;

        let id = self.ids.next_id();
        let label = source.to_string();
        self.state().loaded.insert(id, label.clone());
        debug!(handle = %id, %source, "Audio loaded");
        Ok(ResourceHandle::new(id, label))
    }

    async fn play(&self, id: HandleId) -> Result<(), ProviderError> {
        let label = {
            let mut state = self.state();
            let label = state
                .loaded
                .get(&id)
                .cloned()
                .ok_or_else(|| ProviderError::rejected(format!("handle {id} is not loaded")))?;
            state.playing = Some(id);
            label
        };
        info!(handle = %id, source = %label, "Playback started");
        self.bridge.send(UiRequest::NowPlaying(Some(label)));
        Ok(())
    }

    fn release(&self, handle: ResourceHandle) {
        let stopped = {
            let mut state = self.state();
            state.loaded.remove(&handle.id());
            if state.playing == Some(handle.id()) {
                state.playing = None;
                true
            } else {
                false
            }
        };
        debug!(handle = %handle.id(), "Audio unloaded");
        if stopped {
            self.bridge.send(UiRequest::NowPlaying(None));
        }
    }
}
