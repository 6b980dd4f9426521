//! File picker backed by a directory listing

use std::path::PathBuf;

use async_trait::async_trait;
use capdeck::{FileFilter, FilePicker, PickOutcome, PickedFile, ProviderError};
use tokio::sync::oneshot;
use tracing::debug;

use crate::bridge::{UiBridge, UiRequest};

/// Offers the regular files of one directory in a modal list.
///
/// The pick completes when the user confirms or cancels the modal. Closing
/// the screen while the modal is open cancels the pick.
pub struct DirectoryPicker {
    bridge: UiBridge,
    directory: PathBuf,
}

impl DirectoryPicker {
    pub fn new(bridge: UiBridge, directory: impl Into<PathBuf>) -> Self {
        Self {
            bridge,
            directory: directory.into(),
        }
    }

    /// Files in the directory accepted by `filter`, sorted by name.
    pub async fn entries(&self, filter: &FileFilter) -> Result<Vec<PickedFile>, ProviderError> {
        let mut dir = tokio::fs::read_dir(&self.directory).await?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let path = entry.path();
            let extension = path.extension().and_then(|ext| ext.to_str());
            if !filter.accepts_extension(extension) {
                continue;
            }
            entries.push(PickedFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: meta.len(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[async_trait]
impl FilePicker for DirectoryPicker {
    async fn pick(&self, filter: &FileFilter) -> Result<PickOutcome, ProviderError> {
        let entries = self.entries(filter).await?;
        debug!(
            directory = %self.directory.display(),
            filter = filter.as_str(),
            count = entries.len(),
            "Opening picker"
        );

        let (reply, chosen) = oneshot::channel();
        if !self.bridge.send(UiRequest::OpenPicker { entries, reply }) {
            return Err(ProviderError::unavailable("screen is closed"));
        }

        match chosen.await {
            Ok(Some(file)) => Ok(PickOutcome::Selected(file)),
            Ok(None) | Err(_) => Ok(PickOutcome::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join("photo.png"), b"0123456789").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_entries_skip_directories() {
        let dir = fixture();
        let (bridge, _rx) = UiBridge::channel();
        let picker = DirectoryPicker::new(bridge, dir.path());

        let entries = picker.entries(&FileFilter::any()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["notes.txt", "photo.png"]);
        assert_eq!(entries[1].size_bytes, 10);
    }

    #[tokio::test]
    async fn test_entries_respect_filter() {
        let dir = fixture();
        let (bridge, _rx) = UiBridge::channel();
        let picker = DirectoryPicker::new(bridge, dir.path());

        let entries = picker.entries(&FileFilter::new("image/png")).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "photo.png");
    }

    #[tokio::test]
    async fn test_pick_selected() {
        let dir = fixture();
        let (bridge, mut rx) = UiBridge::channel();
        let picker = DirectoryPicker::new(bridge, dir.path());

        let screen = tokio::spawn(async move {
            match rx.recv().await {
                Some(UiRequest::OpenPicker { mut entries, reply }) => {
                    let _ = reply.send(Some(entries.remove(0)));
                }
                other => panic!("unexpected request: {other:?}"),
            }
        });

        let outcome = picker.pick(&FileFilter::any()).await.unwrap();
        screen.await.unwrap();
        assert_eq!(
            outcome,
            PickOutcome::Selected(PickedFile {
                name: "notes.txt".into(),
                size_bytes: 5,
            })
        );
    }

    #[tokio::test]
    async fn test_dropped_reply_is_cancel() {
        let dir = fixture();
        let (bridge, mut rx) = UiBridge::channel();
        let picker = DirectoryPicker::new(bridge, dir.path());

        let screen = tokio::spawn(async move {
            let request = rx.recv().await;
            drop(request);
        });

        let outcome = picker.pick(&FileFilter::any()).await.unwrap();
        screen.await.unwrap();
        assert_eq!(outcome, PickOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let (bridge, _rx) = UiBridge::channel();
        let picker = DirectoryPicker::new(bridge, dir.path().join("gone"));

        let err = picker.pick(&FileFilter::any()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Io(_)));
    }

    #[tokio::test]
    async fn test_closed_screen_is_unavailable() {
        let dir = fixture();
        let (bridge, rx) = UiBridge::channel();
        drop(rx);
        let picker = DirectoryPicker::new(bridge, dir.path());

        let err = picker.pick(&FileFilter::any()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
