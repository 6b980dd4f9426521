//! Owned resource handles and the dispatcher's single handle slot
//!
//! A [`ResourceHandle`] is minted by a capability provider (today only audio
//! playback) and then owned by exactly one [`Dispatcher`](crate::Dispatcher).
//! It is deliberately not `Clone`: releasing consumes it, so a handle can be
//! released at most once.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Copyable identifier of a [`ResourceHandle`].
///
/// Used to address the resource in provider calls (such as `play`) while the
/// handle itself stays inside the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(u64);

impl HandleId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out process-unique [`HandleId`]s.
///
/// Providers are free to number handles however they like; this is the
/// allocator the bundled providers share.
#[derive(Debug)]
pub struct HandleIds {
    next: AtomicU64,
}

impl Default for HandleIds {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleIds {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> HandleId {
        HandleId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// An acquired, releasable capability resource.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    id: HandleId,
    label: String,
}

impl ResourceHandle {
    /// Create a handle. Only providers should call this.
    pub fn new(id: HandleId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Human-readable description of what the handle holds (e.g. the source).
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Result of storing a freshly acquired handle in a [`HandleSlot`].
#[derive(Debug)]
pub(crate) enum Stored {
    /// The handle is now live; the previously live one (if any) must be released.
    Replaced(Option<ResourceHandle>),
    /// The slot was already torn down; the new handle was not stored.
    Rejected(ResourceHandle),
}

/// The one-handle slot. Never locked across an await point.
#[derive(Debug, Default)]
pub(crate) struct HandleSlot {
    live: Option<ResourceHandle>,
    torn_down: bool,
}

impl HandleSlot {
    pub(crate) fn store(&mut self, handle: ResourceHandle) -> Stored {
        if self.torn_down {
            return Stored::Rejected(handle);
        }
        Stored::Replaced(self.live.replace(handle))
    }

    /// Take the live handle out, but only if it is still `id`.
    pub(crate) fn take_if(&mut self, id: HandleId) -> Option<ResourceHandle> {
        match &self.live {
            Some(live) if live.id == id => self.live.take(),
            _ => None,
        }
    }

    /// Mark the slot torn down and hand back whatever was live.
    pub(crate) fn tear_down(&mut self) -> Option<ResourceHandle> {
        self.torn_down = true;
        self.live.take()
    }

    pub(crate) fn live_id(&self) -> Option<HandleId> {
        self.live.as_ref().map(ResourceHandle::id)
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(raw: u64) -> ResourceHandle {
        ResourceHandle::new(HandleId::new(raw), format!("h{raw}"))
    }

    #[test]
    fn test_handle_ids_are_unique() {
        let ids = HandleIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.get() + 1, b.get());
    }

    #[test]
    fn test_store_returns_previous() {
        let mut slot = HandleSlot::default();

        assert!(matches!(slot.store(handle(1)), Stored::Replaced(None)));
        match slot.store(handle(2)) {
            Stored::Replaced(Some(prev)) => {
                assert_eq!(prev.id(), HandleId::new(1));
                assert_eq!(prev.label(), "h1");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(slot.live_id(), Some(HandleId::new(2)));
    }

    #[test]
    fn test_take_if_ignores_stale_id() {
        let mut slot = HandleSlot::default();
        let _ = slot.store(handle(1));
        let _ = slot.store(handle(2));

        assert!(slot.take_if(HandleId::new(1)).is_none());
        assert_eq!(slot.live_id(), Some(HandleId::new(2)));
        assert!(slot.take_if(HandleId::new(2)).is_some());
        assert_eq!(slot.live_id(), None);
    }

    #[test]
    fn test_torn_down_slot_rejects() {
        let mut slot = HandleSlot::default();
        let _ = slot.store(handle(1));

        assert_eq!(slot.tear_down().map(|h| h.id()), Some(HandleId::new(1)));
        assert!(slot.tear_down().is_none());
        assert!(slot.is_torn_down());
        assert!(matches!(slot.store(handle(2)), Stored::Rejected(_)));
    }
}
