//! Terminal input polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Raw event from crossterm before processing
#[derive(Debug)]
pub enum RawEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Input the screens react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Key press (releases and repeats are filtered out)
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

impl RawEvent {
    /// Keep the crossterm events the screens care about.
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Some(Self::Key(key)),
            Event::Resize(w, h) => Some(Self::Resize(w, h)),
            _ => None,
        }
    }
}

/// Forward terminal input to `tx` every `interval` until `cancel` fires or
/// the receiver is dropped.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if !forward_buffered(&tx) {
                        debug!("Input receiver dropped");
                        break;
                    }
                }
            }
        }
        debug!("Input poller stopped");
    })
}

/// Drain what crossterm has already buffered without blocking. Returns
/// `false` once nobody is listening.
fn forward_buffered(tx: &mpsc::UnboundedSender<RawEvent>) -> bool {
    while let Ok(true) = event::poll(Duration::ZERO) {
        let Ok(event) = event::read() else {
            break;
        };
        if let Some(raw) = RawEvent::from_crossterm(event) {
            if tx.send(raw).is_err() {
                return false;
            }
        }
    }
    true
}

/// Process a raw event into an [`EventKind`]
///
/// Returns `None` for key releases and repeats, which some terminals report.
pub fn process_raw_event(raw: RawEvent) -> Option<EventKind> {
    match raw {
        RawEvent::Key(key) if key.kind == KeyEventKind::Press => Some(EventKind::Key(key)),
        RawEvent::Key(_) => None,
        RawEvent::Resize(w, h) => Some(EventKind::Resize(w, h)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::empty(),
            kind,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_press_passes_through() {
        let event = process_raw_event(RawEvent::Key(key(KeyEventKind::Press)));
        assert!(matches!(event, Some(EventKind::Key(k)) if k.code == KeyCode::Enter));
    }

    #[test]
    fn test_release_is_dropped() {
        assert!(process_raw_event(RawEvent::Key(key(KeyEventKind::Release))).is_none());
        assert!(process_raw_event(RawEvent::Key(key(KeyEventKind::Repeat))).is_none());
    }

    #[test]
    fn test_focus_and_paste_are_ignored() {
        assert!(RawEvent::from_crossterm(Event::FocusGained).is_none());
        assert!(RawEvent::from_crossterm(Event::Paste("hi".into())).is_none());
        assert!(matches!(
            RawEvent::from_crossterm(Event::Resize(100, 30)),
            Some(RawEvent::Resize(100, 30))
        ));
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            process_raw_event(RawEvent::Resize(80, 24)),
            Some(EventKind::Resize(80, 24))
        );
    }
}
