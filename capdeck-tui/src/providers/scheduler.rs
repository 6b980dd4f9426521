//! Local notifications delivered by timer
//!
//! Each scheduled notification is a task that sleeps for the requested delay
//! and then hands the notification to the screen loop. Pending deliveries are
//! aborted when the scheduler is cancelled or dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use capdeck::{NotificationPayload, NotificationRequest, NotificationScheduler, ProviderError};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::bridge::{UiBridge, UiRequest};

pub struct TimerScheduler {
    bridge: UiBridge,
    pending: Mutex<Vec<AbortHandle>>,
}

impl TimerScheduler {
    pub fn new(bridge: UiBridge) -> Self {
        Self {
            bridge,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Notifications scheduled and not yet delivered.
    pub fn pending(&self) -> usize {
        let mut pending = self.pending_lock();
        pending.retain(|task| !task.is_finished());
        pending.len()
    }

    /// Abort every pending delivery.
    pub fn cancel_all(&self) {
        let mut pending = self.pending_lock();
        for task in pending.drain(..) {
            task.abort();
        }
    }

    fn pending_lock(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationScheduler for TimerScheduler {
    async fn schedule_one_shot(&self, request: NotificationRequest) -> Result<(), ProviderError> {
        if self.bridge.is_closed() {
            return Err(ProviderError::unavailable("screen is closed"));
        }
        let data = serde_json::to_value(&request.payload)
            .map_err(|e| ProviderError::rejected(e.to_string()))?;

        let bridge = self.bridge.clone();
        let NotificationRequest {
            title, body, delay, ..
        } = request;
        debug!(?delay, %title, "Notification scheduled");

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(%title, "Notification delivered");
            bridge.send(UiRequest::NotificationDelivered { title, body, data });
        });

        let mut pending = self.pending_lock();
        pending.retain(|task| !task.is_finished());
        pending.push(task.abort_handle());
        Ok(())
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Read the payload back out of a delivered notification's data.
pub fn decode_payload(data: &serde_json::Value) -> Option<NotificationPayload> {
    serde_json::from_value(data.clone()).ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use capdeck::ScreenId;

    use super::*;

    fn request(delay: Duration) -> NotificationRequest {
        NotificationRequest {
            title: "Check out this video!".into(),
            body: "Tap to watch the video".into(),
            payload: NotificationPayload {
                screen: ScreenId::Video,
            },
            delay,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivers_after_delay() {
        let (bridge, mut rx) = UiBridge::channel();
        let scheduler = TimerScheduler::new(bridge);

        scheduler
            .schedule_one_shot(request(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(rx.try_recv().is_err());

        match rx.recv().await {
            Some(UiRequest::NotificationDelivered { title, data, .. }) => {
                assert_eq!(title, "Check out this video!");
                assert_eq!(data, serde_json::json!({ "screen": "video" }));
                assert_eq!(
                    decode_payload(&data),
                    Some(NotificationPayload {
                        screen: ScreenId::Video
                    })
                );
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_aborts_pending() {
        let (bridge, mut rx) = UiBridge::channel();
        let scheduler = TimerScheduler::new(bridge);

        scheduler
            .schedule_one_shot(request(Duration::from_secs(5)))
            .await
            .unwrap();
        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_screen_is_unavailable() {
        let (bridge, rx) = UiBridge::channel();
        drop(rx);
        let scheduler = TimerScheduler::new(bridge);

        let err = scheduler
            .schedule_one_shot(request(Duration::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn test_decode_foreign_payload() {
        assert_eq!(decode_payload(&serde_json::json!({ "screen": "nowhere" })), None);
    }
}
