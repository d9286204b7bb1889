use crate::domain::meeting::PendingMeeting;
use crate::domain::ports::{BookingClientBox, MeetingStoreRef};
use crate::error::Result;
use serde::Serialize;
use tracing::{error, info, warn};

/// How a payment callback was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// The booking was confirmed remotely and the record removed.
    Confirmed,
    /// The record was removed; the remote cancel was attempted best-effort.
    Cancelled,
    /// No record was pending, or another settlement held it; nothing was done.
    NotPending,
}

/// Turns payment outcomes into exactly one confirm-or-cancel action per
/// pending meeting.
pub struct MeetingCoordinator {
    store: MeetingStoreRef,
    booking: BookingClientBox,
}

impl MeetingCoordinator {
    /// Creates a new `MeetingCoordinator`.
    ///
    /// # Arguments
    ///
    /// * `store` - The table of pending meetings.
    /// * `booking` - The outbound client for confirm and cancel calls.
    pub fn new(store: MeetingStoreRef, booking: BookingClientBox) -> Self {
        Self { store, booking }
    }

    /// Records a freshly booked, not yet paid meeting.
    ///
    /// A duplicate event id or edit hash is returned as `DuplicateKey`; the
    /// existing record is left untouched.
    pub async fn record_pending_meeting(
        &self,
        event_id: &str,
        page_slug: &str,
        edit_hash: &str,
    ) -> Result<()> {
        let meeting = PendingMeeting::new(event_id, page_slug, edit_hash);
        self.store.put(meeting).await.inspect_err(|e| {
            error!(event_id, error = %e, "failed to record pending meeting");
        })?;
        info!(event_id, page_slug, "inserted pending meeting");
        Ok(())
    }

    /// Confirms the booking after a successful payment.
    ///
    /// The record is claimed for the duration of the remote call, so a
    /// concurrent accept or reject for the same event sees `NotPending`. It is
    /// only removed once the confirmation succeeded; on failure the claim is
    /// dropped and the error returned, leaving the record in place for a retry.
    pub async fn accept_pending_meeting(&self, event_id: &str) -> Result<Settlement> {
        let Some(meeting) = self.store.claim(event_id).await? else {
            warn!(event_id, "meeting not found or already being settled, unable to accept");
            return Ok(Settlement::NotPending);
        };

        if let Err(e) = self.booking.confirm(&meeting).await {
            error!(event_id, error = %e, "booking confirmation failed, record kept for retry");
            self.store.release(&meeting).await?;
            return Err(e);
        }

        self.store.delete(&meeting).await?;
        info!(event_id, "meeting confirmed");
        Ok(Settlement::Confirmed)
    }

    /// Releases the booking after a cancelled payment.
    ///
    /// Local state is forgotten first. The remote cancel is best-effort: a
    /// failure is logged and never returned.
    pub async fn reject_pending_meeting(&self, event_id: &str) -> Result<Settlement> {
        let Some(meeting) = self.store.claim(event_id).await? else {
            warn!(event_id, "meeting not found or already being settled, unable to delete");
            return Ok(Settlement::NotPending);
        };

        self.store.delete(&meeting).await?;

        match self.booking.cancel(&meeting).await {
            Ok(()) => info!(event_id, "meeting cancelled"),
            Err(e) => warn!(
                event_id,
                error = %e,
                "remote cancellation failed, local record already removed"
            ),
        }

        Ok(Settlement::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{BookingClient, MeetingStore};
    use crate::error::MeetingError;
    use crate::infrastructure::in_memory::InMemoryMeetingStore;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeBooking {
        confirm_status: Option<u16>,
        cancel_status: Option<u16>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl BookingClient for FakeBooking {
        async fn confirm(&self, meeting: &PendingMeeting) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("confirm:{}", meeting.event_id));
            match self.confirm_status {
                Some(status) => Err(MeetingError::Upstream { status }),
                None => Ok(()),
            }
        }

        async fn cancel(&self, meeting: &PendingMeeting) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("cancel:{}", meeting.event_id));
            match self.cancel_status {
                Some(status) => Err(MeetingError::Upstream { status }),
                None => Ok(()),
            }
        }
    }

    fn coordinator(booking: FakeBooking) -> (MeetingCoordinator, InMemoryMeetingStore) {
        let store = InMemoryMeetingStore::new();
        let coordinator = MeetingCoordinator::new(Arc::new(store.clone()), Box::new(booking));
        (coordinator, store)
    }

    #[tokio::test]
    async fn test_record_duplicate_is_returned() {
        let (coordinator, store) = coordinator(FakeBooking::default());
        coordinator
            .record_pending_meeting("evt1", "slugA", "hashA")
            .await
            .unwrap();

        let err = coordinator
            .record_pending_meeting("evt1", "slugB", "hashB")
            .await
            .unwrap_err();
        assert!(matches!(err, MeetingError::DuplicateKey { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_accept_failure_keeps_record() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (coordinator, store) = coordinator(FakeBooking {
            confirm_status: Some(500),
            calls: calls.clone(),
            ..Default::default()
        });
        coordinator
            .record_pending_meeting("evt1", "slugA", "hashA")
            .await
            .unwrap();

        let err = coordinator.accept_pending_meeting("evt1").await.unwrap_err();
        assert!(err.is_remote());
        assert!(store.get("evt1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_accept_releases_claim() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (coordinator, store) = coordinator(FakeBooking {
            confirm_status: Some(502),
            calls: calls.clone(),
            ..Default::default()
        });
        coordinator
            .record_pending_meeting("evt1", "slugA", "hashA")
            .await
            .unwrap();

        coordinator.accept_pending_meeting("evt1").await.unwrap_err();
        assert_eq!(
            coordinator.reject_pending_meeting("evt1").await.unwrap(),
            Settlement::Cancelled
        );
        assert!(store.is_empty().await);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["confirm:evt1".to_string(), "cancel:evt1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_reject_ignores_cancel_failure() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (coordinator, store) = coordinator(FakeBooking {
            cancel_status: Some(500),
            calls: calls.clone(),
            ..Default::default()
        });
        coordinator
            .record_pending_meeting("evt2", "slugB", "hashB")
            .await
            .unwrap();

        let settlement = coordinator.reject_pending_meeting("evt2").await.unwrap();
        assert_eq!(settlement, Settlement::Cancelled);
        assert!(store.is_empty().await);
        assert_eq!(*calls.lock().unwrap(), vec!["cancel:evt2".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_event_is_noop() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (coordinator, _) = coordinator(FakeBooking {
            calls: calls.clone(),
            ..Default::default()
        });

        assert_eq!(
            coordinator.accept_pending_meeting("nope").await.unwrap(),
            Settlement::NotPending
        );
        assert_eq!(
            coordinator.reject_pending_meeting("nope").await.unwrap(),
            Settlement::NotPending
        );
        assert!(calls.lock().unwrap().is_empty());
    }
}
