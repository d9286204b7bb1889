use super::meeting::PendingMeeting;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Keyed table of pending meetings, unique on both event id and edit hash.
///
/// Every call is one atomic operation: a write either updates both indexes or
/// neither, and a read never observes a half-written record.
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Fails with `DuplicateKey` if either key is already taken.
    async fn put(&self, meeting: PendingMeeting) -> Result<()>;
    async fn get(&self, event_id: &str) -> Result<Option<PendingMeeting>>;
    /// Marks the record as being settled and returns it. Returns `None` when
    /// the record is absent or already claimed, so only one settlement can
    /// hold a record at a time.
    async fn claim(&self, event_id: &str) -> Result<Option<PendingMeeting>>;
    /// Drops a claim without removing the record.
    async fn release(&self, meeting: &PendingMeeting) -> Result<()>;
    /// Fails with `NotFound` if the record is already gone. Also drops any claim.
    async fn delete(&self, meeting: &PendingMeeting) -> Result<()>;
}

/// Outbound side effects against the scheduling provider.
#[async_trait]
pub trait BookingClient: Send + Sync {
    async fn confirm(&self, meeting: &PendingMeeting) -> Result<()>;
    async fn cancel(&self, meeting: &PendingMeeting) -> Result<()>;
}

pub type MeetingStoreRef = Arc<dyn MeetingStore>;
pub type BookingClientBox = Box<dyn BookingClient>;
