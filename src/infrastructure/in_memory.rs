use crate::domain::meeting::PendingMeeting;
use crate::domain::ports::MeetingStore;
use crate::error::{MeetingError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Index name reported for event id collisions.
pub const INDEX_EVENT_ID: &str = "event_id";
/// Index name reported for edit hash collisions.
pub const INDEX_EDIT_HASH: &str = "edit_hash";

#[derive(Default)]
struct MeetingTable {
    by_event_id: HashMap<String, PendingMeeting>,
    // edit_hash -> event_id
    by_edit_hash: HashMap<String, String>,
    // event ids with a settlement in flight
    claimed: HashSet<String>,
}

/// A thread-safe, volatile store for pending meetings.
///
/// Both indexes live behind one `RwLock`, so each operation is a single
/// transaction over the whole table. Nothing survives a restart.
#[derive(Default, Clone)]
pub struct InMemoryMeetingStore {
    table: Arc<RwLock<MeetingTable>>,
}

impl InMemoryMeetingStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.by_event_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MeetingStore for InMemoryMeetingStore {
    async fn put(&self, meeting: PendingMeeting) -> Result<()> {
        let mut table = self.table.write().await;

        if table.by_event_id.contains_key(&meeting.event_id) {
            return Err(MeetingError::DuplicateKey {
                index: INDEX_EVENT_ID,
                value: meeting.event_id,
            });
        }
        if table.by_edit_hash.contains_key(&meeting.edit_hash) {
            return Err(MeetingError::DuplicateKey {
                index: INDEX_EDIT_HASH,
                value: meeting.edit_hash,
            });
        }

        table
            .by_edit_hash
            .insert(meeting.edit_hash.clone(), meeting.event_id.clone());
        table.by_event_id.insert(meeting.event_id.clone(), meeting);
        Ok(())
    }

    async fn get(&self, event_id: &str) -> Result<Option<PendingMeeting>> {
        let table = self.table.read().await;
        Ok(table.by_event_id.get(event_id).cloned())
    }

    async fn claim(&self, event_id: &str) -> Result<Option<PendingMeeting>> {
        let mut table = self.table.write().await;

        let Some(meeting) = table.by_event_id.get(event_id).cloned() else {
            return Ok(None);
        };
        if !table.claimed.insert(meeting.event_id.clone()) {
            return Ok(None);
        }
        Ok(Some(meeting))
    }

    async fn release(&self, meeting: &PendingMeeting) -> Result<()> {
        let mut table = self.table.write().await;
        table.claimed.remove(&meeting.event_id);
        Ok(())
    }

    async fn delete(&self, meeting: &PendingMeeting) -> Result<()> {
        let mut table = self.table.write().await;

        match table.by_event_id.get(&meeting.event_id) {
            Some(stored) if stored == meeting => {}
            _ => {
                return Err(MeetingError::NotFound {
                    event_id: meeting.event_id.clone(),
                });
            }
        }

        table.by_event_id.remove(&meeting.event_id);
        table.by_edit_hash.remove(&meeting.edit_hash);
        table.claimed.remove(&meeting.event_id);
        Ok(())
    }
}
