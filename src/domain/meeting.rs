/// A booking that was made on the scheduler but has not been paid for yet.
///
/// Presence in the store is the only state a meeting has. Fields never change
/// after creation; settling the payment removes the record entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMeeting {
    pub event_id: String,
    pub page_slug: String,
    pub edit_hash: String,
}

impl PendingMeeting {
    pub fn new(
        event_id: impl Into<String>,
        page_slug: impl Into<String>,
        edit_hash: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            page_slug: page_slug.into(),
            edit_hash: edit_hash.into(),
        }
    }

    /// URL the confirmation service visits to accept the booking on the
    /// organizer's behalf. The edit hash acts as the capability token.
    pub fn confirmation_url(&self, scheduler_base: &str) -> String {
        format!(
            "{}/{}/confirm/{}",
            scheduler_base.trim_end_matches('/'),
            self.page_slug,
            self.edit_hash
        )
    }
}
