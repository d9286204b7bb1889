use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetingError {
    #[error("duplicate {index}: {value}")]
    DuplicateKey { index: &'static str, value: String },
    #[error("no pending meeting for event {event_id}")]
    NotFound { event_id: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream responded with status {status}")]
    Upstream { status: u16 },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeetingError {
    /// True for failures reported by a booking collaborator rather than the store.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, MeetingError>;
