use thiserror::Error;

/// Errors surfaced by the playback core.
///
/// Deliberately small: a full debt queue and an empty debt queue are not
/// errors — they are silent no-ops expressed through `bool`/`Option` return
/// values on the queue itself.
#[derive(Error, Debug)]
pub enum AdMomentError {
    /// Unknown video id in a metadata query.
    #[error("video '{0}' not found")]
    MetadataNotFound(String),

    /// Persistence adapter failure (read or write).
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization failure on persisted state or catalog files.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// File I/O on catalog or store files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Rejected user input (e.g. a snooze delay outside the picker range).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AdMomentError>;
