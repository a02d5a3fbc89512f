use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid note at index {index}: {reason}")]
    InvalidNote { index: usize, reason: String },

    #[error("Notes out of order at index {index}: start {start_ms}ms precedes {previous_ms}ms")]
    UnsortedNotes {
        index: usize,
        previous_ms: u64,
        start_ms: u64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Action channel closed")]
    ChannelClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParseError(e.to_string())
    }
}
