use crate::status::PlaybackStatus;

/// Result alias that carries the custom [`TimelineError`] type.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// Free-form message for failures that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// A status change was requested while another mode is still active.
    #[error("cannot switch to {requested} while {current}")]
    StatusConflict {
        current: PlaybackStatus,
        requested: PlaybackStatus,
    },
    /// The host offers no voice capture API.
    #[error("voice recording is not supported in this environment")]
    RecordingUnsupported,
    /// Voice playback was requested before any clip was recorded.
    #[error("no recorded clip is available for playback")]
    NoClip,
    /// The capture device could not be acquired or failed mid-recording.
    #[error("capture device error: {0}")]
    Device(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A shared timeline handle was poisoned by a panicking writer.
    #[error("timeline state has been poisoned")]
    LockPoisoned,
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl TimelineError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for TimelineError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for TimelineError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
