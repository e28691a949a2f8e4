/// Result alias that carries the custom [`TunerMetronomeError`] type.
pub type Result<T> = std::result::Result<T, TunerMetronomeError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum TunerMetronomeError {
    /// Free-form failure raised by the driver or a collaborator.
    #[error("{0}")]
    Message(String),
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An input event could not be parsed from its text form.
    #[error("unrecognised input `{0}`")]
    InvalidEvent(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl TunerMetronomeError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<&str> for TunerMetronomeError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for TunerMetronomeError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
