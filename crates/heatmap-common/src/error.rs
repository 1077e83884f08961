//! Error types for heat map configuration and rendering.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heat map operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("Invalid value for '{param}': {message}")]
    InvalidArgument { param: String, message: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl HeatmapError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a Render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// True for errors caused by a rejected caller-supplied value.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, HeatmapError::InvalidArgument { .. })
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::Config(format!("JSON error: {}", err))
    }
}
