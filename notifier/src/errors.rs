//! Error types for the deployment notifier

use thiserror::Error;

/// Main error type for the notifier
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Server rejected event: {status}: {message}")]
    ServerRejection { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl NotifierError {
    /// Whether the error was raised before any network I/O was attempted
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            NotifierError::ConfigError(_)
                | NotifierError::IoError(_)
                | NotifierError::JsonError(_)
                | NotifierError::UrlError(_)
        )
    }
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        // Display only covers the outermost layer, append the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        NotifierError::TransportError(message)
    }
}
