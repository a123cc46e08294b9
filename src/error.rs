use thiserror::Error;

/// Which side of the system a failure belongs to.
///
/// Configuration failures abort startup; request failures are logged and
/// surfaced to the user as "no image produced".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Request,
    Server,
}

#[derive(Debug, Error)]
pub enum FluxError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Translation error: {0}")]
    TranslationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Image decode error: {0}")]
    DecodeError(String),
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl FluxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FluxError::ConfigError(_) => ErrorKind::Configuration,
            FluxError::ServerError(_) => ErrorKind::Server,
            FluxError::EmptyPrompt
            | FluxError::TranslationError(_)
            | FluxError::RequestError(_)
            | FluxError::ResponseError(_)
            | FluxError::DecodeError(_) => ErrorKind::Request,
        }
    }

    pub fn is_config(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_request_failure(&self) -> bool {
        self.kind() == ErrorKind::Request
    }
}

pub type Result<T> = std::result::Result<T, FluxError>;
