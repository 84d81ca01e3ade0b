use thiserror::Error;

/// Centralized error type for fairkey-net.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Timeout")]
    Timeout,

    #[error("HTTP {status} for URL: {url}")]
    Status {
        url: String,
        status: u16,
        body: Option<String>,
    },
}

impl NetError {
    /// Creates an HTTP error from a generic message.
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    /// Creates a status error for a non-success response.
    pub fn status(status: u16, url: String, body: Option<String>) -> Self {
        Self::Status { url, status, body }
    }

    /// Checks if this error indicates a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetError::Timeout)
    }

    /// Gets the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Maps a reqwest error, preserving timeouts as [`NetError::Timeout`].
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error.to_string())
        }
    }
}

impl From<reqwest::Error> for NetError {
    fn from(error: reqwest::Error) -> Self {
        Self::from_reqwest(error)
    }
}

pub type NetResult<T> = Result<T, NetError>;
