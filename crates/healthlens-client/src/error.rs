use std::fmt;

/// Result type for healthlens-client operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure of a call to the analytics service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No usable response: connection failure, timeout, or a body that
    /// could not be decoded
    Transport(String),

    /// Non-2xx response; `message` is already resolved for display
    Service { status: u16, message: String },

    /// Local file rejected before upload
    InvalidFile(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Service { status, .. } => Some(*status),
            FetchError::Transport(_) | FetchError::InvalidFile(_) => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Network error: {}", msg),
            FetchError::Service { message, .. } => f.write_str(message),
            FetchError::InvalidFile(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Transport(format!("invalid response body ({})", err))
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::InvalidFile(format!("Could not read file: {}", err))
    }
}
