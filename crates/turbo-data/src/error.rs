//! Error type for commerce API calls.

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Response contained no data")]
    MissingData,
}

impl FetchError {
    /// Whether the same call may succeed if tried again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => (500..600).contains(status),
            Self::Timeout(_) | Self::Connection(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Deserialization(e.to_string())
    }
}
