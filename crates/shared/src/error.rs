use thiserror::Error;

/// Failure kinds produced by the character data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No route to the server: connect failure, connect/socket timeout or I/O.
    #[error("connection failed: {0}")]
    Connectivity(String),
    #[error("request timed out")]
    RequestTimeout,
    #[error("client error: HTTP {status}")]
    Client { status: u16 },
    #[error("server error: HTTP {status}")]
    Server { status: u16 },
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400..=499 => Some(Self::Client { status }),
            500..=599 => Some(Self::Server { status }),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client { status: 404 })
    }
}
