//! Fetch error classification and user-facing messages.

use shared::error::FetchError;

pub const NO_CONNECTION_MESSAGE: &str = "No connection. Check your internet.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Try again.";
pub const BAD_REQUEST_MESSAGE: &str = "Bad request. Check your input.";
pub const CLIENT_ERROR_MESSAGE: &str = "Client error.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Try again later.";
pub const UNEXPECTED_MESSAGE: &str = "Unexpected error.";
pub const INVALID_CHARACTER_ID_MESSAGE: &str = "Invalid character ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Timeout,
    Client,
    Server,
    Unknown,
}

pub fn classify(err: &FetchError) -> UiErrorCategory {
    match err {
        FetchError::Connectivity(_) => UiErrorCategory::Transport,
        FetchError::RequestTimeout => UiErrorCategory::Timeout,
        FetchError::Client { .. } => UiErrorCategory::Client,
        FetchError::Server { .. } => UiErrorCategory::Server,
        FetchError::Decode(_) | FetchError::Unexpected(_) => UiErrorCategory::Unknown,
    }
}

/// Always yields something displayable.
pub fn to_user_message(err: &FetchError) -> String {
    match err {
        FetchError::Connectivity(_) => NO_CONNECTION_MESSAGE.to_string(),
        FetchError::RequestTimeout => TIMEOUT_MESSAGE.to_string(),
        FetchError::Client { status } if (400..=499).contains(status) => {
            BAD_REQUEST_MESSAGE.to_string()
        }
        FetchError::Client { .. } => CLIENT_ERROR_MESSAGE.to_string(),
        FetchError::Server { .. } => SERVER_ERROR_MESSAGE.to_string(),
        FetchError::Decode(message) | FetchError::Unexpected(message) => {
            if message.trim().is_empty() {
                UNEXPECTED_MESSAGE.to_string()
            } else {
                message.clone()
            }
        }
    }
}
