use strum::{AsRefStr, Display as StrumDisplay};
use thiserror::Error;

/// Message used when a failed response carries no `detail` field.
pub const GENERIC_REQUEST_FAILURE: &str = "API request failed";

/// The server answered with a status outside 200..300.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiRequestError {
    pub endpoint: String,
    pub status: u16,
    pub message: String,
}

/// Why a request never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TransportFailureKind {
    Connect,
    Timeout,
    Aborted,
    Other,
}

/// The request never completed: DNS, refused connection, timeout, abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure: {message}")]
pub struct ApiTransportError {
    pub endpoint: String,
    pub kind: TransportFailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request to {} failed ({}): {}", .0.endpoint, .0.status, .0.message)]
    Request(#[from] ApiRequestError),
    #[error("transport error on {}: {}", .0.endpoint, .0)]
    Transport(#[from] ApiTransportError),
    /// A body that could not be encoded, or a 2xx body that does not match the expected shape.
    #[error("invalid body for {endpoint}: {reason}")]
    InvalidBody { endpoint: String, reason: String },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Request(e) => &e.endpoint,
            ApiError::Transport(e) => &e.endpoint,
            ApiError::InvalidBody { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Message suitable for an alert banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request(e) => e.message.clone(),
            ApiError::Transport(e) => e.to_string(),
            ApiError::InvalidBody { reason, .. } => reason.clone(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
