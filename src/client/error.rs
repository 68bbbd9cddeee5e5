//! Collaborator error types

use thiserror::Error;

/// Failure talking to the history store or the generation service
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Timeout, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Server, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Rejected, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Malformed, message)
    }

    /// Classify a transport error from reqwest
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timeout: {err}"))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::malformed(format!("Failed to decode response: {err}"))
        } else {
            Self::network(format!("Request failed: {err}"))
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: reqwest::StatusCode, detail: &str) -> Self {
        if status.is_server_error() {
            Self::server(format!("Server error ({status}): {detail}"))
        } else {
            Self::rejected(format!("Request rejected ({status}): {detail}"))
        }
    }
}

/// Error classification, mostly for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Could not reach the backend
    Network,
    /// Backend did not answer in time
    Timeout,
    /// Backend answered 5xx
    Server,
    /// Backend answered 4xx
    Rejected,
    /// Backend answered 2xx with a body we cannot use
    Malformed,
}

impl ClientErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Server => "server",
            Self::Rejected => "rejected",
            Self::Malformed => "malformed",
        }
    }
}
