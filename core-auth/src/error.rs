use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// A stored credential did not parse or is missing required fields
    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    #[error("Credential expired")]
    ExpiredCredential,

    /// Login was rejected; the message is suitable for display
    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The server rejected the session (401/403); credentials were cleared
    #[error("Session invalidated by server (status {status})")]
    SessionInvalidated { status: u16, body: String },

    /// Non-success status left for the caller to handle
    #[error("Request failed with status {status}")]
    UnhandledStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl AuthError {
    /// HTTP status carried by the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::SessionInvalidated { status, .. }
            | AuthError::UnhandledStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body carried by the failure, if the server answered.
    pub fn body(&self) -> Option<&str> {
        match self {
            AuthError::SessionInvalidated { body, .. }
            | AuthError::UnhandledStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
