use thiserror::Error;

/// Failures at the backend boundary.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request was cancelled")]
    Cancelled,
    #[error("backend responded with status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Outcomes the controller distinguishes when handling user operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("request was superseded")]
    Cancelled,
    #[error("network or server failure: {0}")]
    NetworkOrServerFailure(String),
    #[error("nothing to send")]
    EmptyInput,
    #[error("unknown session '{0}'")]
    UnknownSession(String),
    #[error("no session is active")]
    NoActiveSession,
}

impl From<ClientError> for ChatError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Cancelled => ChatError::Cancelled,
            other => ChatError::NetworkOrServerFailure(other.to_string()),
        }
    }
}
