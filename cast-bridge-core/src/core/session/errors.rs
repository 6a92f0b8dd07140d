use thiserror::Error;

/// The result type of a remote request.
pub type Result<T> = std::result::Result<T, RequestError>;

/// The failures reported by the receiver for an issued request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("receiver request failed, {0}")]
    Failed(String),
    #[error("receiver request has been interrupted, {0}")]
    Interrupted(String),
    #[error("receiver is unavailable")]
    Unavailable,
}
