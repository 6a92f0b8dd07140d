use thiserror::Error;

/// The result type of the host channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChannelError {
    #[error("host channel has been closed")]
    Closed,
}
