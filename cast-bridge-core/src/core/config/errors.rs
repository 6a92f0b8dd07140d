use std::path::PathBuf;
use thiserror::Error;

/// The result type of the configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0:?} could not be read, {1}")]
    Io(PathBuf, std::io::Error),
    #[error("config is invalid, {0}")]
    InvalidConfig(String),
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigError::Io(a, a_err), ConfigError::Io(b, b_err)) => {
                a == b && a_err.kind() == b_err.kind()
            }
            (ConfigError::InvalidConfig(_), ConfigError::InvalidConfig(_)) => true,
            _ => false,
        }
    }
}
