//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("invalid status value: {0}")]
    InvalidStatus(String),

    #[error("invalid id generator config: {0}")]
    IdGenerator(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
