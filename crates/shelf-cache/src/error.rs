//! Error types for the cache store

use shelf_connection::ConnectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache store not connected")]
    NotConnected,

    #[error("TTL must be a positive number")]
    InvalidTtl,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        CacheError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
