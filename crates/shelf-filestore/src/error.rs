//! Error types for the file store

use shelf_connection::ConnectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileStoreError {
    #[error("File store not connected")]
    NotConnected,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl FileStoreError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        FileStoreError::FileNotFound(path.into())
    }
}

pub type Result<T> = std::result::Result<T, FileStoreError>;
