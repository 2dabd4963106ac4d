//! Error types for the event broker

use shelf_connection::ConnectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventBrokerError {
    #[error("Event broker not connected")]
    NotConnected,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for EventBrokerError {
    fn from(error: serde_json::Error) -> Self {
        EventBrokerError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EventBrokerError>;
