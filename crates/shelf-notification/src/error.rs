//! Error types for the notification service

use shelf_connection::ConnectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification service not connected")]
    NotConnected,

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl NotificationError {
    pub fn subscription_not_found(recipient_id: impl Into<String>) -> Self {
        NotificationError::SubscriptionNotFound(recipient_id.into())
    }
}

impl From<serde_json::Error> for NotificationError {
    fn from(error: serde_json::Error) -> Self {
        NotificationError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotificationError>;
