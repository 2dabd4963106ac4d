use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Delivery backend of a [`NotificationService`](crate::NotificationService)
#[async_trait]
pub trait NotificationDriver: Send + Sync {
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    /// Register a recipient. `subscription` holds backend-specific
    /// delivery details and replaces any earlier registration.
    async fn subscribe(&self, recipient_id: &str, subscription: serde_json::Value) -> Result<()>;

    /// `SubscriptionNotFound` for an unknown recipient
    async fn unsubscribe(&self, recipient_id: &str) -> Result<()>;

    /// `SubscriptionNotFound` for an unknown recipient
    async fn send_notification(
        &self,
        recipient_id: &str,
        notification: Notification,
    ) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
