use crate::error::{NotificationError, Result};
use crate::traits::{Notification, NotificationDriver};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Keeps sent notifications per recipient instead of delivering them
#[derive(Default)]
pub struct MemoryNotificationDriver {
    inboxes: Mutex<HashMap<String, Vec<Notification>>>,
    connected: AtomicBool,
}

impl MemoryNotificationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications sent to `recipient_id`, oldest first; `None` when not subscribed
    pub fn sent(&self, recipient_id: &str) -> Option<Vec<Notification>> {
        self.inboxes.lock().get(recipient_id).cloned()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(NotificationError::NotConnected)
        }
    }
}

#[async_trait]
impl NotificationDriver for MemoryNotificationDriver {
    fn name(&self) -> &str {
        "memory-notification"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        self.inboxes.lock().clear();
        Ok(())
    }

    async fn subscribe(&self, recipient_id: &str, _subscription: serde_json::Value) -> Result<()> {
        self.ensure_connected()?;
        self.inboxes
            .lock()
            .insert(recipient_id.to_string(), Vec::new());
        Ok(())
    }

    async fn unsubscribe(&self, recipient_id: &str) -> Result<()> {
        self.ensure_connected()?;
        self.inboxes
            .lock()
            .remove(recipient_id)
            .map(|_| ())
            .ok_or_else(|| NotificationError::subscription_not_found(recipient_id))
    }

    async fn send_notification(
        &self,
        recipient_id: &str,
        notification: Notification,
    ) -> Result<()> {
        self.ensure_connected()?;

        let mut inboxes = self.inboxes.lock();
        let inbox = inboxes
            .get_mut(recipient_id)
            .ok_or_else(|| NotificationError::subscription_not_found(recipient_id))?;

        inbox.push(notification);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.ensure_connected()?;
        self.inboxes.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_resubscribing_empties_the_inbox() {
        let driver = MemoryNotificationDriver::new();
        driver.connect().await.unwrap();

        driver.subscribe("alice", json!({})).await.unwrap();
        driver
            .send_notification("alice", Notification::new("Order", "Ready"))
            .await
            .unwrap();
        assert_eq!(driver.sent("alice").map(|sent| sent.len()), Some(1));

        driver.subscribe("alice", json!({})).await.unwrap();
        assert_eq!(driver.sent("alice"), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_disconnect_drops_subscriptions() {
        let driver = MemoryNotificationDriver::new();
        driver.connect().await.unwrap();
        driver.subscribe("alice", json!({})).await.unwrap();

        driver.disconnect().await.unwrap();

        assert!(driver.sent("alice").is_none());
        assert!(matches!(
            driver.unsubscribe("alice").await,
            Err(NotificationError::NotConnected)
        ));
    }
}
