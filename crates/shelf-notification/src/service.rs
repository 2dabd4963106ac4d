//! Notification service facade

use crate::error::{NotificationError, Result};
use crate::traits::{Notification, NotificationDriver};
use async_trait::async_trait;
use serde::Serialize;
use shelf_connection::{Connectable, ConnectionConfig, ConnectionManager, ConnectionState};
use std::sync::Arc;
use tracing::{debug, error};

struct DriverConnection(Arc<dyn NotificationDriver>);

#[async_trait]
impl Connectable for DriverConnection {
    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    async fn connect(&self) -> anyhow::Result<()> {
        Ok(self.0.connect().await?)
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        Ok(self.0.disconnect().await?)
    }
}

/// Sends notifications to subscribed recipients through a [`NotificationDriver`]
pub struct NotificationService {
    driver: Arc<dyn NotificationDriver>,
    connection: ConnectionManager,
}

impl NotificationService {
    pub fn new(driver: Arc<dyn NotificationDriver>) -> Self {
        let config = ConnectionConfig::new(driver.name());
        Self::with_config(driver, config)
    }

    pub fn with_config(driver: Arc<dyn NotificationDriver>, config: ConnectionConfig) -> Self {
        let connection =
            ConnectionManager::new(config, Arc::new(DriverConnection(driver.clone())));

        Self { driver, connection }
    }

    fn name(&self) -> &str {
        self.connection.name()
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub async fn connect(&self) -> Result<()> {
        Ok(self.connection.connect().await?)
    }

    pub async fn disconnect(&self) -> Result<()> {
        Ok(self.connection.disconnect().await?)
    }

    /// Register `recipient_id` with backend-specific delivery details
    pub async fn subscribe<T: Serialize + ?Sized>(
        &self,
        recipient_id: &str,
        subscription: &T,
    ) -> Result<()> {
        debug!("{} -> subscribing {}", self.name(), recipient_id);

        let result = self.try_subscribe(recipient_id, subscription).await;
        self.observe("subscribe", recipient_id, result)
    }

    async fn try_subscribe<T: Serialize + ?Sized>(
        &self,
        recipient_id: &str,
        subscription: &T,
    ) -> Result<()> {
        self.ensure_connected()?;

        let subscription = serde_json::to_value(subscription)?;
        self.driver.subscribe(recipient_id, subscription).await
    }

    pub async fn unsubscribe(&self, recipient_id: &str) -> Result<()> {
        debug!("{} -> unsubscribing {}", self.name(), recipient_id);

        self.ensure_connected()?;
        let result = self.driver.unsubscribe(recipient_id).await;
        self.observe("unsubscribe", recipient_id, result)
    }

    pub async fn send_notification(
        &self,
        recipient_id: &str,
        title: &str,
        body: &str,
    ) -> Result<()> {
        debug!("{} -> sending notification to {}", self.name(), recipient_id);

        self.ensure_connected()?;
        let result = self
            .driver
            .send_notification(recipient_id, Notification::new(title, body))
            .await;
        self.observe("send notification to", recipient_id, result)
    }

    pub async fn clear(&self) -> Result<()> {
        debug!("{} -> clearing subscriptions", self.name());

        self.ensure_connected()?;
        let result = self.driver.clear().await;
        self.observe("clear", "subscriptions", result)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.driver.is_connected() {
            Ok(())
        } else {
            Err(NotificationError::NotConnected)
        }
    }

    fn observe<T>(&self, operation: &str, target: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!("{} -> {} {} failed: {}", self.name(), operation, target, e);
        }
        result
    }
}
