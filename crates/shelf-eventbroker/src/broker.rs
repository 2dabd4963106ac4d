//! Event broker facade

use crate::error::{EventBrokerError, Result};
use crate::traits::{BrokerDriver, Event, Publication, Subscription};
use async_trait::async_trait;
use serde::Serialize;
use shelf_connection::{Connectable, ConnectionConfig, ConnectionManager, ConnectionState};
use std::sync::Arc;
use tracing::{debug, error};

struct DriverConnection(Arc<dyn BrokerDriver>);

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

/// Publish/subscribe over a [`BrokerDriver`]
///
/// Payloads travel as JSON, so any `Serialize` type can be published.
pub struct EventBroker {
    driver: Arc<dyn BrokerDriver>,
    connection: ConnectionManager,
}

impl EventBroker {
    pub fn new(driver: Arc<dyn BrokerDriver>) -> Self {
        let config = ConnectionConfig::new(driver.name());
        Self::with_config(driver, config)
    }

    pub fn with_config(driver: Arc<dyn BrokerDriver>, config: ConnectionConfig) -> Self {
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

    pub async fn publish<T: Serialize + ?Sized>(&self, event: &Event, data: &T) -> Result<()> {
        debug!("{} -> publishing to {}", self.name(), event);

        let result = self.try_publish(event, data).await;
        if let Err(e) = &result {
            error!("{} -> publish to {} failed: {}", self.name(), event, e);
        }
        result
    }

    async fn try_publish<T: Serialize + ?Sized>(&self, event: &Event, data: &T) -> Result<()> {
        self.ensure_connected()?;

        let publication = Publication {
            event: event.clone(),
            data: serde_json::to_value(data)?,
        };
        self.driver.publish(publication).await
    }

    pub async fn subscribe(&self, event: &Event) -> Result<Subscription> {
        debug!("{} -> subscribing to {}", self.name(), event);

        self.ensure_connected()?;
        self.driver
            .subscribe(event.clone())
            .await
            .inspect_err(|e| error!("{} -> subscribe to {} failed: {}", self.name(), event, e))
    }

    pub async fn unsubscribe(&self, subscription: &Subscription) -> Result<()> {
        let event = subscription.event();
        debug!("{} -> unsubscribing from {}", self.name(), event);

        self.ensure_connected()?;
        self.driver
            .unsubscribe(subscription)
            .await
            .inspect_err(|e| error!("{} -> unsubscribe from {} failed: {}", self.name(), event, e))
    }

    /// Drop every subscription
    pub async fn clear(&self) -> Result<()> {
        debug!("{} -> clearing subscriptions", self.name());

        self.ensure_connected()?;
        self.driver
            .clear()
            .await
            .inspect_err(|e| error!("{} -> clear failed: {}", self.name(), e))
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.driver.is_connected() {
            Ok(())
        } else {
            Err(EventBrokerError::NotConnected)
        }
    }
}
