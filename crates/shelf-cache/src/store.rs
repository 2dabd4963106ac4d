//! Cache store facade

use crate::error::{CacheError, Result};
use crate::traits::{CacheDriver, CacheItem};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_connection::{Connectable, ConnectionConfig, ConnectionManager, ConnectionState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

struct DriverConnection(Arc<dyn CacheDriver>);

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

/// Typed key/value cache over a [`CacheDriver`]
///
/// Values are stored as JSON; any `Serialize` type can be cached and read
/// back as any compatible `DeserializeOwned` type.
pub struct CacheStore {
    driver: Arc<dyn CacheDriver>,
    connection: ConnectionManager,
}

impl CacheStore {
    pub fn new(driver: Arc<dyn CacheDriver>) -> Self {
        let config = ConnectionConfig::new(driver.name());
        Self::with_config(driver, config)
    }

    pub fn with_config(driver: Arc<dyn CacheDriver>, config: ConnectionConfig) -> Self {
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

    /// Cached value for `key`, `None` on a miss or an expired item
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        debug!("{} -> getting cache for key {}", self.name(), key);

        let result = self.try_get(key).await;
        if let Err(e) = &result {
            error!("{} -> get cache for key {} failed: {}", self.name(), key, e);
        }
        result
    }

    async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.ensure_connected()?;

        match self.driver.get(key).await? {
            Some(item) => {
                debug!("{} -> cache found for key {}", self.name(), key);
                Ok(Some(serde_json::from_value(item.value)?))
            }
            None => {
                debug!("{} -> cache miss for key {}", self.name(), key);
                Ok(None)
            }
        }
    }

    /// Cache `value` under `key`; `ttl` defaults to the driver's and must not be zero
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        debug!("{} -> setting cache for key {}", self.name(), key);

        let result = self.try_set(key, value, ttl).await;
        if let Err(e) = &result {
            error!("{} -> set cache for key {} failed: {}", self.name(), key, e);
        }
        result
    }

    async fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        if ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(CacheError::InvalidTtl);
        }
        self.ensure_connected()?;

        let item = CacheItem {
            key: key.to_string(),
            value: serde_json::to_value(value)?,
            ttl,
        };
        self.driver.set(item).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("{} -> deleting cache for key {}", self.name(), key);

        self.ensure_connected()?;
        self.driver.delete(key).await.inspect_err(|e| {
            error!("{} -> delete cache for key {} failed: {}", self.name(), key, e)
        })
    }

    pub async fn clear(&self) -> Result<()> {
        debug!("{} -> clearing cache", self.name());

        self.ensure_connected()?;
        self.driver
            .clear()
            .await
            .inspect_err(|e| error!("{} -> clear cache failed: {}", self.name(), e))
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.driver.is_connected() {
            Ok(())
        } else {
            Err(CacheError::NotConnected)
        }
    }
}
