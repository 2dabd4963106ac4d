//! File store facade

use crate::error::{FileStoreError, Result};
use crate::traits::FileDriver;
use async_trait::async_trait;
use bytes::Bytes;
use shelf_connection::{Connectable, ConnectionConfig, ConnectionManager, ConnectionState};
use std::sync::Arc;
use tracing::{debug, error};

struct DriverConnection(Arc<dyn FileDriver>);

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

/// Path-addressed binary storage over a [`FileDriver`]
pub struct FileStore {
    driver: Arc<dyn FileDriver>,
    connection: ConnectionManager,
}

impl FileStore {
    pub fn new(driver: Arc<dyn FileDriver>) -> Self {
        let config = ConnectionConfig::new(driver.name());
        Self::with_config(driver, config)
    }

    pub fn with_config(driver: Arc<dyn FileDriver>, config: ConnectionConfig) -> Self {
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

    pub async fn has_file(&self, path: &str) -> Result<bool> {
        debug!("{} -> checking has file {}", self.name(), path);

        self.ensure_connected()?;
        let result = self.driver.has_file(path).await;
        self.observe("check has file", path, result)
    }

    pub async fn write_file(&self, path: &str, data: impl Into<Bytes>) -> Result<()> {
        debug!("{} -> writing file {}", self.name(), path);

        self.ensure_connected()?;
        let result = self.driver.write_file(path, data.into()).await;
        self.observe("write file", path, result)
    }

    pub async fn read_file(&self, path: &str) -> Result<Bytes> {
        debug!("{} -> reading file {}", self.name(), path);

        self.ensure_connected()?;
        let result = self.driver.read_file(path).await;
        self.observe("read file", path, result)
    }

    pub async fn delete_file(&self, path: &str) -> Result<()> {
        debug!("{} -> deleting file {}", self.name(), path);

        self.ensure_connected()?;
        let result = self.driver.delete_file(path).await;
        self.observe("delete file", path, result)
    }

    pub async fn clear(&self) -> Result<()> {
        debug!("{} -> clearing files", self.name());

        self.ensure_connected()?;
        let result = self.driver.clear().await;
        self.observe("clear", "*", result)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.driver.is_connected() {
            Ok(())
        } else {
            error!("{} -> file store not connected", self.name());
            Err(FileStoreError::NotConnected)
        }
    }

    fn observe<T>(&self, operation: &str, path: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!("{} -> {} {} failed: {}", self.name(), operation, path, e);
        }
        result
    }
}
