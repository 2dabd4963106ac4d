//! Store facade
//!
//! [`Database`] binds one [`Driver`] to a [`ConnectionManager`]: connect and
//! disconnect go through the lifecycle controller, data operations go to the
//! driver once the connection is up.

use crate::drivers::MemoryDriver;
use crate::error::{DatabaseError, Result};
use crate::traits::Driver;
use async_trait::async_trait;
use shelf_connection::{Connectable, ConnectionConfig, ConnectionManager, ConnectionState};
use shelf_query::{QueryStatement, Record, RecordId, SearchOptions};
use std::sync::Arc;
use tracing::{debug, error};

/// Lets the lifecycle controller drive a [`Driver`]
struct DriverConnection(Arc<dyn Driver>);

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

/// Public entry point for record storage
pub struct Database {
    driver: Arc<dyn Driver>,
    config: ConnectionConfig,
    connection: ConnectionManager,
}

impl Database {
    /// Facade over `driver`, monitored with the default settings
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        let config = ConnectionConfig::new(driver.name());
        Self::with_config(driver, config)
    }

    pub fn with_config(driver: Arc<dyn Driver>, config: ConnectionConfig) -> Self {
        let connection = ConnectionManager::new(
            config.clone(),
            Arc::new(DriverConnection(driver.clone())),
        );

        Self {
            driver,
            config,
            connection,
        }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Swap the bound driver.
    ///
    /// The new driver gets a fresh lifecycle; disconnect the current one
    /// first, it is not closed here.
    pub fn set_driver(&mut self, driver: Arc<dyn Driver>) {
        debug!(
            "{} -> replacing driver with {}",
            self.config.name,
            driver.name()
        );

        self.connection = ConnectionManager::new(
            self.config.clone(),
            Arc::new(DriverConnection(driver.clone())),
        );
        self.driver = driver;
    }

    /// Liveness of the bound driver
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

    pub async fn create_record(&self, collection: &str, record: Record) -> Result<RecordId> {
        self.ensure_ready(collection)?;
        debug!("{} -> create record in {}", self.config.name, collection);

        let result = self.driver.create_record(collection, record).await;
        self.observe("create record", collection, result)
    }

    pub async fn read_record(
        &self,
        collection: &str,
        query: &QueryStatement,
        options: &SearchOptions,
    ) -> Result<Option<Record>> {
        self.ensure_ready(collection)?;
        debug!("{} -> read record from {}", self.config.name, collection);

        let result = self.driver.read_record(collection, query, options).await;
        self.observe("read record", collection, result)
    }

    pub async fn search_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        options: &SearchOptions,
    ) -> Result<Vec<Record>> {
        self.ensure_ready(collection)?;
        debug!("{} -> search records in {}", self.config.name, collection);

        let result = self.driver.search_records(collection, query, options).await;
        self.observe("search records", collection, result)
    }

    pub async fn update_record(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64> {
        self.ensure_ready(collection)?;
        debug!("{} -> update record in {}", self.config.name, collection);

        let result = self.driver.update_record(collection, query, data).await;
        self.observe("update record", collection, result)
    }

    pub async fn update_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64> {
        self.ensure_ready(collection)?;
        debug!("{} -> update records in {}", self.config.name, collection);

        let result = self.driver.update_records(collection, query, data).await;
        self.observe("update records", collection, result)
    }

    pub async fn delete_record(&self, collection: &str, query: &QueryStatement) -> Result<u64> {
        self.ensure_ready(collection)?;
        debug!("{} -> delete record from {}", self.config.name, collection);

        let result = self.driver.delete_record(collection, query).await;
        self.observe("delete record", collection, result)
    }

    pub async fn delete_records(&self, collection: &str, query: &QueryStatement) -> Result<u64> {
        self.ensure_ready(collection)?;
        debug!("{} -> delete records from {}", self.config.name, collection);

        let result = self.driver.delete_records(collection, query).await;
        self.observe("delete records", collection, result)
    }

    /// Remove every collection
    pub async fn clear(&self) -> Result<()> {
        if !self.driver.is_connected() {
            return Err(DatabaseError::NotConnected);
        }
        debug!("{} -> clear", self.config.name);

        let result = self.driver.clear().await;
        self.observe("clear", "*", result)
    }

    fn ensure_ready(&self, collection: &str) -> Result<()> {
        if !self.driver.is_connected() {
            return Err(DatabaseError::NotConnected);
        }

        if collection.trim().is_empty() {
            return Err(DatabaseError::InvalidCollection(collection.to_string()));
        }

        Ok(())
    }

    fn observe<T>(&self, operation: &str, collection: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!(
                "{} -> {} in {} failed: {}",
                self.config.name, operation, collection, e
            );
        }
        result
    }
}

impl Default for Database {
    /// Facade over a fresh [`MemoryDriver`]
    fn default() -> Self {
        Self::new(Arc::new(MemoryDriver::new()))
    }
}
