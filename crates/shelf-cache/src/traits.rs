use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A cached value with its key and optional time to live
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem {
    pub key: String,
    pub value: serde_json::Value,
    /// `None` uses the driver's default
    pub ttl: Option<Duration>,
}

/// Storage backend of a [`CacheStore`](crate::CacheStore)
#[async_trait]
pub trait CacheDriver: Send + Sync {
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    /// Live item for `key`; expired items are never returned
    async fn get(&self, key: &str) -> Result<Option<CacheItem>>;

    async fn set(&self, item: CacheItem) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
