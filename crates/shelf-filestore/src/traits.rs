use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Storage backend of a [`FileStore`](crate::FileStore)
#[async_trait]
pub trait FileDriver: Send + Sync {
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    async fn has_file(&self, path: &str) -> Result<bool>;

    /// Create or replace the file at `path`
    async fn write_file(&self, path: &str, data: Bytes) -> Result<()>;

    /// `FileNotFound` when nothing is stored at `path`
    async fn read_file(&self, path: &str) -> Result<Bytes>;

    /// `FileNotFound` when nothing is stored at `path`
    async fn delete_file(&self, path: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
