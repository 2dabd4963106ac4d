use crate::error::{FileStoreError, Result};
use crate::traits::FileDriver;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process file store; all files are lost on disconnect
#[derive(Default)]
pub struct MemoryFileDriver {
    files: RwLock<HashMap<String, Bytes>>,
    connected: AtomicBool,
}

impl MemoryFileDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FileStoreError::NotConnected)
        }
    }
}

#[async_trait]
impl FileDriver for MemoryFileDriver {
    fn name(&self) -> &str {
        "memory-files"
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
        self.files.write().clear();
        Ok(())
    }

    async fn has_file(&self, path: &str) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.files.read().contains_key(path))
    }

    async fn write_file(&self, path: &str, data: Bytes) -> Result<()> {
        self.ensure_connected()?;
        self.files.write().insert(path.to_string(), data);
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<Bytes> {
        self.ensure_connected()?;
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| FileStoreError::file_not_found(path))
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.ensure_connected()?;
        self.files
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FileStoreError::file_not_found(path))
    }

    async fn clear(&self) -> Result<()> {
        self.ensure_connected()?;
        self.files.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disconnect_drops_files() {
        let driver = MemoryFileDriver::new();
        driver.connect().await.unwrap();
        driver
            .write_file("menu.txt", Bytes::from_static(b"Margherita"))
            .await
            .unwrap();

        driver.disconnect().await.unwrap();
        driver.connect().await.unwrap();

        assert!(!driver.has_file("menu.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let driver = MemoryFileDriver::new();
        driver.connect().await.unwrap();

        let err = driver.delete_file("missing.txt").await.unwrap_err();
        assert_eq!(err.to_string(), "File not found: missing.txt");
    }
}
