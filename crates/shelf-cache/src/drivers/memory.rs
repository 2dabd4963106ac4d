use crate::config::MemoryCacheConfig;
use crate::error::{CacheError, Result};
use crate::traits::{CacheDriver, CacheItem};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct Entry {
    item: CacheItem,
    /// `None` when the TTL reaches past what the clock can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

type Entries = Mutex<HashMap<String, Entry>>;

/// In-process cache with lazy expiry and a periodic sweep
///
/// The sweep runs while connected. Disconnecting drops every item.
pub struct MemoryCacheDriver {
    entries: Arc<Entries>,
    connected: AtomicBool,
    default_ttl: Duration,
    cleanup_interval: Duration,
    cleanup: Mutex<Option<CancellationToken>>,
}

impl MemoryCacheDriver {
    pub fn new(config: MemoryCacheConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            connected: AtomicBool::new(false),
            default_ttl: config.default_ttl(),
            cleanup_interval: config.cleanup_interval(),
            cleanup: Mutex::new(None),
        })
    }

    /// Number of stored items, expired ones included until swept
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::NotConnected)
        }
    }

    fn start_cleanup(&self) {
        let mut cleanup = self.cleanup.lock();
        if cleanup.is_some() {
            return;
        }

        let token = CancellationToken::new();
        tokio::spawn(sweep(
            Arc::downgrade(&self.entries),
            token.clone(),
            self.cleanup_interval,
        ));
        *cleanup = Some(token);
    }

    fn stop_cleanup(&self) {
        if let Some(token) = self.cleanup.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for MemoryCacheDriver {
    fn drop(&mut self) {
        self.stop_cleanup();
    }
}

async fn sweep(entries: Weak<Entries>, token: CancellationToken, interval: Duration) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        let Some(entries) = entries.upgrade() else {
            break;
        };

        let now = Instant::now();
        let mut entries = entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - entries.len();
        if removed > 0 {
            debug!("Removed {} expired cache items", removed);
        }
    }
}

#[async_trait]
impl CacheDriver for MemoryCacheDriver {
    fn name(&self) -> &str {
        "memory-cache"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        if self.connected.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.start_cleanup();
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        self.stop_cleanup();
        self.entries.lock().clear();
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CacheItem>> {
        self.ensure_connected()?;

        let now = Instant::now();
        let mut entries = self.entries.lock();

        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|entry| entry.item.clone()))
    }

    async fn set(&self, item: CacheItem) -> Result<()> {
        self.ensure_connected()?;

        let ttl = item.ttl.unwrap_or(self.default_ttl);
        let entry = Entry {
            expires_at: Instant::now().checked_add(ttl),
            item,
        };

        self.entries.lock().insert(entry.item.key.clone(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_connected()?;
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.ensure_connected()?;
        self.entries.lock().clear();
        Ok(())
    }
}
