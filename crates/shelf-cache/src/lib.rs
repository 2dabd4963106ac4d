//! # shelf-cache
//!
//! Key/value cache with per-item time to live.
//!
//! [`CacheStore`] is the facade: it serializes values to JSON, validates
//! TTLs and drives the backend through a
//! [`ConnectionManager`](shelf_connection::ConnectionManager).
//! [`MemoryCacheDriver`] keeps items in process.
//!
//! ## Example
//!
//! ```rust
//! use shelf_cache::{CacheStore, MemoryCacheConfig, MemoryCacheDriver};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> shelf_cache::Result<()> {
//! let driver = MemoryCacheDriver::new(MemoryCacheConfig::default())?;
//! let cache = CacheStore::new(Arc::new(driver));
//! cache.connect().await?;
//!
//! cache.set("greeting", "hello", Some(Duration::from_secs(5))).await?;
//! let greeting: Option<String> = cache.get("greeting").await?;
//! assert_eq!(greeting.as_deref(), Some("hello"));
//!
//! cache.disconnect().await?;
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(example()).unwrap();
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod store;
pub mod traits;

pub use config::{MemoryCacheConfig, DEFAULT_CLEANUP_INTERVAL_MS, DEFAULT_TTL_MS};
pub use drivers::MemoryCacheDriver;
pub use error::{CacheError, Result};
pub use store::CacheStore;
pub use traits::{CacheDriver, CacheItem};
