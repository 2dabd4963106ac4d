//! # shelf-connection
//!
//! Connection lifecycle controller shared by the database and cache stores.
//!
//! A [`ConnectionManager`] wraps anything implementing [`Connectable`] and
//! gives it:
//!
//! - an explicit [`ConnectionState`] machine,
//! - deduplication of concurrent `connect()` / `disconnect()` calls,
//! - a background monitor that reconnects when the resource reports it is
//!   down, polled every [`ConnectionConfig::monitoring_interval`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use shelf_connection::{ConnectionConfig, ConnectionManager, Connectable};
//! use std::sync::Arc;
//!
//! # async fn example(resource: Arc<dyn Connectable>) -> shelf_connection::Result<()> {
//! let manager = ConnectionManager::new(ConnectionConfig::new("database"), resource);
//!
//! manager.connect().await?;
//! // ... use the resource ...
//! manager.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod state;
pub mod traits;

// Re-export commonly used items
pub use config::{ConnectFailurePolicy, ConnectionConfig, DEFAULT_MONITORING_INTERVAL_MS};
pub use error::{ConnectionError, Result};
pub use manager::ConnectionManager;
pub use state::ConnectionState;
pub use traits::Connectable;
