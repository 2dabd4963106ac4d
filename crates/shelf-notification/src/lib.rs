//! # shelf-notification
//!
//! Notifications to subscribed recipients.
//!
//! [`NotificationService`] checks the connection and drives its
//! [`NotificationDriver`] through a
//! [`ConnectionManager`](shelf_connection::ConnectionManager).
//! [`MemoryNotificationDriver`] records what was sent instead of delivering it.
//!
//! ## Example
//!
//! ```rust
//! use shelf_notification::{MemoryNotificationDriver, NotificationService};
//! use std::sync::Arc;
//!
//! # async fn example() -> shelf_notification::Result<()> {
//! let driver = Arc::new(MemoryNotificationDriver::new());
//! let notifications = NotificationService::new(driver.clone());
//! notifications.connect().await?;
//!
//! notifications.subscribe("alice", &()).await?;
//! notifications.send_notification("alice", "Order", "Your pizza is ready").await?;
//! assert_eq!(driver.sent("alice").map(|sent| sent.len()), Some(1));
//!
//! notifications.disconnect().await?;
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(example()).unwrap();
//! ```

pub mod drivers;
pub mod error;
pub mod service;
pub mod traits;

pub use drivers::MemoryNotificationDriver;
pub use error::{NotificationError, Result};
pub use service::NotificationService;
pub use traits::{Notification, NotificationDriver};
