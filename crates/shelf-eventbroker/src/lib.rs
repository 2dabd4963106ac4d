//! # shelf-eventbroker
//!
//! Channel-scoped publish/subscribe.
//!
//! [`EventBroker`] checks the connection, serializes payloads to JSON and
//! drives its [`BrokerDriver`] through a
//! [`ConnectionManager`](shelf_connection::ConnectionManager).
//! [`MemoryBrokerDriver`] delivers in process.
//!
//! ## Example
//!
//! ```rust
//! use shelf_eventbroker::{Event, EventBroker, MemoryBrokerDriver};
//! use std::sync::Arc;
//!
//! # async fn example() -> shelf_eventbroker::Result<()> {
//! let broker = EventBroker::new(Arc::new(MemoryBrokerDriver::new()));
//! broker.connect().await?;
//!
//! let created = Event::new("pizzas", "created");
//! let mut subscription = broker.subscribe(&created).await?;
//!
//! broker.publish(&created, "Margherita").await?;
//! let name: Option<String> = subscription.recv_as().await?;
//! assert_eq!(name.as_deref(), Some("Margherita"));
//!
//! broker.disconnect().await?;
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(example()).unwrap();
//! ```

pub mod broker;
pub mod drivers;
pub mod error;
pub mod traits;

pub use broker::EventBroker;
pub use drivers::MemoryBrokerDriver;
pub use error::{EventBrokerError, Result};
pub use traits::{BrokerDriver, Event, Publication, Subscription, SubscriptionId};
