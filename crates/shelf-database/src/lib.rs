//! # shelf-database
//!
//! Record storage behind a single facade.
//!
//! - [`Driver`] is the capability set every backend implements: connect,
//!   disconnect and record CRUD driven by [`shelf_query`] statements.
//! - [`MemoryDriver`] evaluates statements in process.
//! - [`Database`] binds one driver to a lifecycle controller, checks the
//!   connection before each data operation and logs failures.
//! - [`DriverRegistry`] picks a driver by backend name during process wiring.
//!
//! ## Example
//!
//! ```rust
//! use shelf_database::Database;
//! use shelf_query::{record, Operator, QueryStatement, SearchOptions};
//!
//! # async fn example() -> shelf_database::Result<()> {
//! let database = Database::default();
//! database.connect().await?;
//!
//! database.create_record("pizzas", record! { "name" => "Margherita", "size" => 15 }).await?;
//!
//! let query = QueryStatement::field("name", Operator::StartsWith, "Marg");
//! let found = database.search_records("pizzas", &query, &SearchOptions::new()).await?;
//! assert_eq!(found.len(), 1);
//!
//! database.disconnect().await?;
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(example()).unwrap();
//! ```

pub mod database;
pub mod drivers;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export commonly used items
pub use database::Database;
pub use drivers::MemoryDriver;
pub use error::{DatabaseError, Result};
pub use registry::{DriverConfig, DriverFactory, DriverRegistry, MemoryDriverFactory, MEMORY_BACKEND};
pub use traits::Driver;
