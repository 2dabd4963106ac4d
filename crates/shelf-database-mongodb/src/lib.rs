//! MongoDB engine for shelf-database
//!
//! Query statements are translated into MongoDB filter documents and
//! evaluated by the server. The canonical `id` field is stored as `_id`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shelf_database::Database;
//! use shelf_database_mongodb::{MongoDbConfig, MongoDbDriver};
//! use shelf_query::{Operator, QueryStatement, SearchOptions, SortSpec};
//! use std::sync::Arc;
//!
//! # async fn example() -> shelf_database::Result<()> {
//! let config = MongoDbConfig::new("mongodb://localhost:27017", "shelf");
//! let database = Database::new(Arc::new(MongoDbDriver::new(config)));
//! database.connect().await?;
//!
//! let query = QueryStatement::field("size", Operator::GreaterThanOrEquals, 20);
//! let options = SearchOptions::new().with_sort(SortSpec::new().descending("size"));
//! let pizzas = database.search_records("pizzas", &query, &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod factory;
pub mod translator;

pub use config::MongoDbConfig;
pub use driver::MongoDbDriver;
pub use error::TranslationError;
pub use factory::{MongoDbDriverFactory, MONGODB_BACKEND};
