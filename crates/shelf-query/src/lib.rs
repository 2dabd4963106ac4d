//! # shelf-query
//!
//! Backend-agnostic query algebra for schemaless record collections.
//!
//! A [`QueryStatement`] describes a filter as plain data: per-field operator
//! expressions, combined with `AND`/`OR`. A [`SortSpec`] gives an ordered
//! tie-break chain and [`SearchOptions`] adds projection and pagination.
//!
//! Backends evaluate statements in one of two ways:
//!
//! - **In process**: [`predicate::compile`] turns a statement into a closure
//!   tree tested against each record; [`ordering`] sorts, pages and projects
//!   the matches.
//! - **Push-down**: a backend crate translates the statement into its native
//!   filter language (see `shelf-database-mongodb`).
//!
//! ## Example
//!
//! ```rust
//! use shelf_query::{predicate, record, Operator, QueryStatement};
//!
//! # fn example() -> shelf_query::Result<()> {
//! let statement = QueryStatement::or(vec![
//!     QueryStatement::field("name", Operator::StartsWith, "Marg"),
//!     QueryStatement::field("size", Operator::GreaterThanOrEquals, 30),
//! ]);
//!
//! let matches = predicate::compile(&statement)?;
//!
//! assert!(matches(&record! { "name" => "Margherita", "size" => 15 }));
//! assert!(!matches(&record! { "name" => "Calzone", "size" => 20 }));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod error;
pub mod ordering;
pub mod predicate;
pub mod types;
pub mod value;

// Re-export commonly used items
pub use error::{QueryError, Result};
pub use predicate::Predicate;
pub use types::{
    Expression, ExpressionStatement, Operator, QueryStatement, SearchOptions, SortDirection,
    SortSpec,
};
pub use value::{Record, RecordId, Value, ID};
