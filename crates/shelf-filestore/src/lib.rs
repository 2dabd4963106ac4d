//! # shelf-filestore
//!
//! Binary files addressed by path.
//!
//! [`FileStore`] checks the connection and logs every operation;
//! connect/disconnect go through a
//! [`ConnectionManager`](shelf_connection::ConnectionManager).
//! [`MemoryFileDriver`] keeps files in process.
//!
//! ## Example
//!
//! ```rust
//! use shelf_filestore::{FileStore, MemoryFileDriver};
//! use std::sync::Arc;
//!
//! # async fn example() -> shelf_filestore::Result<()> {
//! let files = FileStore::new(Arc::new(MemoryFileDriver::new()));
//! files.connect().await?;
//!
//! files.write_file("menu.txt", "Margherita").await?;
//! assert_eq!(files.read_file("menu.txt").await?, "Margherita");
//!
//! files.disconnect().await?;
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(example()).unwrap();
//! ```

pub mod drivers;
pub mod error;
pub mod store;
pub mod traits;

pub use drivers::MemoryFileDriver;
pub use error::{FileStoreError, Result};
pub use store::FileStore;
pub use traits::FileDriver;
