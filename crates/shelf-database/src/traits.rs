use crate::error::Result;
use async_trait::async_trait;
use shelf_query::{QueryStatement, Record, RecordId, SearchOptions};

/// A backend implementing connect/disconnect and record CRUD
///
/// Every data operation targets a named collection, created implicitly on
/// first write. Drivers return [`DatabaseError::NotConnected`] when used
/// while disconnected.
///
/// Update operations return the number of *matched* records, so a record
/// whose values do not change is still counted.
///
/// [`DatabaseError::NotConnected`]: crate::DatabaseError::NotConnected
#[async_trait]
pub trait Driver: Send + Sync {
    /// Backend name, used as the connection name in logs
    fn name(&self) -> &str;

    /// Liveness flag polled by the connection monitor
    fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    /// Insert a record and return its identity.
    ///
    /// A record without an identity gets a generated one.
    async fn create_record(&self, collection: &str, record: Record) -> Result<RecordId>;

    /// First record matching the statement, after sorting
    async fn read_record(
        &self,
        collection: &str,
        query: &QueryStatement,
        options: &SearchOptions,
    ) -> Result<Option<Record>>;

    /// All records matching the statement, sorted, paginated and projected
    async fn search_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        options: &SearchOptions,
    ) -> Result<Vec<Record>>;

    /// Merge `data` into the first matching record; returns 0 or 1
    async fn update_record(&self, collection: &str, query: &QueryStatement, data: Record)
        -> Result<u64>;

    /// Merge `data` into every matching record
    async fn update_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64>;

    /// Delete the first matching record; returns 0 or 1
    async fn delete_record(&self, collection: &str, query: &QueryStatement) -> Result<u64>;

    async fn delete_records(&self, collection: &str, query: &QueryStatement) -> Result<u64>;

    /// Remove every collection
    async fn clear(&self) -> Result<()>;
}
