//! In-process record store
//!
//! Collections are vectors kept in insertion order. Statements are compiled
//! into predicates with [`shelf_query::predicate`] and evaluated against
//! every record of the collection.

use crate::error::{DatabaseError, Result};
use crate::traits::Driver;
use async_trait::async_trait;
use shelf_query::{ordering, predicate, QueryStatement, Record, RecordId, SearchOptions, Value, ID};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Identities are generated as a counter, zero-padded to this width
const ID_WIDTH: usize = 8;

/// Memory engine; all data is lost on disconnect
#[derive(Default)]
pub struct MemoryDriver {
    collections: RwLock<HashMap<String, Vec<Record>>>,
    connected: AtomicBool,
    last_id: AtomicU64,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::NotConnected)
        }
    }

    fn next_id(&self) -> RecordId {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{:0width$}", id, width = ID_WIDTH)
    }
}

fn merge(record: &mut Record, data: &Record) {
    for (field, value) in data {
        record.insert(field.clone(), value.clone());
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        self.collections.write().await.clear();
        Ok(())
    }

    async fn create_record(&self, collection: &str, mut record: Record) -> Result<RecordId> {
        self.ensure_connected()?;

        let id = match record.get(ID).and_then(Value::to_record_id) {
            Some(id) => id,
            None => self.next_id(),
        };
        // Stored in canonical form so the returned identity reads it back
        record.insert(ID.to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record);

        debug!("Created record {} in {}", id, collection);
        Ok(id)
    }

    async fn read_record(
        &self,
        collection: &str,
        query: &QueryStatement,
        options: &SearchOptions,
    ) -> Result<Option<Record>> {
        let records = self
            .search_records(collection, query, &options.single())
            .await?;

        Ok(records.into_iter().next())
    }

    async fn search_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        options: &SearchOptions,
    ) -> Result<Vec<Record>> {
        self.ensure_connected()?;
        let matches = predicate::compile(query)?;

        let collections = self.collections.read().await;
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<&Record> = records.iter().filter(|r| matches(r)).collect();

        if let Some(sort) = &options.sort {
            ordering::sort_records(&mut found, sort);
        }

        let fields = options.fields.as_deref();
        Ok(ordering::paginate(found, options.offset, options.limit)
            .into_iter()
            .map(|record| ordering::project(record, fields))
            .collect())
    }

    async fn update_record(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64> {
        self.ensure_connected()?;
        let matches = predicate::compile(query)?;

        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| matches(r)));

        match record {
            Some(record) => {
                merge(record, &data);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64> {
        self.ensure_connected()?;
        let matches = predicate::compile(query)?;

        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for record in records.iter_mut().filter(|r| matches(r)) {
            merge(record, &data);
            count += 1;
        }

        Ok(count)
    }

    async fn delete_record(&self, collection: &str, query: &QueryStatement) -> Result<u64> {
        self.ensure_connected()?;
        let matches = predicate::compile(query)?;

        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match records.iter().position(|r| matches(r)) {
            Some(index) => {
                records.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_records(&self, collection: &str, query: &QueryStatement) -> Result<u64> {
        self.ensure_connected()?;
        let matches = predicate::compile(query)?;

        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = records.len();
        records.retain(|r| !matches(r));

        Ok((before - records.len()) as u64)
    }

    async fn clear(&self) -> Result<()> {
        self.ensure_connected()?;
        self.collections.write().await.clear();
        Ok(())
    }
}
