//! MongoDB document-store engine
//!
//! Statements are pushed down as native filters (see [`crate::translator`]);
//! nothing is filtered in process. Liveness follows the driver's server
//! heartbeats so the connection monitor notices a lost server.

use crate::config::MongoDbConfig;
use crate::translator::{
    translate_document, translate_projection, translate_query, translate_record, translate_sort,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::event::{sdam::SdamEvent, EventHandler};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use shelf_database::{DatabaseError, Driver, Result};
use shelf_query::{QueryStatement, Record, RecordId, SearchOptions, Value, ID};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

struct Connection {
    client: Client,
    database: Database,
}

pub struct MongoDbDriver {
    config: MongoDbConfig,
    connection: RwLock<Option<Connection>>,
    alive: Arc<AtomicBool>,
}

impl MongoDbDriver {
    pub fn new(config: MongoDbConfig) -> Self {
        Self {
            config,
            connection: RwLock::new(None),
            alive: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn collection(&self, name: &str) -> Result<Collection<Document>> {
        let connection = self.connection.read().await;
        let connection = connection.as_ref().ok_or(DatabaseError::NotConnected)?;

        Ok(connection.database.collection::<Document>(name))
    }

    fn heartbeat_handler(&self) -> EventHandler<SdamEvent> {
        let alive = self.alive.clone();

        EventHandler::callback(move |event: SdamEvent| match event {
            SdamEvent::ServerHeartbeatSucceeded(_) => alive.store(true, Ordering::SeqCst),
            SdamEvent::ServerHeartbeatFailed(event) => {
                warn!("MongoDB heartbeat failed: {}", event.failure);
                alive.store(false, Ordering::SeqCst);
            }
            _ => {}
        })
    }
}

fn failed(operation: &'static str) -> impl FnOnce(mongodb::error::Error) -> DatabaseError {
    move |e| DatabaseError::operation_failed(operation, e)
}

#[async_trait]
impl Driver for MongoDbDriver {
    fn name(&self) -> &str {
        "mongodb"
    }

    fn is_connected(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        debug!("Connecting to MongoDB database {}", self.config.database_name);

        let mut options = ClientOptions::parse(&self.config.connection_string)
            .await
            .map_err(failed("connect"))?;
        options.sdam_event_handler = Some(self.heartbeat_handler());

        let client = Client::with_options(options).map_err(failed("connect"))?;
        let database = client.database(&self.config.database_name);

        // The client connects lazily; make sure a server answers
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(failed("connect"))?;

        *self.connection.write().await = Some(Connection { client, database });
        self.alive.store(true, Ordering::SeqCst);

        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let connection = self
            .connection
            .write()
            .await
            .take()
            .ok_or(DatabaseError::NotConnected)?;

        connection.client.shutdown().await;
        self.alive.store(false, Ordering::SeqCst);

        debug!("Disconnected from MongoDB database {}", self.config.database_name);
        Ok(())
    }

    async fn create_record(&self, collection: &str, mut record: Record) -> Result<RecordId> {
        let collection = self.collection(collection).await?;

        let id = record
            .get(ID)
            .and_then(Value::to_record_id)
            .unwrap_or_else(|| ObjectId::new().to_hex());
        // Stored as a string so reading back by the returned identity matches
        record.insert(ID.to_string(), Value::String(id.clone()));

        collection
            .insert_one(translate_record(record))
            .await
            .map_err(failed("insert"))?;

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
        let collection = self.collection(collection).await?;
        let filter = translate_query(query)?;

        // MongoDB reads a zero limit as "no limit"
        if options.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut find = collection.find(filter);

        if let Some(sort) = options.sort.as_ref().filter(|sort| !sort.is_empty()) {
            find = find.sort(translate_sort(sort));
        }
        if let Some(fields) = &options.fields {
            find = find.projection(translate_projection(fields));
        }
        if let Some(offset) = options.offset {
            find = find.skip(offset as u64);
        }
        if let Some(limit) = options.limit {
            find = find.limit(limit as i64);
        }

        let documents: Vec<Document> = find
            .await
            .map_err(failed("find"))?
            .try_collect()
            .await
            .map_err(failed("find"))?;

        let fields = options.fields.as_deref();
        Ok(documents
            .into_iter()
            .map(|document| translate_document(document, fields))
            .collect())
    }

    async fn update_record(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64> {
        let collection = self.collection(collection).await?;
        let filter = translate_query(query)?;

        // An empty $set is rejected by the server
        if data.is_empty() {
            let found = collection.find_one(filter).await.map_err(failed("find"))?;
            return Ok(u64::from(found.is_some()));
        }

        let result = collection
            .update_one(filter, doc! { "$set": translate_record(data) })
            .await
            .map_err(failed("update"))?;

        Ok(result.matched_count)
    }

    async fn update_records(
        &self,
        collection: &str,
        query: &QueryStatement,
        data: Record,
    ) -> Result<u64> {
        let collection = self.collection(collection).await?;
        let filter = translate_query(query)?;

        if data.is_empty() {
            return collection
                .count_documents(filter)
                .await
                .map_err(failed("count"));
        }

        let result = collection
            .update_many(filter, doc! { "$set": translate_record(data) })
            .await
            .map_err(failed("update"))?;

        Ok(result.matched_count)
    }

    async fn delete_record(&self, collection: &str, query: &QueryStatement) -> Result<u64> {
        let collection = self.collection(collection).await?;
        let filter = translate_query(query)?;

        let result = collection
            .delete_one(filter)
            .await
            .map_err(failed("delete"))?;

        Ok(result.deleted_count)
    }

    async fn delete_records(&self, collection: &str, query: &QueryStatement) -> Result<u64> {
        let collection = self.collection(collection).await?;
        let filter = translate_query(query)?;

        let result = collection
            .delete_many(filter)
            .await
            .map_err(failed("delete"))?;

        Ok(result.deleted_count)
    }

    async fn clear(&self) -> Result<()> {
        let database = {
            let connection = self.connection.read().await;
            let connection = connection.as_ref().ok_or(DatabaseError::NotConnected)?;
            connection.database.clone()
        };

        database.drop().await.map_err(failed("drop"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> MongoDbDriver {
        MongoDbDriver::new(MongoDbConfig::new("mongodb://localhost:27017", "shelf"))
    }

    #[tokio::test]
    async fn test_not_connected() {
        let driver = driver();

        assert!(!driver.is_connected());
        assert!(matches!(
            driver
                .search_records("pizzas", &QueryStatement::all(), &SearchOptions::new())
                .await,
            Err(DatabaseError::NotConnected)
        ));
        assert!(matches!(driver.disconnect().await, Err(DatabaseError::NotConnected)));
        assert!(matches!(driver.clear().await, Err(DatabaseError::NotConnected)));
    }

    #[tokio::test]
    async fn test_invalid_connection_string() {
        let driver = MongoDbDriver::new(MongoDbConfig::new("not-a-uri", "shelf"));

        let err = driver.connect().await.unwrap_err();
        assert!(matches!(err, DatabaseError::OperationFailed { ref operation, .. } if operation == "connect"));
        assert!(!driver.is_connected());
    }
}
