use crate::config::MongoDbConfig;
use crate::driver::MongoDbDriver;
use shelf_database::{Driver, DriverConfig, DriverFactory, Result};
use std::sync::Arc;

/// Backend name of the MongoDB driver
pub const MONGODB_BACKEND: &str = "mongodb";

/// Registers the `mongodb` backend with a [`DriverRegistry`](shelf_database::DriverRegistry)
pub struct MongoDbDriverFactory;

impl DriverFactory for MongoDbDriverFactory {
    fn backend_type(&self) -> &'static str {
        MONGODB_BACKEND
    }

    fn create_driver(&self, config: DriverConfig) -> Result<Arc<dyn Driver>> {
        let config = MongoDbConfig::try_from(config)?;
        Ok(Arc::new(MongoDbDriver::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_database::{DatabaseError, DriverRegistry};

    #[tokio::test]
    async fn test_registry_creates_mongodb_driver() {
        let registry = DriverRegistry::with_defaults();
        registry.register_factory(Arc::new(MongoDbDriverFactory)).await;

        assert_eq!(registry.list_backends().await, vec!["memory", "mongodb"]);

        let config = DriverConfig::new(MONGODB_BACKEND)
            .with_connection_string("mongodb://localhost:27017")
            .with_database("shelf");
        let driver = registry.create_driver(config).await.unwrap();

        assert_eq!(driver.name(), "mongodb");
        assert!(!driver.is_connected());
    }

    #[tokio::test]
    async fn test_incomplete_config() {
        let registry = DriverRegistry::new();
        registry.register_factory(Arc::new(MongoDbDriverFactory)).await;

        let err = registry
            .create_driver(DriverConfig::new(MONGODB_BACKEND))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DatabaseError::InvalidConfiguration(_)));
    }
}
