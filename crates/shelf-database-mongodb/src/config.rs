use serde::{Deserialize, Serialize};
use shelf_database::{DatabaseError, DriverConfig, Result};

/// Connection settings for [`MongoDbDriver`](crate::MongoDbDriver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoDbConfig {
    /// e.g. `mongodb://localhost:27017`
    pub connection_string: String,
    pub database_name: String,
}

impl MongoDbConfig {
    pub fn new(connection_string: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database_name: database_name.into(),
        }
    }
}

impl TryFrom<DriverConfig> for MongoDbConfig {
    type Error = DatabaseError;

    fn try_from(config: DriverConfig) -> Result<Self> {
        let connection_string = config.connection_string.ok_or_else(|| {
            DatabaseError::invalid_configuration("mongodb requires a connection string")
        })?;
        let database_name = config
            .database
            .ok_or_else(|| DatabaseError::invalid_configuration("mongodb requires a database name"))?;

        Ok(Self::new(connection_string, database_name))
    }
}
