use shelf_connection::ConnectionError;
use shelf_query::QueryError;
use thiserror::Error;

/// Unified error type for the store facade and its drivers
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A data operation was attempted while the driver is not connected
    #[error("Database not connected")]
    NotConnected,

    /// No driver is registered for the requested backend
    #[error("No database driver for backend: {0}")]
    NoDriver(String),

    /// Collection names must be non-empty
    #[error("Invalid collection name: {0:?}")]
    InvalidCollection(String),

    /// A statement could not be expressed in the backend's native filter language
    #[error("Translation failed: {0}")]
    Translation(String),

    /// A statement could not be compiled for in-process evaluation
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The backend rejected or failed an operation
    #[error("{operation} failed: {cause}")]
    OperationFailed { operation: String, cause: String },

    /// Connect or disconnect failed
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Invalid driver configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DatabaseError {
    /// Wrap a backend error, keeping its full cause chain as text
    pub fn operation_failed(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        DatabaseError::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }

    pub fn no_driver(backend: impl Into<String>) -> Self {
        DatabaseError::NoDriver(backend.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        DatabaseError::InvalidConfiguration(msg.into())
    }

    pub fn translation(msg: impl Into<String>) -> Self {
        DatabaseError::Translation(msg.into())
    }
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_query::Operator;

    #[test]
    fn test_error_messages() {
        assert_eq!(DatabaseError::NotConnected.to_string(), "Database not connected");
        assert_eq!(
            DatabaseError::operation_failed("insert", "duplicate key").to_string(),
            "insert failed: duplicate key"
        );
        assert_eq!(
            DatabaseError::InvalidCollection(String::new()).to_string(),
            "Invalid collection name: \"\""
        );
    }

    #[test]
    fn test_query_error_conversion() {
        let err: DatabaseError =
            QueryError::invalid_operand("size", Operator::In, "list", "int").into();
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
