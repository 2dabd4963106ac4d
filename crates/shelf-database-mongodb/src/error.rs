use shelf_database::DatabaseError;
use shelf_query::QueryError;
use thiserror::Error;

/// A statement that cannot be expressed as a MongoDB filter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error(transparent)]
    InvalidOperand(#[from] QueryError),
}

impl From<TranslationError> for DatabaseError {
    fn from(error: TranslationError) -> Self {
        DatabaseError::translation(error.to_string())
    }
}
