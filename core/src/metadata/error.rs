use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0:?}")]
    ConnectionError(#[from] r2d2::Error),

    #[error("Query error: {0:?}")]
    QueryError(#[from] diesel::result::Error),

    #[error("Failed to convert JSON: {0:?}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unique violation: {0}")]
    UniqueViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DatabaseError {
    /// Lifts a diesel unique-constraint failure into [`DatabaseError::UniqueViolation`].
    pub fn from_insert(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => DatabaseError::UniqueViolation(info.message().to_string()),
            e => DatabaseError::QueryError(e),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatabaseError::QueryError(diesel::result::Error::NotFound)
        )
    }
}
