//! Store error type shared by every [`crate::store::Store`] implementation.

/// Failure modes of a store operation.
///
/// `NotFound` and `Conflict` are produced by both backends; `Database`
/// only by the PostgreSQL one. The conversion from [`sqlx::Error`]
/// classifies row-not-found and unique-violation cases so callers match
/// on store semantics instead of driver internals.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Row not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                Self::Conflict(db.constraint().unwrap_or("unique constraint").to_string())
            }
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound));
    }
}
