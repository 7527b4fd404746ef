//! Shared error mapping for the SQLite persistence layer

use application::error::ApplicationError;
use tokio::task::JoinError;

use super::connection::DatabaseError;

impl From<DatabaseError> for ApplicationError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            other => Self::Internal(format!("Database error: {other}")),
        }
    }
}

/// Map a pool checkout failure to an application-layer error
pub(crate) fn map_pool_error(e: r2d2::Error) -> ApplicationError {
    DatabaseError::Pool(e).into()
}

/// Map a SQLite error to an application-layer error
pub(crate) fn map_sqlite_error(e: rusqlite::Error) -> ApplicationError {
    DatabaseError::Sqlite(e).into()
}

/// Map a failed blocking task to an application-layer error
pub(crate) fn map_join_error(e: JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Database task failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_its_kind() {
        let err: ApplicationError = DatabaseError::NotFound("users/7".to_string()).into();
        assert!(matches!(err, ApplicationError::NotFound(ref what) if what == "users/7"));
    }

    #[test]
    fn sqlite_errors_become_internal() {
        let err = map_sqlite_error(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, ApplicationError::Internal(ref msg) if msg.starts_with("Database error")));
    }
}
