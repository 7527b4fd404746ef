//! SQLite user store implementation
//!
//! Implements the `UserStore` port using SQLite.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{NewUser, UserStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{EmailAddress, User, UserId};
use rusqlite::{ErrorCode, OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::{
    connection::ConnectionPool,
    error::{map_join_error, map_pool_error, map_sqlite_error},
};

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, is_active, is_superuser, date_joined";

/// SQLite-based user store
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserStore {
    /// Create a new SQLite user store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn conversion_error<E>(column: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}

/// Convert a database row to a `User`
fn row_to_user(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let email: String = row.get(1)?;
    let date_joined: String = row.get(7)?;

    Ok(User {
        id: UserId::new(id).map_err(|e| conversion_error(0, e))?,
        email: EmailAddress::new(email).map_err(|e| conversion_error(1, e))?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        password_hash: row.get(4)?,
        is_active: row.get(5)?,
        is_superuser: row.get(6)?,
        date_joined: DateTime::parse_from_rfc3339(&date_joined)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc)),
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn email_taken(email: &EmailAddress) -> ApplicationError {
    ApplicationError::Conflict(format!("A user with email {email} already exists"))
}

#[async_trait]
impl UserStore for SqliteUserStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let mut stmt = conn
                .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .map_err(map_sqlite_error)?;
            let users = stmt
                .query_map([], row_to_user)
                .map_err(map_sqlite_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_sqlite_error)?;

            debug!(count = users.len(), "Listed users");
            Ok(users)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn get(&self, id: UserId) -> Result<Option<User>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id.as_i64()],
                row_to_user,
            )
            .optional()
            .map_err(map_sqlite_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let email = email.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                [&email],
                row_to_user,
            )
            .optional()
            .map_err(map_sqlite_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, user), fields(superuser = user.is_superuser))]
    async fn insert(&self, user: NewUser) -> Result<User, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let date_joined = Utc::now();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let result = conn.execute(
                "INSERT INTO users (email, first_name, last_name, password_hash, is_active, is_superuser, date_joined)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.email.as_str(),
                    user.first_name,
                    user.last_name,
                    user.password_hash,
                    user.is_active,
                    user.is_superuser,
                    date_joined.to_rfc3339(),
                ],
            );
            match result {
                Ok(_) => {},
                Err(e) if is_unique_violation(&e) => return Err(email_taken(&user.email)),
                Err(e) => return Err(map_sqlite_error(e)),
            }

            let id = UserId::new(conn.last_insert_rowid())?;
            debug!(user_id = %id, "Inserted user");
            Ok(User {
                id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                password_hash: user.password_hash,
                is_active: user.is_active,
                is_superuser: user.is_superuser,
                date_joined,
            })
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user = user.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let result = conn.execute(
                "UPDATE users SET email = ?2, first_name = ?3, last_name = ?4, password_hash = ?5,
                     is_active = ?6, is_superuser = ?7
                 WHERE id = ?1",
                params![
                    user.id.as_i64(),
                    user.email.as_str(),
                    user.first_name,
                    user.last_name,
                    user.password_hash,
                    user.is_active,
                    user.is_superuser,
                ],
            );
            match result {
                Ok(0) => Err(ApplicationError::NotFound(format!("User {}", user.id))),
                Ok(_) => {
                    debug!("Updated user");
                    Ok(())
                },
                Err(e) if is_unique_violation(&e) => Err(email_taken(&user.email)),
                Err(e) => Err(map_sqlite_error(e)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self) -> Result<u64, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                .map_err(map_sqlite_error)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, persistence::create_pool};

    fn create_test_store() -> SqliteUserStore {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        };
        SqliteUserStore::new(Arc::new(create_pool(&config).unwrap()))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: EmailAddress::new(email).unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            is_active: true,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = create_test_store();
        let first = store.insert(new_user("a@example.com")).await.unwrap();
        let second = store.insert(new_user("b@example.com")).await.unwrap();
        assert_eq!(first.id.as_i64(), 1);
        assert_eq!(second.id.as_i64(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = create_test_store();
        store.insert(new_user("a@example.com")).await.unwrap();
        let err = store.insert(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn get_and_find_by_email_roundtrip() {
        let store = create_test_store();
        let inserted = store.insert(new_user("ada@example.com")).await.unwrap();

        let by_id = store.get(inserted.id).await.unwrap().unwrap();
        assert_eq!(by_id.email.as_str(), "ada@example.com");
        assert_eq!(by_id.password_hash, "$argon2id$v=19$stub");

        let email = EmailAddress::new("ADA@example.com").unwrap();
        let by_email = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(by_email.id, inserted.id);
    }

    #[tokio::test]
    async fn get_missing_user_returns_none() {
        let store = create_test_store();
        assert!(store.get(UserId::new(42).unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_persists_changes() {
        let store = create_test_store();
        let mut user = store.insert(new_user("a@example.com")).await.unwrap();
        user.first_name = "Grace".to_string();
        user.is_active = false;
        store.update(&user).await.unwrap();

        let reloaded = store.get(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.first_name, "Grace");
        assert!(!reloaded.is_active);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_a_conflict() {
        let store = create_test_store();
        store.insert(new_user("a@example.com")).await.unwrap();
        let mut second = store.insert(new_user("b@example.com")).await.unwrap();
        second.email = EmailAddress::new("a@example.com").unwrap();
        let err = store.update(&second).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let store = create_test_store();
        let mut user = store.insert(new_user("a@example.com")).await.unwrap();
        user.id = UserId::new(99).unwrap();
        let err = store.update(&user).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = create_test_store();
        store.insert(new_user("z@example.com")).await.unwrap();
        store.insert(new_user("a@example.com")).await.unwrap();
        let emails: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email.to_string())
            .collect();
        assert_eq!(emails, vec!["z@example.com", "a@example.com"]);
    }
}
