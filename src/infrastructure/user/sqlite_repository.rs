//! SQLite user repository implementation

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::{FromRow, Sqlite, Transaction};
use tracing::warn;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{User, UserFields, UserId, UserRepository};
use crate::domain::DomainError;

/// SQLite implementation of UserRepository
///
/// Each write runs in its own transaction. When a statement fails the
/// transaction is rolled back before the error is returned.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::new(row.id), row.username, row.email)
    }
}

impl SqliteUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn begin(&self, action: &str) -> Result<Transaction<'static, Sqlite>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| storage_error(action, e))
    }
}

fn storage_error(action: &str, err: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to {}: {}", action, err))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Roll back explicitly so the connection goes back to the pool clean
async fn rollback(tx: Transaction<'static, Sqlite>, action: &str) {
    if let Err(e) = tx.rollback().await {
        warn!(action, error = %e, "Failed to roll back transaction");
    }
}

async fn commit(tx: Transaction<'static, Sqlite>, action: &str) -> Result<(), DomainError> {
    tx.commit().await.map_err(|e| storage_error(action, e))
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, username, email FROM users WHERE id = ?")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("get user", e))?;

        Ok(row.map(User::from))
    }

    async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| storage_error("list users", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| storage_error("count users", e))?;

        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email FROM users ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(to_i64(request.per_page()))
        .bind(to_i64(request.offset()))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| storage_error("list users", e))?;

        let items = rows.into_iter().map(User::from).collect();

        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), request))
    }

    async fn create(&self, fields: &UserFields) -> Result<User, DomainError> {
        let mut tx = self.begin("create user").await?;

        let result = sqlx::query("INSERT INTO users (username, email) VALUES (?, ?)")
            .bind(&fields.username)
            .bind(&fields.email)
            .execute(&mut *tx)
            .await;

        let inserted = match result {
            Ok(inserted) => inserted,
            Err(e) => {
                rollback(tx, "create user").await;
                return Err(storage_error("create user", e));
            }
        };

        commit(tx, "commit new user").await?;

        Ok(fields
            .clone()
            .into_user(UserId::new(inserted.last_insert_rowid())))
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> Result<Option<User>, DomainError> {
        let mut tx = self.begin("update user").await?;

        let result = sqlx::query("UPDATE users SET username = ?, email = ? WHERE id = ?")
            .bind(&fields.username)
            .bind(&fields.email)
            .bind(id.value())
            .execute(&mut *tx)
            .await;

        match result {
            Ok(updated) if updated.rows_affected() == 0 => {
                rollback(tx, "update user").await;
                Ok(None)
            }
            Ok(_) => {
                commit(tx, "commit user update").await?;
                Ok(Some(fields.clone().into_user(id)))
            }
            Err(e) => {
                rollback(tx, "update user").await;
                Err(storage_error("update user", e))
            }
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut tx = self.begin("delete user").await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.value())
            .execute(&mut *tx)
            .await;

        match result {
            Ok(deleted) if deleted.rows_affected() == 0 => {
                rollback(tx, "delete user").await;
                Ok(false)
            }
            Ok(_) => {
                commit(tx, "commit user deletion").await?;
                Ok(true)
            }
            Err(e) => {
                rollback(tx, "delete user").await;
                Err(storage_error("delete user", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_support::{allow_writes, memory_pool, reject_writes};

    fn fields(name: &str) -> UserFields {
        UserFields::new(name, format!("{}@example.com", name))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = SqliteUserRepository::new(memory_pool().await);

        let user = repo.create(&fields("alice")).await.unwrap();
        assert_eq!(user.id().value(), 1);
        assert_eq!(user.username(), "alice");

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved, user);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let repo = SqliteUserRepository::new(memory_pool().await);
        assert!(repo.get(UserId::new(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update() {
        let repo = SqliteUserRepository::new(memory_pool().await);
        let user = repo.create(&fields("alice")).await.unwrap();

        let updated = repo
            .update(user.id(), &UserFields::new("alicia", "alicia@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id(), user.id());

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.username(), "alicia");
        assert_eq!(retrieved.email(), "alicia@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_leaves_connection_usable() {
        let repo = SqliteUserRepository::new(memory_pool().await);

        assert!(repo.update(UserId::new(9), &fields("ghost")).await.unwrap().is_none());

        // The rolled-back transaction must not hold the only connection
        let user = repo.create(&fields("bob")).await.unwrap();
        assert!(repo.get(user.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = SqliteUserRepository::new(memory_pool().await);
        let user = repo.create(&fields("alice")).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(!repo.delete(user.id()).await.unwrap());
        assert!(repo.get(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let repo = SqliteUserRepository::new(memory_pool().await);
        for name in ["a", "b", "c"] {
            repo.create(&fields(name)).await.unwrap();
        }

        let page = repo.list(PageRequest::new(1, 1)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username(), "a");
        assert_eq!(page.total, 3);
        assert_eq!(page.pages(), 3);

        let page = repo.list(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username(), "c");

        let page = repo.list(PageRequest::new(5, 1)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.current_page(), 5);
    }

    #[tokio::test]
    async fn test_closed_pool_is_storage_error() {
        let pool = memory_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());
        pool.close().await;

        let result = repo.create(&fields("alice")).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));

        let result = repo.get(UserId::new(1)).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_failed_insert_is_rolled_back() {
        let pool = memory_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());
        repo.create(&fields("a")).await.unwrap();
        reject_writes(&pool, "INSERT").await;

        let result = repo.create(&fields("b")).await;
        match result {
            Err(DomainError::Storage { message }) => assert!(message.contains("write rejected")),
            other => panic!("expected storage error, got {:?}", other),
        }

        let page = repo.list(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].username(), "a");

        allow_writes(&pool, "INSERT").await;
        let user = repo.create(&fields("c")).await.unwrap();
        assert_eq!(user.username(), "c");
    }

    #[tokio::test]
    async fn test_failed_update_is_rolled_back() {
        let pool = memory_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());
        let user = repo.create(&fields("a")).await.unwrap();
        reject_writes(&pool, "UPDATE").await;

        let result = repo.update(user.id(), &fields("b")).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.username(), "a");
        assert_eq!(retrieved.email(), "a@example.com");

        // The single pooled connection is free again once the trigger is gone
        allow_writes(&pool, "UPDATE").await;
        let updated = repo.update(user.id(), &fields("b")).await.unwrap().unwrap();
        assert_eq!(updated.username(), "b");
    }

    #[tokio::test]
    async fn test_failed_delete_is_rolled_back() {
        let pool = memory_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());
        let user = repo.create(&fields("a")).await.unwrap();
        reject_writes(&pool, "DELETE").await;

        let result = repo.delete(user.id()).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(repo.get(user.id()).await.unwrap().is_some());

        allow_writes(&pool, "DELETE").await;
        assert!(repo.delete(user.id()).await.unwrap());
    }
}
