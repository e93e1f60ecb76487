//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{User, UserFields, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<UserId, User>,
    /// Highest ID ever assigned; IDs of deleted users are not reused
    last_id: i64,
}

/// In-memory implementation of UserRepository
///
/// Every write holds the lock for its whole duration and only mutates the
/// map once nothing else can fail, so there is nothing to roll back.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with the given fields, IDs assigned in order
    pub fn with_users(users: Vec<UserFields>) -> Self {
        let mut inner = Inner::default();

        for fields in users {
            inner.last_id += 1;
            let user = fields.into_user(UserId::new(inner.last_id));
            inner.users.insert(user.id(), user);
        }

        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        let inner = self.inner.read().await;

        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.per_page()).unwrap_or(usize::MAX);

        let items: Vec<User> = inner.users.values().skip(skip).take(take).cloned().collect();

        Ok(Page::new(items, inner.users.len() as u64, request))
    }

    async fn create(&self, fields: &UserFields) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let next_id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| DomainError::storage("User ID space exhausted"))?;

        let user = fields.clone().into_user(UserId::new(next_id));
        inner.last_id = next_id;
        inner.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> Result<Option<User>, DomainError> {
        let mut inner = self.inner.write().await;

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        *user = fields.clone().into_user(id);

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> UserFields {
        UserFields::new(name, format!("{}@example.com", name))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();

        let user = repo.create(&fields("alice")).await.unwrap();
        assert_eq!(user.id().value(), 1);

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved, user);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.get(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let repo = InMemoryUserRepository::with_users(vec![fields("alice")]);

        let updated = repo
            .update(UserId::new(1), &UserFields::new("alicia", "alicia@example.com"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id().value(), 1);
        assert_eq!(updated.username(), "alicia");
        assert_eq!(updated.email(), "alicia@example.com");
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(UserId::new(5), &fields("ghost")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::with_users(vec![fields("alice")]);

        assert!(repo.delete(UserId::new(1)).await.unwrap());
        assert!(!repo.delete(UserId::new(1)).await.unwrap());
        assert!(repo.get(UserId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = InMemoryUserRepository::with_users(vec![fields("a"), fields("b")]);
        repo.delete(UserId::new(2)).await.unwrap();

        let user = repo.create(&fields("c")).await.unwrap();
        assert_eq!(user.id().value(), 3);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let repo =
            InMemoryUserRepository::with_users(vec![fields("a"), fields("b"), fields("c")]);

        let page = repo.list(PageRequest::new(1, 1)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username(), "a");
        assert_eq!(page.total, 3);
        assert_eq!(page.pages(), 3);

        let page = repo.list(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username(), "c");

        let page = repo.list(PageRequest::new(10, 2)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.current_page(), 10);
    }
}
