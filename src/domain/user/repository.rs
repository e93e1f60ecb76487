//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserFields, UserId};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Every method is a single unit of work. Writes either commit completely
/// or leave the store untouched, so callers may simply try again after a
/// [`DomainError::Storage`].
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// List users ordered by ID, one page at a time
    async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError>;

    /// Insert a user; the store assigns the ID
    async fn create(&self, fields: &UserFields) -> Result<User, DomainError>;

    /// Overwrite username and email. Returns `None` if the user does not exist.
    async fn update(&self, id: UserId, fields: &UserFields) -> Result<Option<User>, DomainError>;

    /// Delete a user. Returns `false` if the user does not exist.
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;
}
