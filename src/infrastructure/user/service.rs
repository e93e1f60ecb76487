//! User service: validation plus retried persistence for each CRUD operation

use std::sync::Arc;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::retry::{with_retry, RetryPolicy};
use crate::domain::user::{validate_user_fields, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Message for lookups, updates and deletes that reference an unknown ID
pub const USER_NOT_FOUND: &str = "User not found";

/// Raw field values as submitted by a client; either may be missing
#[derive(Debug, Clone, Default)]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// User service wrapping every repository call in the retry policy
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    retry: RetryPolicy,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    /// List one page of users
    pub async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        let repository = &self.repository;
        with_retry(&self.retry, "list users", move || repository.list(request)).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    /// Create a new user.
    ///
    /// Fields are validated before the store is touched, so an incomplete
    /// request never uses up a retry attempt.
    pub async fn create(&self, request: Option<UserRequest>) -> Result<User, DomainError> {
        let request = request.unwrap_or_default();
        let fields = validate_user_fields(request.username, request.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let repository = &self.repository;
        let fields = &fields;
        with_retry(&self.retry, "create user", move || repository.create(fields)).await
    }

    /// Replace a user's username and email.
    ///
    /// The existence check runs first, so an unknown ID reports not-found
    /// even when the body is also incomplete. The lookup and the write are
    /// separate retried units, so one request may make up to twice
    /// `max_attempts` store calls.
    pub async fn update(
        &self,
        id: UserId,
        request: Option<UserRequest>,
    ) -> Result<User, DomainError> {
        self.get(id).await?;

        let request = request.unwrap_or_default();
        let fields = validate_user_fields(request.username, request.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let repository = &self.repository;
        let fields = &fields;
        with_retry(&self.retry, "update user", move || repository.update(id, fields))
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    /// Delete a user
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let repository = &self.repository;
        let deleted =
            with_retry(&self.retry, "delete user", move || repository.delete(id)).await?;

        if !deleted {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        Ok(())
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let repository = &self.repository;
        with_retry(&self.retry, "get user", move || repository.get(id)).await
    }
}
