//! Domain layer - Core business logic and entities

pub mod error;
pub mod pagination;
pub mod retry;
pub mod user;

pub use error::DomainError;
pub use pagination::{Page, PageRequest};
pub use retry::{with_retry, RetryPolicy, DATABASE_ERROR};
pub use user::{User, UserFields, UserId, UserRepository};
