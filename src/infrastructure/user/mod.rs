//! User infrastructure module
//!
//! Repository implementations for the user resource and the service that
//! applies validation and retries on top of them.

mod repository;
mod service;
mod sqlite_repository;

pub use repository::InMemoryUserRepository;
pub use service::{UserRequest, UserService, USER_NOT_FOUND};
pub use sqlite_repository::SqliteUserRepository;
