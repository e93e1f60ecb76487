//! User domain
//!
//! Domain types and the repository trait for the user resource.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserFields, UserId};
pub use repository::UserRepository;
pub use validation::{validate_user_fields, UserValidationError};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
