//! User validation utilities

use thiserror::Error;

use super::entity::UserFields;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Missing username or email")]
    MissingFields,

    #[error("Invalid user ID: '{0}'")]
    InvalidId(String),
}

/// Require both fields to be present.
///
/// `None` covers an absent key as well as an explicit JSON `null`. Empty
/// strings are accepted as given.
pub fn validate_user_fields(
    username: Option<String>,
    email: Option<String>,
) -> Result<UserFields, UserValidationError> {
    match (username, email) {
        (Some(username), Some(email)) => Ok(UserFields::new(username, email)),
        _ => Err(UserValidationError::MissingFields),
    }
}
