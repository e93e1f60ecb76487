//! API request and response types

pub mod error;
pub mod json;
pub mod user;

pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, JsonRejection};
pub use user::{ListUsersParams, ListUsersResponse, MessageResponse, UserPayload, UserResponse};
