//! Request and response bodies for the user endpoints

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::domain::{Page, User};
use crate::infrastructure::user::UserRequest;

/// Body of `POST /users` and `PUT /users/{id}`; missing keys stay `None`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UserPayload> for UserRequest {
    fn from(payload: UserPayload) -> Self {
        Self {
            username: payload.username,
            email: payload.email,
        }
    }
}

/// Query string of `GET /users`
///
/// Built from the raw key/value pairs so that a repeated key or a
/// non-numeric value never rejects the request. The first occurrence of each
/// key wins.
#[derive(Debug, Clone, Default)]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListUsersParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "per_page" => &mut params.per_page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        params
    }

    pub fn page(&self) -> i64 {
        parse_or_default(self.page.as_deref(), 1)
    }

    pub fn per_page(&self) -> i64 {
        parse_or_default(self.per_page.as_deref(), 1)
    }
}

/// Integers beyond the i64 range saturate; anything else non-numeric falls
/// back to `default`
fn parse_or_default(value: Option<&str>, default: i64) -> i64 {
    let Some(value) = value else {
        return default;
    };

    match value.trim().parse::<i64>() {
        Ok(parsed) => parsed,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => default,
        },
    }
}

/// Flat user representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Pagination envelope for `GET /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

impl From<Page<User>> for ListUsersResponse {
    fn from(page: Page<User>) -> Self {
        let pages = page.pages();
        let current_page = page.current_page();
        let page = page.map_items(|user| UserResponse::from(&user));

        Self {
            users: page.items,
            total: page.total,
            pages,
            current_page,
        }
    }
}

/// `{"message": ...}` confirmation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
