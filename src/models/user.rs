use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{borrow::Cow, sync::LazyLock};
use validator::{Validate, ValidationError};

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d*[a-zA-Z][a-zA-Z0-9]*$").expect("username pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// Login request; unknown usernames are registered on first login
#[derive(Debug, Validate, Deserialize)]
pub struct LoginRequest {
    #[validate(
        length(max = 20, message = "Username is too long."),
        custom(function = "validate_username")
    )]
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        return Ok(());
    }

    Err(ValidationError::new("username").with_message(Cow::Borrowed(
        "Username must be alphanumeric, and must have at least one alphabetical character.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(username: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
        }
    }

    #[test]
    fn accepts_alphanumeric_usernames() {
        assert!(login("alice").validate().is_ok());
        assert!(login("42bob").validate().is_ok());
        assert!(login("b0b").validate().is_ok());
    }

    #[test]
    fn rejects_usernames_without_letters() {
        assert!(login("12345").validate().is_err());
    }

    #[test]
    fn rejects_punctuation() {
        assert!(login("al_ice").validate().is_err());
        assert!(login("bob!").validate().is_err());
    }

    #[test]
    fn rejects_long_usernames() {
        assert!(login("abcdefghijklmnopqrstu").validate().is_err());
    }
}
