use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{borrow::Cow, sync::LazyLock};
use validator::{Validate, ValidationError};

static TOPIC_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("topic pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Topic {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// Create topic request
#[derive(Debug, Validate, Deserialize)]
pub struct CreateTopicRequest {
    #[validate(
        length(max = 50, message = "Topic name too long."),
        custom(function = "validate_topic_name")
    )]
    pub name: String,
    #[validate(length(max = 1000, message = "Topic description too long."))]
    #[serde(default)]
    pub description: String,
}

// Update topic request
#[derive(Debug, Validate, Deserialize)]
pub struct UpdateTopicRequest {
    #[validate(length(max = 1000, message = "Topic description too long."))]
    pub description: String,
}

fn validate_topic_name(name: &str) -> Result<(), ValidationError> {
    if TOPIC_NAME_RE.is_match(name) {
        return Ok(());
    }

    Err(ValidationError::new("topic_name").with_message(Cow::Borrowed(
        "Topic name must contain only alphanumeric characters.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, description: &str) -> CreateTopicRequest {
        CreateTopicRequest {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn accepts_alphanumeric_names() {
        assert!(create("rust2024", "Systems talk").validate().is_ok());
    }

    #[test]
    fn rejects_empty_or_spaced_names() {
        assert!(create("", "").validate().is_err());
        assert!(create("two words", "").validate().is_err());
    }

    #[test]
    fn rejects_long_descriptions() {
        assert!(create("rust", &"x".repeat(1001)).validate().is_err());
    }
}
