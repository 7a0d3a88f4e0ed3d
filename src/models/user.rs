//! User (borrower) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Registered library user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// Unique, stored lowercased
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 200, message = "Name is required (max 200 characters)"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl CreateUser {
    /// Trim surrounding whitespace and lowercase the email
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let user = CreateUser {
            name: "  Ada Lovelace ".to_string(),
            email: " Ada@Example.ORG ".to_string(),
        }
        .normalized();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, "ada@example.org");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected_after_normalization() {
        let user = CreateUser {
            name: "   ".to_string(),
            email: "a@b.co".to_string(),
        }
        .normalized();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let user = CreateUser {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
        };
        let errors = user.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
