//! Book model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Digits, hyphens and spaces, with an optional trailing X check digit
static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9][0-9 -]*[0-9Xx]$").expect("valid regex"));

/// Catalogued book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// False while the book has an active loan
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 500, message = "Title is required (max 500 characters)"))]
    pub title: String,
    #[validate(length(min = 1, max = 300, message = "Author is required (max 300 characters)"))]
    pub author: String,
    #[validate(length(min = 1, max = 32, message = "ISBN is required (max 32 characters)"))]
    pub isbn: String,
}

impl CreateBook {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_uppercase(),
        }
    }

    /// Field validation plus the ISBN character check
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if !ISBN_RE.is_match(&self.isbn) {
            return Err(AppError::Validation(
                "ISBN may only contain digits, hyphens, spaces and a trailing X".to_string(),
            ));
        }
        Ok(())
    }
}
