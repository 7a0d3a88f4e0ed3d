//! Error types for the library server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Partial unique index allowing one active loan per book
const ACTIVE_LOAN_INDEX: &str = "loans_one_active_per_book";
/// Loan foreign key to its borrower
pub const LOAN_USER_FK: &str = "loans_user_id_fkey";

/// Application error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 1,
    NoSuchUser = 3,
    NoSuchBook = 4,
    NoActiveLoan = 5,
    BookNotAvailable = 6,
    Duplicate = 7,
    BadValue = 8,
    BookHasLoans = 9,
}

/// What a `NotFound` error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    User,
    Book,
    ActiveLoan,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {1}")]
    NotFound(Missing, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Book unavailable: {0}")]
    Unavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn user_not_found(id: i32) -> Self {
        AppError::NotFound(Missing::User, format!("User with id {} not found", id))
    }

    pub fn book_not_found(id: i32) -> Self {
        AppError::NotFound(Missing::Book, format!("Book with id {} not found", id))
    }

    pub fn no_active_loan(book_id: i32) -> Self {
        AppError::NotFound(
            Missing::ActiveLoan,
            format!("No active loan for book {}", book_id),
        )
    }

    /// Map a database error, turning constraint violations into readable messages
    pub fn from_db(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) if db_err.constraint() == Some(ACTIVE_LOAN_INDEX) => {
                    return AppError::Unavailable("Book is already on loan".to_string());
                }
                Some(UNIQUE_VIOLATION) => {
                    return AppError::Duplicate(unique_violation_message(db_err.constraint()));
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }

    /// Name of the violated foreign key, if `err` is a foreign key violation
    pub fn foreign_key_violation(err: &sqlx::Error) -> Option<String> {
        match err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                db_err.constraint().map(str::to_string)
            }
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Duplicate(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unavailable(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(Missing::User, _) => ErrorCode::NoSuchUser,
            AppError::NotFound(Missing::Book, _) => ErrorCode::NoSuchBook,
            AppError::NotFound(Missing::ActiveLoan, _) => ErrorCode::NoActiveLoan,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Duplicate(_) => ErrorCode::Duplicate,
            AppError::Unavailable(_) => ErrorCode::BookNotAvailable,
            AppError::Conflict(_) => ErrorCode::BookHasLoans,
            AppError::Database(_) => ErrorCode::DbFailure,
        }
    }
}

/// User-facing message for a violated unique constraint
pub fn unique_violation_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_email_key") => "Email already registered".to_string(),
        Some("books_isbn_key") => "ISBN already registered".to_string(),
        _ => "Duplicate value".to_string(),
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::NotFound(_, msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Duplicate(msg)
            | AppError::Unavailable(msg)
            | AppError::Conflict(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::book_not_found(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::no_active_loan(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Duplicate("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unavailable("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unique_violation_message() {
        assert_eq!(unique_violation_message(Some("users_email_key")), "Email already registered");
        assert_eq!(unique_violation_message(Some("books_isbn_key")), "ISBN already registered");
        assert_eq!(unique_violation_message(Some("other")), "Duplicate value");
        assert_eq!(unique_violation_message(None), "Duplicate value");
    }

    #[test]
    fn test_non_unique_db_error_stays_database() {
        assert!(matches!(
            AppError::from_db(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let signup = Signup {
            name: String::new(),
            email: "nope".to_string(),
        };
        let err: AppError = signup.validate().unwrap_err().into();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Invalid email format; Name is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::Unavailable("Book is not available".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 6);
        assert_eq!(json["error"], "BookNotAvailable");
        assert_eq!(json["message"], "Book is not available");
    }
}
