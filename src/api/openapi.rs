//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Users, books and loans REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        // Loans
        loans::list_loans,
        loans::get_user_loans,
        loans::create_loan,
        loans::return_book,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::services::stats::DashboardStats,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registration"),
        (name = "books", description = "Book catalog"),
        (name = "loans", description = "Loan issue and return"),
        (name = "stats", description = "Dashboard counters")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_loan_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/loans"));
        assert!(doc.paths.paths.contains_key("/books/{id}/return"));
        assert!(doc.paths.paths.contains_key("/users/{id}/loans"));
    }
}
