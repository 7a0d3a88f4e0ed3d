//! Dashboard counters

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// Counters shown on the dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_books: i64,
    pub total_users: i64,
    /// Books whose availability flag is off
    pub books_on_loan: i64,
    pub active_loans: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let (total_books, total_users, books_on_loan, active_loans) = tokio::try_join!(
            self.repository.books.count(),
            self.repository.users.count(),
            self.repository.books.count_unavailable(),
            self.repository.loans.count_active(),
        )?;

        Ok(DashboardStats {
            total_books,
            total_users,
            books_on_loan,
            active_loans,
        })
    }
}
