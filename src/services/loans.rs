//! Loan management service

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List loans, optionally only the active ones
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list(active_only).await
    }

    /// Get loans for a user
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        self.repository.loans.get_user_loans(user_id).await
    }

    /// Lend a book to a user
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<Loan> {
        // Verify user exists
        self.repository.users.get_by_id(loan.user_id).await?;

        let created = self.repository.loans.issue(loan.user_id, loan.book_id).await?;
        tracing::info!(
            loan_id = created.id,
            user_id = created.user_id,
            book_id = created.book_id,
            "Book issued"
        );
        Ok(created)
    }

    /// Close the active loan of a book
    pub async fn return_book(&self, book_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.return_book(book_id).await?;
        tracing::info!(loan_id = loan.id, book_id, "Book returned");
        Ok(loan)
    }

    /// Count active loans for a book
    pub async fn count_active_for_book(&self, book_id: i32) -> AppResult<i64> {
        self.repository.loans.count_active_for_book(book_id).await
    }
}
