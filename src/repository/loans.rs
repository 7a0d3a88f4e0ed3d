//! Loans repository for database operations
//!
//! Issue and return each flip a loan row and the book's availability flag
//! inside one transaction. The availability check is the conditional
//! `UPDATE books ... WHERE available = TRUE` itself, so two concurrent
//! issues of the same book serialize on the row lock and only one wins.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, LOAN_USER_FK},
    models::loan::{Loan, LoanDetails},
};

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.user_id, u.name AS user_name, l.book_id, b.title AS book_title,
           l.created_at, l.returned_at
    FROM loans l
    JOIN users u ON u.id = l.user_id
    JOIN books b ON b.id = l.book_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List loans, newest first
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE (NOT $1 OR l.returned_at IS NULL) ORDER BY l.created_at DESC, l.id DESC",
            DETAILS_SELECT
        );
        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// All loans of a user, newest first
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.user_id = $1 ORDER BY l.created_at DESC, l.id DESC",
            DETAILS_SELECT
        );
        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// Active loans referencing a book (at most one when the invariant holds)
    pub async fn count_active_for_book(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND returned_at IS NULL",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Issue a book: claim its availability flag and insert the loan, atomically
    pub async fn issue(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<i32> = sqlx::query_scalar(
            "UPDATE books SET available = FALSE WHERE id = $1 AND available = TRUE RETURNING id",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(book_id)
                    .fetch_one(&mut *tx)
                    .await?;
            // Dropping the transaction rolls it back
            return Err(if exists {
                AppError::Unavailable(format!("Book {} is not available", book_id))
            } else {
                AppError::book_not_found(book_id)
            });
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match AppError::foreign_key_violation(&e).as_deref() {
            Some(LOAN_USER_FK) => AppError::user_not_found(user_id),
            Some(_) => AppError::book_not_found(book_id),
            None => AppError::from_db(e),
        })?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Return a book: close its active loan and mark it available, atomically
    pub async fn return_book(&self, book_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET returned_at = NOW()
            WHERE book_id = $1 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::no_active_loan(book_id))?;

        sqlx::query("UPDATE books SET available = TRUE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE returned_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
