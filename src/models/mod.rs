//! Data models for the library server

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, CreateBook};
pub use loan::{CreateLoan, Loan, LoanDetails, LoanQuery};
pub use user::{CreateUser, User};
