//! Lending rules: due-date bounds and copy status transitions
//!
//! Everything in here is pure except for the two seams at the bottom:
//! [`Clock`] supplies "today" and [`CopyLedger`] persists a transition with a
//! compare-and-swap on the copy's previous status.

pub mod due_date;
pub mod transition;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, LoanedCopy},
};

pub use due_date::{DueDate, LendingFlow};

/// Reasons a borrow, renewal or return is refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendingError {
    #[error("date in the past")]
    DateInPast,

    #[error("date too far in the future")]
    DateTooFarAhead,

    #[error("copy unavailable")]
    CopyUnavailable,

    #[error("copy is not on loan")]
    NotOnLoan,
}

/// Source of the current local date
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the server's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Persistence of copy state
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CopyLedger: Send + Sync {
    /// Load a copy by id
    async fn find(&self, id: Uuid) -> AppResult<Option<BookInstance>>;

    /// Store `next` only if the stored copy still has the status, borrower
    /// and due date of `current`.
    /// Returns `None` when another writer changed the copy first.
    async fn compare_and_set(
        &self,
        current: &BookInstance,
        next: &BookInstance,
    ) -> AppResult<Option<BookInstance>>;

    /// Copies currently on loan, optionally restricted to one borrower,
    /// ordered by due date
    async fn on_loan(&self, borrower_id: Option<i32>) -> AppResult<Vec<LoanedCopy>>;
}
