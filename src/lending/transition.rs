//! Copy status transitions
//!
//! Each function checks the precondition on the current copy and returns the
//! next state. Nothing is written here; the caller persists the result with
//! [`super::CopyLedger::compare_and_set`] against the copy it was read from.

use crate::models::book_instance::{BookInstance, CopyStatus};

use super::{DueDate, LendingError};

/// Lend an available copy to `borrower_id`
pub fn borrow(
    copy: &BookInstance,
    borrower_id: i32,
    due: DueDate,
) -> Result<BookInstance, LendingError> {
    if copy.status != CopyStatus::Available {
        return Err(LendingError::CopyUnavailable);
    }

    Ok(BookInstance {
        borrower_id: Some(borrower_id),
        due_back: Some(due.date()),
        status: CopyStatus::OnLoan,
        ..copy.clone()
    })
}

/// Move the due date of a copy that is on loan
pub fn renew(copy: &BookInstance, due: DueDate) -> Result<BookInstance, LendingError> {
    if copy.status != CopyStatus::OnLoan {
        return Err(LendingError::NotOnLoan);
    }

    Ok(BookInstance {
        due_back: Some(due.date()),
        ..copy.clone()
    })
}

/// Put a copy that was on loan back on the shelf
pub fn mark_returned(copy: &BookInstance) -> Result<BookInstance, LendingError> {
    if copy.status != CopyStatus::OnLoan {
        return Err(LendingError::NotOnLoan);
    }

    Ok(BookInstance {
        borrower_id: None,
        due_back: None,
        status: CopyStatus::Available,
        ..copy.clone()
    })
}
