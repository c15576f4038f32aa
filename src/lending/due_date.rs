//! Due-date validation shared by the borrow and renewal flows

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::LendingError;

/// Longest loan a borrower or librarian may set
pub const MAX_LOAN_WEEKS: i64 = 4;

/// Latest acceptable due date for a request made on `today`
pub fn latest_due_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(MAX_LOAN_WEEKS)
}

/// A due date that has passed validation against some "today".
///
/// The only constructor is [`DueDate::validate`], so transitions that take a
/// `DueDate` cannot be handed an unchecked date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    /// Accepts `candidate` iff `today <= candidate <= today + 4 weeks`
    pub fn validate(candidate: NaiveDate, today: NaiveDate) -> Result<Self, LendingError> {
        if candidate < today {
            return Err(LendingError::DateInPast);
        }
        if candidate > latest_due_date(today) {
            return Err(LendingError::DateTooFarAhead);
        }
        Ok(Self(candidate))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Which request is proposing a due date. Only the default differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendingFlow {
    Borrow,
    Renewal,
}

impl LendingFlow {
    fn proposal_weeks(self) -> i64 {
        match self {
            LendingFlow::Borrow => 2,
            LendingFlow::Renewal => 3,
        }
    }

    /// Date offered to the user before they pick one
    pub fn proposed_due_date(self, today: NaiveDate) -> NaiveDate {
        today + Duration::weeks(self.proposal_weeks())
    }

    /// Validate the requested date, falling back to the proposal when the
    /// request carries none
    pub fn resolve(
        self,
        requested: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<DueDate, LendingError> {
        DueDate::validate(requested.unwrap_or_else(|| self.proposed_due_date(today)), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_year_scenario() {
        let today = date(2024, 1, 1);

        assert_eq!(
            DueDate::validate(date(2024, 1, 15), today).map(|d| d.date()),
            Ok(date(2024, 1, 15))
        );
        assert_eq!(
            DueDate::validate(date(2023, 12, 31), today),
            Err(LendingError::DateInPast)
        );
        assert_eq!(
            DueDate::validate(date(2024, 2, 1), today),
            Err(LendingError::DateTooFarAhead)
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let today = date(2024, 1, 1);
        assert_eq!(latest_due_date(today), date(2024, 1, 29));

        assert!(DueDate::validate(today, today).is_ok());
        assert!(DueDate::validate(date(2024, 1, 29), today).is_ok());
        assert_eq!(
            DueDate::validate(date(2024, 1, 30), today),
            Err(LendingError::DateTooFarAhead)
        );
    }

    #[test]
    fn test_accepts_exactly_the_four_week_window() {
        let today = date(2024, 2, 20);
        for offset in -40i64..=40 {
            let candidate = today + Duration::days(offset);
            let accepted = DueDate::validate(candidate, today).is_ok();
            assert_eq!(accepted, (0..=28).contains(&offset), "offset {}", offset);
        }
    }

    #[test]
    fn test_proposals() {
        let today = date(2024, 1, 1);
        assert_eq!(LendingFlow::Borrow.proposed_due_date(today), date(2024, 1, 15));
        assert_eq!(LendingFlow::Renewal.proposed_due_date(today), date(2024, 1, 22));
    }

    #[test]
    fn test_resolve_uses_proposal_when_missing() {
        let today = date(2024, 1, 1);
        let due = LendingFlow::Renewal.resolve(None, today).unwrap();
        assert_eq!(due.date(), date(2024, 1, 22));

        assert_eq!(
            LendingFlow::Borrow.resolve(Some(date(2024, 3, 1)), today),
            Err(LendingError::DateTooFarAhead)
        );
    }
}
