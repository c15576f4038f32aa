//! Book instance (lendable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl CopyStatus {
    /// One-character code stored in `book_instances.status`
    pub fn as_code(&self) -> &'static str {
        match self {
            CopyStatus::Maintenance => "m",
            CopyStatus::OnLoan => "o",
            CopyStatus::Available => "a",
            CopyStatus::Reserved => "r",
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CopyStatus::Maintenance => "Maintenance",
            CopyStatus::OnLoan => "On loan",
            CopyStatus::Available => "Available",
            CopyStatus::Reserved => "Reserved",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(CopyStatus::Maintenance),
            "o" => Ok(CopyStatus::OnLoan),
            "a" => Ok(CopyStatus::Available),
            "r" => Ok(CopyStatus::Reserved),
            _ => Err(format!("Invalid copy status code: {}", s)),
        }
    }
}

// SQLx conversion through the one-character code
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_code(), buf)
    }
}

/// A physical, lendable copy of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
}

/// Copy on loan, joined with its title and borrower for the loan lists
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower_username: Option<String>,
    #[sqlx(skip)]
    pub is_overdue: bool,
}

impl LoanedCopy {
    pub fn with_overdue(mut self, today: NaiveDate) -> Self {
        self.is_overdue = self.due_back.map(|d| d < today).unwrap_or(false);
        self
    }
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    /// Defaults to maintenance. A copy cannot be created already on loan.
    pub status: Option<CopyStatus>,
}

/// Due date sent with a borrow or renewal; the proposal is used when absent
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DueBackRequest {
    pub due_back: Option<NaiveDate>,
}

/// Date offered before a borrow or renewal
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DueDateProposal {
    pub copy: BookInstance,
    pub proposed_due_back: NaiveDate,
    pub earliest_due_back: NaiveDate,
    pub latest_due_back: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            CopyStatus::Maintenance,
            CopyStatus::OnLoan,
            CopyStatus::Available,
            CopyStatus::Reserved,
        ] {
            assert_eq!(status.as_code().parse::<CopyStatus>(), Ok(status));
        }
        assert!("x".parse::<CopyStatus>().is_err());
    }

    #[test]
    fn test_default_is_maintenance() {
        assert_eq!(CopyStatus::default(), CopyStatus::Maintenance);
    }

    #[test]
    fn test_status_json_names() {
        assert_eq!(serde_json::to_string(&CopyStatus::OnLoan).unwrap(), "\"on_loan\"");
        let parsed: CopyStatus = serde_json::from_str("\"available\"").unwrap();
        assert_eq!(parsed, CopyStatus::Available);
    }

    #[test]
    fn test_overdue_flag() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let copy = LoanedCopy {
            id: Uuid::new_v4(),
            book_id: 1,
            title: "Dune".to_string(),
            imprint: "Ace".to_string(),
            due_back: NaiveDate::from_ymd_opt(2024, 1, 9),
            borrower_id: Some(2),
            borrower_username: Some("reader".to_string()),
            is_overdue: false,
        };
        assert!(copy.clone().with_overdue(today).is_overdue);

        let on_time = LoanedCopy { due_back: Some(today), ..copy };
        assert!(!on_time.with_overdue(today).is_overdue);
    }
}
