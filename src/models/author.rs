//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::book::BookShort;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author with the books credited to them
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    pub author: Author,
    pub books: Vec<BookShort>,
}

/// Create or replace author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_lifespan"))]
pub struct AuthorForm {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

fn validate_lifespan(form: &AuthorForm) -> Result<(), ValidationError> {
    if let (Some(born), Some(died)) = (form.date_of_birth, form.date_of_death) {
        if died < born {
            let mut error = ValidationError::new("lifespan");
            error.message = Some("Date of death cannot precede date of birth".into());
            return Err(error);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(born: Option<NaiveDate>, died: Option<NaiveDate>) -> AuthorForm {
        AuthorForm {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: born,
            date_of_death: died,
        }
    }

    #[test]
    fn test_display_is_last_first() {
        let author = Author {
            id: 1,
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        assert_eq!(author.to_string(), "Le Guin, Ursula");
    }

    #[test]
    fn test_lifespan_validation() {
        let born = NaiveDate::from_ymd_opt(1929, 10, 21);
        let died = NaiveDate::from_ymd_opt(2018, 1, 22);

        assert!(form(born, died).validate().is_ok());
        assert!(form(born, None).validate().is_ok());
        assert!(form(died, born).validate().is_err());
    }

    #[test]
    fn test_name_length() {
        let mut f = form(None, None);
        f.first_name = String::new();
        assert!(f.validate().is_err());

        f.first_name = "x".repeat(101);
        assert!(f.validate().is_err());
    }
}
