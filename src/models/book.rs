//! Book (catalog title) model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{
    author::Author,
    book_instance::BookInstance,
    genre::{Genre, Language},
};

/// Description stored when none is given
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Most genres a book may be filed under
pub const MAX_GENRES: usize = 3;

/// ISBN-10 (last digit may be X) or ISBN-13, digits only
static ISBN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{9}[0-9Xx]|[0-9]{13})$").expect("valid ISBN regex"));

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub description: String,
    pub isbn: String,
    pub language_id: Option<i32>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    /// "First Last", absent when the author was deleted
    pub author_name: Option<String>,
}

/// Book with its author, language, genres and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub isbn: String,
    pub author: Option<Author>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    pub copies: Vec<BookInstance>,
}

/// Create or replace book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_genre_count"))]
pub struct BookForm {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(regex(path = *ISBN_REGEX, message = "ISBN must be 10 or 13 digits"))]
    pub isbn: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub language_id: Option<i32>,
}

impl BookForm {
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Genre ids without duplicates, in request order
    pub fn distinct_genre_ids(&self) -> Vec<i32> {
        let mut ids = Vec::with_capacity(self.genre_ids.len());
        for id in &self.genre_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

/// Repeated ids count once
fn validate_genre_count(form: &BookForm) -> Result<(), ValidationError> {
    if form.distinct_genre_ids().len() > MAX_GENRES {
        let mut error = ValidationError::new("genre_ids");
        error.message = Some(format!("A book cannot have more than {} genres", MAX_GENRES).into());
        return Err(error);
    }
    Ok(())
}

/// Pagination query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Book deletion query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteBookParams {
    /// Delete even if copies are on loan
    pub force: Option<bool>,
}

/// Home page query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct IndexQuery {
    /// Word to look for in titles and descriptions
    pub q: Option<String>,
}

/// Books and genres matching a search word
#[derive(Debug, Serialize, ToSchema)]
pub struct WordMatches {
    pub word: String,
    pub num_books: i64,
    pub num_genres: i64,
}

/// Catalog counts shown on the home page
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    /// Visits to the home page in the current session, this one included
    pub num_visits: i64,
    pub matches: Option<WordMatches>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BookForm {
        BookForm {
            title: "The Dispossessed".to_string(),
            author_id: Some(1),
            description: None,
            isbn: "9780060512750".to_string(),
            genre_ids: vec![1, 2],
            language_id: None,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
        assert_eq!(form().description_or_default(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_genre_limit() {
        let mut f = form();
        f.genre_ids = vec![1, 2, 3];
        assert!(f.validate().is_ok());

        f.genre_ids = vec![1, 2, 3, 4];
        assert!(f.validate().is_err());

        f.genre_ids = vec![1, 1, 1, 1];
        assert!(f.validate().is_ok());

        f.genre_ids = vec![1, 2, 2, 3, 3, 1];
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_isbn_format() {
        let mut f = form();
        f.isbn = "006051275X".to_string();
        assert!(f.validate().is_ok());

        f.isbn = "978-0060512750".to_string();
        assert!(f.validate().is_err());

        f.isbn = "12345".to_string();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_distinct_genre_ids() {
        let mut f = form();
        f.genre_ids = vec![3, 1, 3, 1];
        assert_eq!(f.distinct_genre_ids(), vec![3, 1]);
    }
}
