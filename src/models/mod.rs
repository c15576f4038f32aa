//! Data models for the Local Library

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails, BookShort};
pub use book_instance::{BookInstance, CopyStatus, LoanedCopy};
pub use genre::{Genre, Language};
pub use user::{Permission, User, UserClaims};
