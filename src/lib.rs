//! Local Library server
//!
//! REST JSON API for a small library catalog: books, authors, genres,
//! languages and physical copies, with borrowing and renewal of copies
//! under a four-week due-date window.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod lending;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
