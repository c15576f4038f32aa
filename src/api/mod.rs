//! API handlers for the Local Library REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod copies;
pub mod health;
pub mod index;
pub mod loans;
pub mod lookups;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token.
/// The token's session must still be open; permissions are the stored ones,
/// not those issued with the token.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        let claims = state.services.auth.verify_session(claims).await?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// Routes mounted under /api/v1
pub fn routes(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password-reset", post(auth::request_password_reset))
        .route("/auth/password-reset/confirm", post(auth::confirm_password_reset))
        // Users
        .route("/users", post(users::create_user))
        // Home page
        .route("/index", get(index::summary))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/copies", post(copies::create_copy))
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Genres and languages
        .route("/genres", get(lookups::list_genres).post(lookups::create_genre))
        .route("/languages", get(lookups::list_languages).post(lookups::create_language))
        // Copies
        .route("/copies/:id", axum::routing::delete(copies::delete_copy))
        .route(
            "/copies/:id/borrow",
            get(copies::borrow_proposal).post(copies::borrow_copy),
        )
        .route(
            "/copies/:id/renew",
            get(copies::renewal_proposal).post(copies::renew_copy),
        )
        .route("/copies/:id/return", post(copies::return_copy))
        // Loans
        .route("/loans", get(loans::all_loans))
        .route("/loans/mine", get(loans::my_loans))
        .with_state(state)
}
