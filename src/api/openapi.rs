//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, copies, health, index, loans, lookups, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "1.0.0",
        description = "Catalog and lending REST API for a small library",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        auth::request_password_reset,
        auth::confirm_password_reset,
        // Users
        users::create_user,
        // Catalog
        index::summary,
        lookups::list_genres,
        lookups::create_genre,
        lookups::list_languages,
        lookups::create_language,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Copies
        copies::create_copy,
        copies::delete_copy,
        copies::borrow_proposal,
        copies::borrow_copy,
        copies::renewal_proposal,
        copies::renew_copy,
        copies::return_copy,
        // Loans
        loans::my_loans,
        loans::all_loans,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::PasswordResetRequest,
            crate::models::user::PasswordResetConfirm,
            crate::models::user::UserInfo,
            crate::models::user::CreateUser,
            crate::models::user::Permission,
            // Catalog
            crate::models::book::CatalogSummary,
            crate::models::book::WordMatches,
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::BookForm,
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::AuthorForm,
            crate::models::genre::Genre,
            crate::models::genre::Language,
            crate::models::genre::NameForm,
            // Copies and loans
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::CopyStatus,
            crate::models::book_instance::CreateBookInstance,
            crate::models::book_instance::DueBackRequest,
            crate::models::book_instance::DueDateProposal,
            crate::models::book_instance::LoanedCopy,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "catalog", description = "Home page, genres and languages"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "copies", description = "Copies, borrowing and renewal"),
        (name = "loans", description = "Borrowed copies")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
