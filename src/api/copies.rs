//! Copy (book instance) endpoints: create, delete, borrow, renew, return

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstance, CreateBookInstance, DueBackRequest, DueDateProposal},
        user::Permission,
    },
};

use super::AuthenticatedUser;

/// Add a copy to a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(copy): Json<CreateBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    claims.require(Permission::ChangeBook)?;
    copy.validate()?;

    let created = state
        .services
        .catalog
        .create_copy(&claims, book_id, copy)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_copy(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Allowed due dates and the default offered when borrowing
#[utoipa::path(
    get,
    path = "/copies/{id}/borrow",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Borrow proposal", body = DueDateProposal),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn borrow_proposal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DueDateProposal>> {
    let proposal = state.services.lending.borrow_proposal(id).await?;
    Ok(Json(proposal))
}

/// Borrow an available copy
#[utoipa::path(
    post,
    path = "/copies/{id}/borrow",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = DueBackRequest,
    responses(
        (status = 200, description = "Copy borrowed", body = BookInstance),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy unavailable"),
        (status = 422, description = "Due date out of range")
    )
)]
pub async fn borrow_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<DueBackRequest>,
) -> AppResult<Json<BookInstance>> {
    let copy = state
        .services
        .lending
        .borrow(&claims, id, request.due_back)
        .await?;
    Ok(Json(copy))
}

/// Allowed due dates and the default offered when renewing
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Renewal proposal", body = DueDateProposal),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_proposal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DueDateProposal>> {
    claims.require(Permission::CanMarkReturned)?;

    let proposal = state.services.lending.renewal_proposal(&claims, id).await?;
    Ok(Json(proposal))
}

/// Set a new due date on a copy on loan
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = DueBackRequest,
    responses(
        (status = 200, description = "Copy renewed", body = BookInstance),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy is not on loan"),
        (status = 422, description = "Due date out of range")
    )
)]
pub async fn renew_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<DueBackRequest>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::CanMarkReturned)?;

    let copy = state
        .services
        .lending
        .renew(&claims, id, request.due_back)
        .await?;
    Ok(Json(copy))
}

/// Mark a copy on loan as returned
#[utoipa::path(
    post,
    path = "/copies/{id}/return",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy returned", body = BookInstance),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy is not on loan")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::CanMarkReturned)?;

    let copy = state.services.lending.mark_returned(&claims, id).await?;
    Ok(Json(copy))
}
