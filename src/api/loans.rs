//! Loan listings

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{book_instance::LoanedCopy, user::Permission},
};

use super::AuthenticatedUser;

/// Copies the current user has on loan, earliest due first
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed copies", body = Vec<LoanedCopy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanedCopy>>> {
    let loans = state.services.lending.my_loans(&claims).await?;
    Ok(Json(loans))
}

/// Every copy on loan, earliest due first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrowed copies", body = Vec<LoanedCopy>),
        (status = 403, description = "Missing catalog.can_mark_returned")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanedCopy>>> {
    claims.require(Permission::CanMarkReturned)?;

    let loans = state.services.lending.all_loans(&claims).await?;
    Ok(Json(loans))
}
