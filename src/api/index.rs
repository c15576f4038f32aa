//! Home page summary

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::book::{CatalogSummary, IndexQuery},
};

use super::AuthenticatedUser;

/// Catalog counts, optional word search and the session's visit counter
#[utoipa::path(
    get,
    path = "/index",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(IndexQuery),
    responses(
        (status = 200, description = "Catalog summary", body = CatalogSummary),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<IndexQuery>,
) -> AppResult<Json<CatalogSummary>> {
    let summary = state
        .services
        .catalog
        .summary(&claims, query.q.as_deref())
        .await?;
    Ok(Json(summary))
}
