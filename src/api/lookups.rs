//! Genre and language endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        genre::{Genre, Language, NameForm},
        user::Permission,
    },
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/genres",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.services.catalog.list_genres().await?))
}

#[utoipa::path(
    post,
    path = "/genres",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = NameForm,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 403, description = "Missing catalog.change_book")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<NameForm>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require(Permission::ChangeBook)?;
    form.validate()?;

    let genre = state.services.catalog.create_genre(&claims, form).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

#[utoipa::path(
    get,
    path = "/languages",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Language>>> {
    Ok(Json(state.services.catalog.list_languages().await?))
}

#[utoipa::path(
    post,
    path = "/languages",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = NameForm,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 403, description = "Missing catalog.change_book")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<NameForm>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require(Permission::ChangeBook)?;
    form.validate()?;

    let language = state.services.catalog.create_language(&claims, form).await?;
    Ok((StatusCode::CREATED, Json(language)))
}
