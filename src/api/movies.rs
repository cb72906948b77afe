use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::titles::{self, ListQuery, RelatedQuery, ServersQuery};
use super::types::{ApiResponse, ServerListDto, TitleDto, TitleRequest};
use super::{ApiError, AppState};
use crate::models::catalog::CatalogKind;

const KIND: CatalogKind = CatalogKind::Movie;

/// GET /movies?genre=&q=
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<TitleDto>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        titles::list(&state, KIND, &query).await?,
    )))
}

/// GET /movies/{slug}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    let item = titles::resolve(&state, KIND, &slug).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// GET /movies/{slug}/related?limit=
pub async fn related_movies(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<ApiResponse<Vec<TitleDto>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        titles::related(&state, KIND, &slug, &query).await?,
    )))
}

/// GET /movies/{slug}/servers
pub async fn movie_servers(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<ServersQuery>,
) -> Result<Json<ApiResponse<ServerListDto>>, ApiError> {
    Ok(Json(ApiResponse::success(
        titles::servers(&state, KIND, &slug, &query).await?,
    )))
}

/// POST /movies
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TitleRequest>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    titles::validate_title(&payload.title)?;
    titles::validate_rating(payload.rating)?;

    let item = state.store().add_movie(payload.into_movie_draft()).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// PUT /movies/{slug}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<TitleRequest>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    titles::validate_title(&payload.title)?;
    titles::validate_rating(payload.rating)?;

    let existing = state.shared.resolver.resolve(KIND, &slug).await?;
    let item = state
        .store()
        .update_movie(&existing.id, payload.into_movie_draft())
        .await?
        .ok_or_else(|| ApiError::not_found("Movie", &slug))?;

    Ok(Json(ApiResponse::success(item.into())))
}

/// DELETE /movies/{slug}
pub async fn remove_movie(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let existing = state.shared.resolver.resolve(KIND, &slug).await?;
    if state.store().remove_movie(&existing.id).await? {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("Movie", &slug))
    }
}
