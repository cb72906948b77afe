use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::titles::{self, ListQuery, RelatedQuery, ServersQuery};
use super::types::{ApiResponse, ServerListDto, TitleDto, TitleRequest};
use super::{ApiError, AppState};
use crate::models::catalog::CatalogKind;

const KIND: CatalogKind = CatalogKind::Series;

/// GET /series?genre=&q=
pub async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<TitleDto>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        titles::list(&state, KIND, &query).await?,
    )))
}

/// GET /series/{slug}
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    let item = titles::resolve(&state, KIND, &slug).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// GET /series/{slug}/related?limit=
pub async fn related_series(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<ApiResponse<Vec<TitleDto>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        titles::related(&state, KIND, &slug, &query).await?,
    )))
}

/// GET /series/{slug}/servers
///
/// `?season=&episode=` address an episode-level server list. Absent or
/// unknown coordinates fall back to the series-level list.
pub async fn series_servers(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<ServersQuery>,
) -> Result<Json<ApiResponse<ServerListDto>>, ApiError> {
    Ok(Json(ApiResponse::success(
        titles::servers(&state, KIND, &slug, &query).await?,
    )))
}

/// POST /series
pub async fn add_series(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TitleRequest>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    titles::validate_title(&payload.title)?;
    titles::validate_rating(payload.rating)?;

    let item = state.store().add_series(payload.into_series_draft()).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// PUT /series/{slug}
pub async fn update_series(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<TitleRequest>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    titles::validate_title(&payload.title)?;
    titles::validate_rating(payload.rating)?;

    let existing = state.shared.resolver.resolve(KIND, &slug).await?;
    let item = state
        .store()
        .update_series(&existing.id, payload.into_series_draft())
        .await?
        .ok_or_else(|| ApiError::not_found("Series", &slug))?;

    Ok(Json(ApiResponse::success(item.into())))
}

/// DELETE /series/{slug}
pub async fn remove_series(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let existing = state.shared.resolver.resolve(KIND, &slug).await?;
    if state.store().remove_series(&existing.id).await? {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("Series", &slug))
    }
}
