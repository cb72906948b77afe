use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use super::types::{
    ApiResponse, FeaturedDto, FeaturedRequest, GenreCountDto, PopularDto, ReorderRequest, TitleDto,
    featured_dto,
};
use super::{ApiError, AppState};
use crate::models::catalog::CatalogKind;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub kind: Option<CatalogKind>,
}

/// GET /search?q=&kind=
///
/// Case-insensitive substring match on title and original title. Without
/// a kind filter both tables are searched, movies first.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<TitleDto>>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }

    let kinds: &[CatalogKind] = match query.kind {
        Some(kind) => &[kind],
        None => &[CatalogKind::Movie, CatalogKind::Series],
    };

    let mut results = Vec::new();
    for kind in kinds {
        results.extend(state.store().search_items(*kind, q).await?);
    }

    Ok(Json(ApiResponse::success(
        results.into_iter().map(TitleDto::from).collect(),
    )))
}

/// GET /genres
///
/// Distinct genre labels across both record kinds with the number of
/// records carrying each, sorted by label.
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<GenreCountDto>>>, ApiError> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for kind in [CatalogKind::Movie, CatalogKind::Series] {
        for item in state.store().list_items(kind).await? {
            for genre in item.genres {
                *counts.entry(genre).or_insert(0) += 1;
            }
        }
    }

    Ok(Json(ApiResponse::success(
        counts
            .into_iter()
            .map(|(genre, count)| GenreCountDto { genre, count })
            .collect(),
    )))
}

/// GET /featured
///
/// Carousel entries in curated order, joined with their records. Entries
/// whose record has since been deleted are skipped.
pub async fn list_featured(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<FeaturedDto>>>, ApiError> {
    let entries = state.store().list_featured().await?;

    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match state.store().get_item(entry.kind, &entry.item_id).await? {
            Some(item) => out.push(featured_dto(entry, item)),
            None => warn!(
                "Featured entry {} references missing {} {}",
                entry.id, entry.kind, entry.item_id
            ),
        }
    }

    Ok(Json(ApiResponse::success(out)))
}

/// POST /featured
pub async fn add_featured(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FeaturedRequest>,
) -> Result<Json<ApiResponse<FeaturedDto>>, ApiError> {
    let item = state
        .store()
        .get_item(payload.kind, &payload.item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Record", &payload.item_id))?;

    let entry = state
        .store()
        .add_featured(payload.kind, &payload.item_id)
        .await?;

    Ok(Json(ApiResponse::success(featured_dto(entry, item))))
}

/// PUT /featured/order
pub async fn reorder_featured(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if payload.ordered_ids.is_empty() {
        return Err(ApiError::validation("ordered_ids cannot be empty"));
    }

    state.store().reorder_featured(&payload.ordered_ids).await?;
    Ok(Json(ApiResponse::success(())))
}

/// DELETE /featured/{id}
pub async fn remove_featured(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if state.store().remove_featured(id).await? {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("Featured entry", id))
    }
}

/// GET /settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.store().get_settings().await?)))
}

/// PUT /settings
///
/// Upserts the provided keys; keys not present are left untouched.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(values): Json<BTreeMap<String, String>>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    if values.is_empty() {
        return Err(ApiError::validation("No settings provided"));
    }

    state.store().upsert_settings(&values).await?;
    Ok(Json(ApiResponse::success(state.store().get_settings().await?)))
}

/// GET /popular
///
/// Most-viewed records across both kinds, view counts included.
pub async fn popular(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PopularDto>>>, ApiError> {
    let limit = state.config().read().await.catalog.popular_limit;
    let counts = state.store().top_viewed(limit as u64).await?;

    let mut out = Vec::with_capacity(counts.len());
    for count in counts {
        if let Some(item) = state.store().get_item(count.kind, &count.item_id).await? {
            out.push(PopularDto {
                views: count.views,
                item: item.into(),
            });
        }
    }

    Ok(Json(ApiResponse::success(out)))
}
