use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::{ApiResponse, TitleDto};
use super::{ApiError, AppState};
use crate::models::catalog::CatalogKind;
use crate::services::{ImportCandidate, Provider};

#[derive(Debug, Deserialize)]
pub struct ImportSearchQuery {
    pub q: String,
    pub kind: CatalogKind,
}

/// GET /import/search?q=&kind=
///
/// Search the configured metadata provider for import candidates.
pub async fn search_candidates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportSearchQuery>,
) -> Result<Json<ApiResponse<Vec<ImportCandidate>>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }

    let candidates = state
        .shared
        .import_service
        .search(query.kind, q)
        .await?;

    Ok(Json(ApiResponse::success(candidates)))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub provider: Provider,
    pub provider_id: String,
    pub kind: CatalogKind,
}

/// POST /import
///
/// Fetch the full provider record and create a catalog entry from it.
/// Stream servers are left empty for the operator to fill in.
pub async fn import_title(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    let import = &state.shared.import_service;

    let item = match payload.kind {
        CatalogKind::Movie => {
            let draft = import
                .fetch_movie(payload.provider, &payload.provider_id)
                .await?;
            state.store().add_movie(draft).await?
        }
        CatalogKind::Series => {
            let draft = import
                .fetch_series(payload.provider, &payload.provider_id)
                .await?;
            state.store().add_series(draft).await?
        }
    };

    tracing::info!(
        "Imported {} '{}' from {}",
        item.kind,
        item.title,
        payload.provider.as_str()
    );

    Ok(Json(ApiResponse::success(item.into())))
}
