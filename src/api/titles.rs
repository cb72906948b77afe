//! Shared handler logic for the two catalog resources.
//!
//! `movies.rs` and `series.rs` stay thin; everything that does not depend
//! on the draft type lives here, keyed by [`CatalogKind`].

use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::types::{ServerListDto, TitleDto};
use super::{ApiError, AppState};
use crate::catalog::player::{effective_servers, group_by_language};
use crate::models::catalog::{CatalogItem, CatalogKind};

/// Hard cap on client-supplied related limits.
const MAX_RELATED_LIMIT: usize = 24;

#[derive(Debug, Deserialize)]
pub struct ServersQuery {
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub episode: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RelatedQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

fn matches_list_query(item: &CatalogItem, query: &ListQuery) -> bool {
    if let Some(genre) = &query.genre {
        let wanted = genre.to_lowercase();
        if !item.genres.iter().any(|g| g.to_lowercase() == wanted) {
            return false;
        }
    }

    if let Some(q) = &query.q {
        let needle = q.to_lowercase();
        let in_title = item.title.to_lowercase().contains(&needle);
        let in_original = item
            .original_title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&needle));
        if !in_title && !in_original {
            return false;
        }
    }

    true
}

pub async fn list(
    state: &AppState,
    kind: CatalogKind,
    query: &ListQuery,
) -> Result<Vec<TitleDto>, ApiError> {
    let items = state.store().list_items(kind).await?;
    Ok(items
        .into_iter()
        .filter(|item| matches_list_query(item, query))
        .map(TitleDto::from)
        .collect())
}

/// Resolve a slug or id to a record and count the view. A failed view
/// write never fails the request.
pub async fn resolve(
    state: &AppState,
    kind: CatalogKind,
    input: &str,
) -> Result<CatalogItem, ApiError> {
    let item = state.shared.resolver.resolve(kind, input).await?;

    if let Err(e) = state.store().record_view(kind, &item.id).await {
        warn!("Failed to record view for {} {}: {}", kind, item.id, e);
    }

    Ok(item)
}

pub async fn related(
    state: &AppState,
    kind: CatalogKind,
    input: &str,
    query: &RelatedQuery,
) -> Result<Vec<TitleDto>, ApiError> {
    let item = state.shared.resolver.resolve(kind, input).await?;
    let default_limit = state.config().read().await.catalog.related_limit;
    let limit = query.limit.unwrap_or(default_limit).min(MAX_RELATED_LIMIT);

    let related = state
        .shared
        .related
        .find_related(kind, &item.id, &item.genres, limit)
        .await;

    Ok(related.into_iter().map(TitleDto::from).collect())
}

pub async fn servers(
    state: &Arc<AppState>,
    kind: CatalogKind,
    input: &str,
    query: &ServersQuery,
) -> Result<ServerListDto, ApiError> {
    let item = state.shared.resolver.resolve(kind, input).await?;
    let servers = effective_servers(&item, query.season, query.episode);
    Ok(ServerListDto::build(group_by_language(&servers)))
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }
    Ok(())
}

pub fn validate_rating(rating: Option<f32>) -> Result<(), ApiError> {
    if let Some(rating) = rating
        && !(0.0..=10.0).contains(&rating)
    {
        return Err(ApiError::validation(format!(
            "Invalid rating: {rating}. Rating must be between 0 and 10"
        )));
    }
    Ok(())
}
