//! Genre-overlap "you might also like" matching.
//!
//! Not a recommendation engine: items of the same kind sharing at least
//! one genre label, with a recency fallback. A failure here must never
//! break a detail page, so errors degrade to an empty list.

use tracing::warn;

use crate::db::Store;
use crate::models::catalog::{CatalogItem, CatalogKind};

pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Order matched items deterministically: rating descending with missing
/// ratings last, then newest first, then id as a stable final key.
fn sort_by_relevance(items: &mut [CatalogItem]) {
    items.sort_by(|a, b| {
        let rating_a = a.rating.unwrap_or(f32::NEG_INFINITY);
        let rating_b = b.rating.unwrap_or(f32::NEG_INFINITY);
        rating_b
            .total_cmp(&rating_a)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub struct RelatedMatcher {
    store: Store,
}

impl RelatedMatcher {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Find up to `limit` items of `kind` related to `item_id`.
    ///
    /// Overlap pass first; zero rows or a backend failure falls back to
    /// the most recently created items. Never errors and never includes
    /// the source item.
    pub async fn find_related(
        &self,
        kind: CatalogKind,
        item_id: &str,
        genres: &[String],
        limit: usize,
    ) -> Vec<CatalogItem> {
        match self.overlap_query(kind, item_id, genres, limit).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => self.recency_fallback(kind, item_id, limit).await,
            Err(e) => {
                warn!("Related-content query failed for {} {}: {}", kind, item_id, e);
                self.recency_fallback(kind, item_id, limit).await
            }
        }
    }

    async fn overlap_query(
        &self,
        kind: CatalogKind,
        item_id: &str,
        genres: &[String],
        limit: usize,
    ) -> anyhow::Result<Vec<CatalogItem>> {
        if genres.is_empty() {
            return Ok(Vec::new());
        }

        // Genres live in a JSON column, so the overlap test runs here
        // rather than in SQL.
        let mut matched: Vec<CatalogItem> = self
            .store
            .list_items(kind)
            .await?
            .into_iter()
            .filter(|item| item.id != item_id && item.shares_genre(genres))
            .collect();

        sort_by_relevance(&mut matched);
        matched.truncate(limit);
        Ok(matched)
    }

    async fn recency_fallback(
        &self,
        kind: CatalogKind,
        item_id: &str,
        limit: usize,
    ) -> Vec<CatalogItem> {
        match self
            .store
            .recent_items(kind, limit as u64, Some(item_id))
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!("Related-content fallback failed for {} {}: {}", kind, item_id, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, rating: Option<f32>, created_at: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            kind: CatalogKind::Movie,
            title: id.to_string(),
            original_title: None,
            slug: None,
            genres: vec![],
            date: None,
            rating,
            poster_url: None,
            overview: None,
            stream_servers: vec![],
            seasons: vec![],
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn ordering_prefers_rating_then_recency() {
        let mut items = vec![
            item("c", None, "2024-03-01T00:00:00Z"),
            item("a", Some(7.1), "2024-01-01T00:00:00Z"),
            item("b", Some(8.9), "2023-01-01T00:00:00Z"),
            item("d", Some(7.1), "2024-02-01T00:00:00Z"),
        ];
        sort_by_relevance(&mut items);

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        // Highest rating first; rating ties broken by recency; unrated last.
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn ordering_is_stable_for_full_ties() {
        let mut items = vec![
            item("z", Some(5.0), "2024-01-01T00:00:00Z"),
            item("a", Some(5.0), "2024-01-01T00:00:00Z"),
        ];
        sort_by_relevance(&mut items);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[1].id, "z");
    }
}
