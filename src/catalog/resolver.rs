//! Slug-to-record resolution.
//!
//! Stored slugs can be missing, stale, or predate the current slug
//! algorithm, so resolution tolerates drift instead of demanding a
//! migration: an indexed lookup handles the common case and a variant
//! scan catches the rest.

use tracing::debug;

use crate::catalog::CatalogError;
use crate::db::Store;
use crate::models::catalog::{CatalogItem, CatalogKind};
use crate::slug::{generate_slug, is_uuid_shaped, strip_trailing_year};

/// Acceptable slug spellings for a candidate record.
fn slug_variants(item: &CatalogItem) -> Vec<String> {
    let mut variants = Vec::with_capacity(4);

    let title_slug = generate_slug(&item.title, None);
    if !title_slug.is_empty() {
        variants.push(title_slug.clone());
    }
    if let Some(year) = item.year() {
        variants.push(format!("{title_slug}-{year}"));
    }
    if let Some(stored) = &item.slug {
        if !stored.is_empty() && !variants.iter().any(|v| v == stored) {
            variants.push(stored.clone());
        }
    }

    variants
}

/// Whether `input` names this candidate under any tolerated spelling.
///
/// Matches the raw input, its slug-normalized form, and the input with a
/// trailing `-YYYY` stripped, against every variant both verbatim and
/// re-normalized.
fn matches_candidate(input: &str, item: &CatalogItem) -> bool {
    let normalized_input = generate_slug(input, None);
    let stripped = strip_trailing_year(input);

    for variant in slug_variants(item) {
        if input == variant || normalized_input == variant {
            return true;
        }
        let normalized_variant = generate_slug(&variant, None);
        if input == normalized_variant || normalized_input == normalized_variant {
            return true;
        }
        if let Some(base) = stripped {
            if base == variant || base == normalized_variant {
                return true;
            }
        }
    }

    false
}

pub struct SlugResolver {
    store: Store,
}

impl SlugResolver {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Resolve `input` (record id or slug) to a catalog record.
    ///
    /// Cascade, first hit wins:
    /// 1. UUID-shaped input: primary-key lookup.
    /// 2. Indexed equality on the stored slug column.
    /// 3. Scan all records of the kind against their slug variants.
    pub async fn resolve(
        &self,
        kind: CatalogKind,
        input: &str,
    ) -> Result<CatalogItem, CatalogError> {
        if input.is_empty() {
            return Err(CatalogError::not_found(kind, input));
        }

        if is_uuid_shaped(input) {
            if let Some(item) = self.store.get_item(kind, input).await? {
                return Ok(item);
            }
            debug!("No {} with id {}, falling through to slug lookup", kind, input);
        }

        if let Some(item) = self.store.get_item_by_slug(kind, input).await? {
            return Ok(item);
        }

        // Tolerance pass for drifted or legacy rows. Loads the whole
        // table; acceptable at catalog sizes this serves.
        let candidates = self.store.list_items(kind).await?;
        for item in candidates {
            if matches_candidate(input, &item) {
                debug!("Resolved {} '{}' via variant scan -> {}", kind, input, item.id);
                return Ok(item);
            }
        }

        Err(CatalogError::not_found(kind, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, slug: Option<&str>, date: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: "f81d4fae-7dec-41d0-a765-00a0c91e6bf6".to_string(),
            kind: CatalogKind::Movie,
            title: title.to_string(),
            original_title: None,
            slug: slug.map(str::to_string),
            genres: vec![],
            date: date.map(str::to_string),
            rating: None,
            poster_url: None,
            overview: None,
            stream_servers: vec![],
            seasons: vec![],
            created_at: String::new(),
        }
    }

    #[test]
    fn matches_fresh_slug() {
        let candidate = item("Matrix Reloaded", Some("matrix-reloaded-2003"), Some("2003-05-15"));
        assert!(matches_candidate("matrix-reloaded-2003", &candidate));
    }

    #[test]
    fn matches_yearless_stored_slug() {
        // Stored slug predates the year suffix; the year-stripped input
        // must still land on it.
        let candidate = item("Dune", Some("dune"), Some("2021-10-22"));
        assert!(matches_candidate("dune-2021", &candidate));
        assert!(matches_candidate("dune", &candidate));
    }

    #[test]
    fn matches_title_when_slug_missing() {
        let candidate = item("Ópera Nocturna", None, None);
        assert!(matches_candidate("opera-nocturna", &candidate));
    }

    #[test]
    fn matches_unnormalized_stored_slug() {
        // A stored slug written before diacritic stripping existed.
        let candidate = item("Ópera Nocturna", Some("ópera-nocturna"), None);
        assert!(matches_candidate("opera-nocturna", &candidate));
    }

    #[test]
    fn rejects_unrelated_input() {
        let candidate = item("Matrix Reloaded", Some("matrix-reloaded-2003"), Some("2003-05-15"));
        assert!(!matches_candidate("matrix", &candidate));
        assert!(!matches_candidate("dune-2021", &candidate));
    }
}
