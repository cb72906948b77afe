//! Typed catalog domain model.
//!
//! Repositories parse rows into these types at the boundary, so the rest
//! of the crate never handles loosely-typed records.

use serde::{Deserialize, Serialize};

use crate::slug::{generate_slug, year_of};

/// The two catalog record kinds, stored in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Movie,
    Series,
}

impl CatalogKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, language/quality-tagged playable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamServer {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_number: i32,
    pub title: String,
    #[serde(default)]
    pub stream_servers: Vec<StreamServer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: i32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// A movie or series record. Movies carry an empty `seasons` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub kind: CatalogKind,
    pub title: String,
    pub original_title: Option<String>,
    pub slug: Option<String>,
    pub genres: Vec<String>,
    /// `release_date` for movies, `first_air_date` for series.
    pub date: Option<String>,
    pub rating: Option<f32>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub stream_servers: Vec<StreamServer>,
    pub seasons: Vec<Season>,
    pub created_at: String,
}

impl CatalogItem {
    /// Release/first-air year, as stored on the date field.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.date.as_deref().and_then(year_of)
    }

    /// The slug this item should resolve under: the stored one when
    /// present, otherwise freshly derived from title and year.
    #[must_use]
    pub fn effective_slug(&self) -> String {
        match &self.slug {
            Some(s) if !s.is_empty() => s.clone(),
            _ => generate_slug(&self.title, self.year()),
        }
    }

    /// Whether at least one genre label is shared with `genres`.
    #[must_use]
    pub fn shares_genre(&self, genres: &[String]) -> bool {
        self.genres.iter().any(|g| genres.iter().any(|other| other == g))
    }
}

/// Drop stream entries with an empty URL; they are never persisted.
#[must_use]
pub fn sanitize_servers(servers: Vec<StreamServer>) -> Vec<StreamServer> {
    servers
        .into_iter()
        .filter(|s| !s.url.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(url: &str) -> StreamServer {
        StreamServer {
            name: "x".to_string(),
            url: url.to_string(),
            quality: None,
            language: None,
        }
    }

    #[test]
    fn sanitize_drops_empty_urls() {
        let kept = sanitize_servers(vec![server(""), server("  "), server("https://a/v.mp4")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://a/v.mp4");
    }

    #[test]
    fn effective_slug_prefers_stored() {
        let mut item = CatalogItem {
            id: "id".to_string(),
            kind: CatalogKind::Movie,
            title: "Dune".to_string(),
            original_title: None,
            slug: Some("dune".to_string()),
            genres: vec![],
            date: Some("2021-10-22".to_string()),
            rating: None,
            poster_url: None,
            overview: None,
            stream_servers: vec![],
            seasons: vec![],
            created_at: String::new(),
        };
        assert_eq!(item.effective_slug(), "dune");

        item.slug = None;
        assert_eq!(item.effective_slug(), "dune-2021");
    }

    #[test]
    fn genre_overlap() {
        let item = CatalogItem {
            id: "id".to_string(),
            kind: CatalogKind::Series,
            title: "t".to_string(),
            original_title: None,
            slug: None,
            genres: vec!["Drama".to_string(), "Crimen".to_string()],
            date: None,
            rating: None,
            poster_url: None,
            overview: None,
            stream_servers: vec![],
            seasons: vec![],
            created_at: String::new(),
        };
        assert!(item.shares_genre(&["Crimen".to_string()]));
        assert!(!item.shares_genre(&["Comedia".to_string()]));
        assert!(!item.shares_genre(&[]));
    }
}
