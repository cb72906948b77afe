use serde::{Deserialize, Serialize};

use crate::catalog::player::{PlaybackMode, ServerGroup, classify_playback};
use crate::db::{FeaturedEntry, MovieDraft, SeriesDraft};
use crate::models::catalog::{CatalogItem, CatalogKind, Season, StreamServer};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitleDto {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub original_title: Option<String>,
    pub slug: String,
    pub genres: Vec<String>,
    pub date: Option<String>,
    pub year: Option<String>,
    pub rating: Option<f32>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub stream_servers: Vec<StreamServer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<Season>,
    pub created_at: String,
}

impl From<CatalogItem> for TitleDto {
    fn from(item: CatalogItem) -> Self {
        let slug = item.effective_slug();
        let year = item.year().map(str::to_string);
        Self {
            id: item.id,
            kind: item.kind.as_str().to_string(),
            title: item.title,
            original_title: item.original_title,
            slug,
            genres: item.genres,
            date: item.date,
            year,
            rating: item.rating,
            poster_url: item.poster_url,
            overview: item.overview,
            stream_servers: item.stream_servers,
            seasons: item.seasons,
            created_at: item.created_at,
        }
    }
}

/// One playable entry of the flattened server list.
#[derive(Debug, Serialize)]
pub struct ServerOptionDto {
    pub index: usize,
    pub name: String,
    pub url: String,
    pub quality: Option<String>,
    pub language: String,
    #[serde(flatten)]
    pub playback: PlaybackMode,
}

#[derive(Debug, Serialize)]
pub struct ServerListDto {
    pub groups: Vec<ServerGroup>,
    pub options: Vec<ServerOptionDto>,
    pub selected_index: usize,
}

impl ServerListDto {
    #[must_use]
    pub fn build(groups: Vec<ServerGroup>) -> Self {
        let mut options = Vec::new();
        for group in &groups {
            for server in &group.servers {
                options.push(ServerOptionDto {
                    index: options.len(),
                    name: server.name.clone(),
                    url: server.url.clone(),
                    quality: server.quality.clone(),
                    language: group.language.clone(),
                    playback: classify_playback(&server.url),
                });
            }
        }
        Self {
            groups,
            options,
            selected_index: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreCountDto {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct FeaturedDto {
    pub id: i32,
    pub position: i32,
    pub item: TitleDto,
}

#[derive(Debug, Serialize)]
pub struct PopularDto {
    pub views: i64,
    pub item: TitleDto,
}

pub fn featured_dto(entry: FeaturedEntry, item: CatalogItem) -> FeaturedDto {
    FeaturedDto {
        id: entry.id,
        position: entry.position,
        item: item.into(),
    }
}

/// Incoming create/update payload for both record kinds. Series ignore
/// `release_date` in favor of `first_air_date` and may carry seasons.
#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub stream_servers: Vec<StreamServer>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl TitleRequest {
    #[must_use]
    pub fn into_movie_draft(self) -> MovieDraft {
        MovieDraft {
            title: self.title,
            original_title: self.original_title,
            slug: self.slug,
            genres: self.genres,
            release_date: self.release_date.or(self.first_air_date),
            rating: self.rating,
            poster_url: self.poster_url,
            overview: self.overview,
            stream_servers: self.stream_servers,
        }
    }

    #[must_use]
    pub fn into_series_draft(self) -> SeriesDraft {
        SeriesDraft {
            title: self.title,
            original_title: self.original_title,
            slug: self.slug,
            genres: self.genres,
            first_air_date: self.first_air_date.or(self.release_date),
            rating: self.rating,
            poster_url: self.poster_url,
            overview: self.overview,
            stream_servers: self.stream_servers,
            seasons: self.seasons,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeaturedRequest {
    pub kind: CatalogKind,
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<i32>,
}
