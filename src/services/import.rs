//! Metadata import from external providers.
//!
//! Providers are queried for candidate records; a chosen candidate is then
//! fetched in full and mapped to a draft ready for the catalog. Stream
//! servers are never imported, only descriptive metadata.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::clients::omdb::OmdbClient;
use crate::clients::tmdb::{self, TmdbClient};
use crate::db::{MovieDraft, SeriesDraft};
use crate::models::catalog::{CatalogKind, Episode, Season};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Tmdb,
    Omdb,
}

impl Provider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tmdb => "tmdb",
            Self::Omdb => "omdb",
        }
    }
}

/// A provider-agnostic search candidate shown to the operator.
#[derive(Debug, Clone, Serialize)]
pub struct ImportCandidate {
    pub provider: Provider,
    pub provider_id: String,
    pub kind: CatalogKind,
    pub title: String,
    pub year: Option<String>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
}

pub struct ImportService {
    tmdb: Option<TmdbClient>,
    omdb: Option<OmdbClient>,
}

impl ImportService {
    pub fn new(tmdb: Option<TmdbClient>, omdb: Option<OmdbClient>) -> Self {
        Self { tmdb, omdb }
    }

    fn tmdb(&self) -> Result<&TmdbClient, CatalogError> {
        self.tmdb
            .as_ref()
            .ok_or_else(|| CatalogError::validation("TMDB API key is not configured"))
    }

    /// Search the preferred provider for candidates. TMDB when configured,
    /// OMDb otherwise.
    pub async fn search(
        &self,
        kind: CatalogKind,
        query: &str,
    ) -> Result<Vec<ImportCandidate>, CatalogError> {
        if let Some(tmdb) = &self.tmdb {
            let candidates = match kind {
                CatalogKind::Movie => tmdb
                    .search_movies(query)
                    .await
                    .map_err(|e| CatalogError::import("TMDB", e.to_string()))?
                    .into_iter()
                    .map(movie_candidate)
                    .collect(),
                CatalogKind::Series => tmdb
                    .search_tv(query)
                    .await
                    .map_err(|e| CatalogError::import("TMDB", e.to_string()))?
                    .into_iter()
                    .map(tv_candidate)
                    .collect(),
            };
            return Ok(candidates);
        }

        if let Some(omdb) = &self.omdb {
            let title = omdb
                .get_by_title(query, None)
                .await
                .map_err(|e| CatalogError::import("OMDb", e.to_string()))?;
            return Ok(title
                .and_then(|t| omdb_candidate(kind, &t))
                .into_iter()
                .collect());
        }

        Err(CatalogError::validation(
            "no metadata provider is configured",
        ))
    }

    /// Fetch the full record for a movie candidate and map it to a draft.
    pub async fn fetch_movie(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> Result<MovieDraft, CatalogError> {
        match provider {
            Provider::Tmdb => {
                let id = parse_tmdb_id(provider_id)?;
                let movie = self
                    .tmdb()?
                    .get_movie(id)
                    .await
                    .map_err(|e| CatalogError::import("TMDB", e.to_string()))?
                    .ok_or_else(|| CatalogError::not_found(CatalogKind::Movie, provider_id))?;
                Ok(tmdb_movie_draft(movie))
            }
            Provider::Omdb => {
                let title = self.fetch_omdb(provider_id).await?;
                Ok(omdb_movie_draft(&title))
            }
        }
    }

    /// Fetch the full record for a series candidate, including per-season
    /// episode skeletons when the provider exposes them.
    pub async fn fetch_series(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> Result<SeriesDraft, CatalogError> {
        match provider {
            Provider::Tmdb => {
                let id = parse_tmdb_id(provider_id)?;
                let tmdb = self.tmdb()?;
                let tv = tmdb
                    .get_tv(id)
                    .await
                    .map_err(|e| CatalogError::import("TMDB", e.to_string()))?
                    .ok_or_else(|| CatalogError::not_found(CatalogKind::Series, provider_id))?;

                let mut seasons = Vec::new();
                for season_number in 1..=tv.number_of_seasons.unwrap_or(0) {
                    let season = tmdb
                        .get_season(id, season_number)
                        .await
                        .map_err(|e| CatalogError::import("TMDB", e.to_string()))?;
                    if let Some(season) = season {
                        seasons.push(map_tmdb_season(&season));
                    }
                }

                Ok(tmdb_series_draft(tv, seasons))
            }
            Provider::Omdb => {
                let title = self.fetch_omdb(provider_id).await?;
                Ok(omdb_series_draft(&title))
            }
        }
    }

    async fn fetch_omdb(&self, imdb_id: &str) -> Result<crate::clients::omdb::OmdbTitle, CatalogError> {
        let omdb = self
            .omdb
            .as_ref()
            .ok_or_else(|| CatalogError::validation("OMDb API key is not configured"))?;
        omdb.get_by_imdb_id(imdb_id)
            .await
            .map_err(|e| CatalogError::import("OMDb", e.to_string()))?
            .ok_or_else(|| CatalogError::not_found(CatalogKind::Movie, imdb_id))
    }
}

fn parse_tmdb_id(provider_id: &str) -> Result<i64, CatalogError> {
    provider_id
        .parse()
        .map_err(|_| CatalogError::validation(format!("invalid TMDB id '{provider_id}'")))
}

fn year_of_date(date: Option<&str>) -> Option<String> {
    date.and_then(crate::slug::year_of).map(str::to_string)
}

fn movie_candidate(movie: tmdb::TmdbMovie) -> ImportCandidate {
    ImportCandidate {
        provider: Provider::Tmdb,
        provider_id: movie.id.to_string(),
        kind: CatalogKind::Movie,
        year: year_of_date(movie.release_date.as_deref()),
        title: movie.title,
        poster_url: movie.poster_path.as_deref().map(tmdb::poster_url),
        overview: movie.overview,
    }
}

fn tv_candidate(tv: tmdb::TmdbTv) -> ImportCandidate {
    ImportCandidate {
        provider: Provider::Tmdb,
        provider_id: tv.id.to_string(),
        kind: CatalogKind::Series,
        year: year_of_date(tv.first_air_date.as_deref()),
        title: tv.name,
        poster_url: tv.poster_path.as_deref().map(tmdb::poster_url),
        overview: tv.overview,
    }
}

fn omdb_candidate(
    kind: CatalogKind,
    title: &crate::clients::omdb::OmdbTitle,
) -> Option<ImportCandidate> {
    Some(ImportCandidate {
        provider: Provider::Omdb,
        provider_id: title.imdb_id.clone()?,
        kind,
        title: title.title.clone()?,
        year: title.year.clone(),
        poster_url: title.poster.clone().filter(|p| p != "N/A"),
        overview: title.plot.clone(),
    })
}

fn tmdb_genres(genres: Option<Vec<tmdb::TmdbGenre>>) -> Vec<String> {
    genres
        .unwrap_or_default()
        .into_iter()
        .map(|g| g.name)
        .collect()
}

fn tmdb_movie_draft(movie: tmdb::TmdbMovie) -> MovieDraft {
    MovieDraft {
        title: movie.title,
        original_title: movie.original_title,
        slug: None,
        genres: tmdb_genres(movie.genres),
        release_date: movie.release_date,
        rating: movie.vote_average,
        poster_url: movie.poster_path.as_deref().map(tmdb::poster_url),
        overview: movie.overview,
        stream_servers: Vec::new(),
    }
}

fn tmdb_series_draft(tv: tmdb::TmdbTv, seasons: Vec<Season>) -> SeriesDraft {
    SeriesDraft {
        title: tv.name,
        original_title: tv.original_name,
        slug: None,
        genres: tmdb_genres(tv.genres),
        first_air_date: tv.first_air_date,
        rating: tv.vote_average,
        poster_url: tv.poster_path.as_deref().map(tmdb::poster_url),
        overview: tv.overview,
        stream_servers: Vec::new(),
        seasons,
    }
}

fn map_tmdb_season(season: &tmdb::TmdbSeason) -> Season {
    Season {
        season_number: season.season_number,
        episodes: season
            .episodes
            .iter()
            .map(|e| Episode {
                episode_number: e.episode_number,
                title: e
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Episodio {}", e.episode_number)),
                stream_servers: Vec::new(),
            })
            .collect(),
    }
}

fn omdb_movie_draft(title: &crate::clients::omdb::OmdbTitle) -> MovieDraft {
    MovieDraft {
        title: title.title.clone().unwrap_or_default(),
        original_title: None,
        slug: None,
        genres: title.genres(),
        release_date: title.year.clone(),
        rating: title.rating(),
        poster_url: title.poster.clone().filter(|p| p != "N/A"),
        overview: title.plot.clone(),
        stream_servers: Vec::new(),
    }
}

fn omdb_series_draft(title: &crate::clients::omdb::OmdbTitle) -> SeriesDraft {
    let movie = omdb_movie_draft(title);
    SeriesDraft {
        title: movie.title,
        original_title: movie.original_title,
        slug: None,
        genres: movie.genres,
        first_air_date: movie.release_date,
        rating: movie.rating,
        poster_url: movie.poster_url,
        overview: movie.overview,
        stream_servers: Vec::new(),
        seasons: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_extraction_takes_leading_digits() {
        assert_eq!(year_of_date(Some("2003-05-15")), Some("2003".to_string()));
        assert_eq!(year_of_date(Some("")), None);
        assert_eq!(year_of_date(None), None);
        // Dates with multi-byte characters must not panic on slicing.
        assert_eq!(year_of_date(Some("20\u{2013}3")), None);
        assert_eq!(year_of_date(Some("día 2003")), None);
    }

    #[test]
    fn tmdb_movie_maps_to_draft() {
        let movie = tmdb::TmdbMovie {
            id: 603,
            title: "Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            release_date: Some("1999-03-31".to_string()),
            overview: Some("Un hacker descubre la verdad.".to_string()),
            vote_average: Some(8.2),
            poster_path: Some("/abc.jpg".to_string()),
            genres: Some(vec![tmdb::TmdbGenre {
                id: 28,
                name: "Acción".to_string(),
            }]),
            genre_ids: None,
        };

        let draft = tmdb_movie_draft(movie);
        assert_eq!(draft.title, "Matrix");
        assert_eq!(draft.genres, vec!["Acción"]);
        assert_eq!(
            draft.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert!(draft.stream_servers.is_empty());
    }

    #[test]
    fn tmdb_season_maps_episode_skeletons() {
        let season = tmdb::TmdbSeason {
            season_number: 1,
            episodes: vec![
                tmdb::TmdbEpisode {
                    episode_number: 1,
                    name: Some("Piloto".to_string()),
                },
                tmdb::TmdbEpisode {
                    episode_number: 2,
                    name: None,
                },
            ],
        };

        let mapped = map_tmdb_season(&season);
        assert_eq!(mapped.episodes[0].title, "Piloto");
        assert_eq!(mapped.episodes[1].title, "Episodio 2");
        assert!(mapped.episodes[0].stream_servers.is_empty());
    }
}
