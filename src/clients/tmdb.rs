use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

const TMDB_API: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub genre_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbTv {
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub genre_ids: Option<Vec<i64>>,
    pub number_of_seasons: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSeason {
    pub season_number: i32,
    pub episodes: Vec<TmdbEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbEpisode {
    pub episode_number: i32,
    pub name: Option<String>,
}

pub fn poster_url(poster_path: &str) -> String {
    format!("{TMDB_IMAGE_BASE}{poster_path}")
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(client: Client, api_key: String, language: String) -> Self {
        Self {
            client,
            api_key,
            language,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(Some(response.json().await?))
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<TmdbMovie>> {
        let url = format!(
            "{}/search/movie?api_key={}&language={}&query={}",
            TMDB_API,
            self.api_key,
            self.language,
            urlencoding::encode(query)
        );

        let response: Option<TmdbSearchResponse<TmdbMovie>> = self.get_json(&url).await?;
        Ok(response.map(|r| r.results).unwrap_or_default())
    }

    pub async fn search_tv(&self, query: &str) -> Result<Vec<TmdbTv>> {
        let url = format!(
            "{}/search/tv?api_key={}&language={}&query={}",
            TMDB_API,
            self.api_key,
            self.language,
            urlencoding::encode(query)
        );

        let response: Option<TmdbSearchResponse<TmdbTv>> = self.get_json(&url).await?;
        Ok(response.map(|r| r.results).unwrap_or_default())
    }

    pub async fn get_movie(&self, tmdb_id: i64) -> Result<Option<TmdbMovie>> {
        let url = format!(
            "{}/movie/{}?api_key={}&language={}",
            TMDB_API, tmdb_id, self.api_key, self.language
        );
        self.get_json(&url).await
    }

    pub async fn get_tv(&self, tmdb_id: i64) -> Result<Option<TmdbTv>> {
        let url = format!(
            "{}/tv/{}?api_key={}&language={}",
            TMDB_API, tmdb_id, self.api_key, self.language
        );
        self.get_json(&url).await
    }

    pub async fn get_season(&self, tmdb_id: i64, season_number: i32) -> Result<Option<TmdbSeason>> {
        let url = format!(
            "{}/tv/{}/season/{}?api_key={}&language={}",
            TMDB_API, tmdb_id, season_number, self.api_key, self.language
        );
        self.get_json(&url).await
    }
}
