use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

const OMDB_API: &str = "https://www.omdbapi.com";

/// OMDb wraps errors in a 200 response with `Response: "False"`, so the
/// payload itself has to be inspected.
#[derive(Debug, Deserialize)]
pub struct OmdbTitle {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type")]
    pub title_type: Option<String>,
}

impl OmdbTitle {
    /// Comma-separated genre string split into a list.
    pub fn genres(&self) -> Vec<String> {
        self.genre
            .as_deref()
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty() && *s != "N/A")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// OMDb uses the literal string "N/A" for absent fields.
    pub fn rating(&self) -> Option<f32> {
        self.imdb_rating
            .as_deref()
            .filter(|r| *r != "N/A")
            .and_then(|r| r.parse().ok())
    }
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
}

impl OmdbClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    pub async fn get_by_title(&self, title: &str, year: Option<&str>) -> Result<Option<OmdbTitle>> {
        let mut url = format!(
            "{}/?apikey={}&t={}&plot=full",
            OMDB_API,
            self.api_key,
            urlencoding::encode(title)
        );
        if let Some(year) = year {
            url.push_str(&format!("&y={year}"));
        }
        self.fetch(&url).await
    }

    pub async fn get_by_imdb_id(&self, imdb_id: &str) -> Result<Option<OmdbTitle>> {
        let url = format!(
            "{}/?apikey={}&i={}&plot=full",
            OMDB_API,
            self.api_key,
            urlencoding::encode(imdb_id)
        );
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &str) -> Result<Option<OmdbTitle>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OMDb API error: {} - {}", status, body));
        }

        let title: OmdbTitle = response.json().await?;
        if title.response == "True" {
            Ok(Some(title))
        } else if title
            .error
            .as_deref()
            .is_some_and(|e| e.contains("not found"))
        {
            Ok(None)
        } else {
            Err(anyhow::anyhow!(
                "OMDb API error: {}",
                title.error.unwrap_or_else(|| "unknown".to_string())
            ))
        }
    }
}
