use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entities::{movies, prelude::*};
use crate::models::catalog::{sanitize_servers, CatalogItem, CatalogKind, StreamServer};
use crate::slug::generate_slug;

/// Fields accepted when creating or replacing a movie. The id, slug and
/// creation timestamp are filled in by the repository.
#[derive(Debug, Clone)]
pub struct MovieDraft {
    pub title: String,
    pub original_title: Option<String>,
    pub slug: Option<String>,
    pub genres: Vec<String>,
    pub release_date: Option<String>,
    pub rating: Option<f32>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub stream_servers: Vec<StreamServer>,
}

pub struct MovieRepository {
    conn: DatabaseConnection,
}

fn map_model(model: movies::Model) -> CatalogItem {
    CatalogItem {
        id: model.id,
        kind: CatalogKind::Movie,
        title: model.title,
        original_title: model.original_title,
        slug: model.slug,
        genres: model
            .genres
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        date: model.release_date,
        rating: model.rating,
        poster_url: model.poster_url,
        overview: model.overview,
        stream_servers: model
            .stream_servers
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        seasons: Vec::new(),
        created_at: model.created_at,
    }
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Disambiguate a slug already held by another row. Two records with
    /// the same title and year generate the same slug; a numeric suffix
    /// keeps the unique index satisfied instead of failing the insert.
    async fn free_slug(&self, desired: &str, exclude_id: Option<&str>) -> Result<String> {
        let mut candidate = desired.to_string();
        let mut suffix = 2;
        loop {
            let holder = Movies::find()
                .filter(movies::Column::Slug.eq(candidate.as_str()))
                .one(&self.conn)
                .await?;
            let taken = holder.is_some_and(|m| exclude_id != Some(m.id.as_str()));
            if !taken {
                return Ok(candidate);
            }
            candidate = format!("{desired}-{suffix}");
            suffix += 1;
        }
    }

    pub async fn add(&self, draft: MovieDraft) -> Result<CatalogItem> {
        let id = uuid::Uuid::new_v4().to_string();
        let year = draft
            .release_date
            .as_deref()
            .and_then(crate::slug::year_of)
            .map(str::to_string);
        let slug = match &draft.slug {
            Some(s) if !s.is_empty() => s.clone(),
            _ => generate_slug(&draft.title, year.as_deref()),
        };
        let slug = self.free_slug(&slug, None).await?;
        let servers = sanitize_servers(draft.stream_servers);
        let now = chrono::Utc::now().to_rfc3339();

        let active = movies::ActiveModel {
            id: Set(id.clone()),
            title: Set(draft.title.clone()),
            original_title: Set(draft.original_title),
            slug: Set(Some(slug)),
            genres: Set(serde_json::to_string(&draft.genres).ok()),
            release_date: Set(draft.release_date),
            rating: Set(draft.rating),
            poster_url: Set(draft.poster_url),
            overview: Set(draft.overview),
            stream_servers: Set(serde_json::to_string(&servers).ok()),
            created_at: Set(now),
        };

        let model = active.insert(&self.conn).await?;
        info!("Added movie: {} ({})", draft.title, id);
        Ok(map_model(model))
    }

    pub async fn get(&self, id: &str) -> Result<Option<CatalogItem>> {
        let model = Movies::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(map_model))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogItem>> {
        let model = Movies::find()
            .filter(movies::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;
        Ok(model.map(map_model))
    }

    pub async fn list(&self) -> Result<Vec<CatalogItem>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Title)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(map_model).collect())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let rows = Movies::find()
            .filter(
                movies::Column::Title
                    .contains(query)
                    .or(movies::Column::OriginalTitle.contains(query)),
            )
            .order_by_asc(movies::Column::Title)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(map_model).collect())
    }

    /// Most recently created movies, newest first, excluding one id.
    pub async fn recent(&self, limit: u64, exclude_id: Option<&str>) -> Result<Vec<CatalogItem>> {
        let mut query = Movies::find()
            .order_by_desc(movies::Column::CreatedAt)
            .order_by_desc(movies::Column::Id)
            .limit(limit);
        if let Some(id) = exclude_id {
            query = query.filter(movies::Column::Id.ne(id));
        }
        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(map_model).collect())
    }

    /// Full replacement of a movie's editable fields. Last write wins;
    /// the stored slug is kept unless the draft supplies one.
    pub async fn update(&self, id: &str, draft: MovieDraft) -> Result<Option<CatalogItem>> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let slug = match &draft.slug {
            Some(s) if !s.is_empty() => Some(self.free_slug(s, Some(id)).await?),
            _ => existing.slug.clone(),
        };
        let servers = sanitize_servers(draft.stream_servers);

        let mut active: movies::ActiveModel = existing.into();
        active.title = Set(draft.title);
        active.original_title = Set(draft.original_title);
        active.slug = Set(slug);
        active.genres = Set(serde_json::to_string(&draft.genres).ok());
        active.release_date = Set(draft.release_date);
        active.rating = Set(draft.rating);
        active.poster_url = Set(draft.poster_url);
        active.overview = Set(draft.overview);
        active.stream_servers = Set(serde_json::to_string(&servers).ok());

        let model = active.update(&self.conn).await?;
        Ok(Some(map_model(model)))
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = Movies::delete_by_id(id).exec(&self.conn).await?;
        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie: {}", id);
        }
        Ok(removed)
    }
}
