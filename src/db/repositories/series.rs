use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entities::{prelude::*, series};
use crate::models::catalog::{sanitize_servers, CatalogItem, CatalogKind, Season, StreamServer};
use crate::slug::generate_slug;

#[derive(Debug, Clone)]
pub struct SeriesDraft {
    pub title: String,
    pub original_title: Option<String>,
    pub slug: Option<String>,
    pub genres: Vec<String>,
    pub first_air_date: Option<String>,
    pub rating: Option<f32>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub stream_servers: Vec<StreamServer>,
    pub seasons: Vec<Season>,
}

pub struct SeriesRepository {
    conn: DatabaseConnection,
}

fn map_model(model: series::Model) -> CatalogItem {
    CatalogItem {
        id: model.id,
        kind: CatalogKind::Series,
        title: model.title,
        original_title: model.original_title,
        slug: model.slug,
        genres: model
            .genres
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        date: model.first_air_date,
        rating: model.rating,
        poster_url: model.poster_url,
        overview: model.overview,
        stream_servers: model
            .stream_servers
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        seasons: model
            .seasons
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        created_at: model.created_at,
    }
}

/// Strip empty-URL servers from every episode before persisting.
fn sanitize_seasons(seasons: Vec<Season>) -> Vec<Season> {
    seasons
        .into_iter()
        .map(|mut season| {
            for episode in &mut season.episodes {
                episode.stream_servers =
                    sanitize_servers(std::mem::take(&mut episode.stream_servers));
            }
            season
        })
        .collect()
}

impl SeriesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Disambiguate a slug already held by another row; same-titled
    /// series otherwise collide on the unique index.
    async fn free_slug(&self, desired: &str, exclude_id: Option<&str>) -> Result<String> {
        let mut candidate = desired.to_string();
        let mut suffix = 2;
        loop {
            let holder = Series::find()
                .filter(series::Column::Slug.eq(candidate.as_str()))
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

    pub async fn add(&self, draft: SeriesDraft) -> Result<CatalogItem> {
        let id = uuid::Uuid::new_v4().to_string();
        // Series slugs omit the first-air year; only movies carry one.
        let slug = match &draft.slug {
            Some(s) if !s.is_empty() => s.clone(),
            _ => generate_slug(&draft.title, None),
        };
        let slug = self.free_slug(&slug, None).await?;
        let servers = sanitize_servers(draft.stream_servers);
        let seasons = sanitize_seasons(draft.seasons);
        let now = chrono::Utc::now().to_rfc3339();

        let active = series::ActiveModel {
            id: Set(id.clone()),
            title: Set(draft.title.clone()),
            original_title: Set(draft.original_title),
            slug: Set(Some(slug)),
            genres: Set(serde_json::to_string(&draft.genres).ok()),
            first_air_date: Set(draft.first_air_date),
            rating: Set(draft.rating),
            poster_url: Set(draft.poster_url),
            overview: Set(draft.overview),
            stream_servers: Set(serde_json::to_string(&servers).ok()),
            seasons: Set(serde_json::to_string(&seasons).ok()),
            created_at: Set(now),
        };

        let model = active.insert(&self.conn).await?;
        info!("Added series: {} ({})", draft.title, id);
        Ok(map_model(model))
    }

    pub async fn get(&self, id: &str) -> Result<Option<CatalogItem>> {
        let model = Series::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(map_model))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogItem>> {
        let model = Series::find()
            .filter(series::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;
        Ok(model.map(map_model))
    }

    pub async fn list(&self) -> Result<Vec<CatalogItem>> {
        let rows = Series::find()
            .order_by_asc(series::Column::Title)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(map_model).collect())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let rows = Series::find()
            .filter(
                series::Column::Title
                    .contains(query)
                    .or(series::Column::OriginalTitle.contains(query)),
            )
            .order_by_asc(series::Column::Title)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(map_model).collect())
    }

    pub async fn recent(&self, limit: u64, exclude_id: Option<&str>) -> Result<Vec<CatalogItem>> {
        let mut query = Series::find()
            .order_by_desc(series::Column::CreatedAt)
            .order_by_desc(series::Column::Id)
            .limit(limit);
        if let Some(id) = exclude_id {
            query = query.filter(series::Column::Id.ne(id));
        }
        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(map_model).collect())
    }

    pub async fn update(&self, id: &str, draft: SeriesDraft) -> Result<Option<CatalogItem>> {
        let Some(existing) = Series::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let slug = match &draft.slug {
            Some(s) if !s.is_empty() => Some(self.free_slug(s, Some(id)).await?),
            _ => existing.slug.clone(),
        };
        let servers = sanitize_servers(draft.stream_servers);
        let seasons = sanitize_seasons(draft.seasons);

        let mut active: series::ActiveModel = existing.into();
        active.title = Set(draft.title);
        active.original_title = Set(draft.original_title);
        active.slug = Set(slug);
        active.genres = Set(serde_json::to_string(&draft.genres).ok());
        active.first_air_date = Set(draft.first_air_date);
        active.rating = Set(draft.rating);
        active.poster_url = Set(draft.poster_url);
        active.overview = Set(draft.overview);
        active.stream_servers = Set(serde_json::to_string(&servers).ok());
        active.seasons = Set(serde_json::to_string(&seasons).ok());

        let model = active.update(&self.conn).await?;
        Ok(Some(map_model(model)))
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = Series::delete_by_id(id).exec(&self.conn).await?;
        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed series: {}", id);
        }
        Ok(removed)
    }
}
