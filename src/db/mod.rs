use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::featured::FeaturedEntry;
pub use repositories::movie::MovieDraft;
pub use repositories::series::SeriesDraft;
pub use repositories::user::User;
pub use repositories::views::ViewCount;

use crate::models::catalog::{CatalogItem, CatalogKind};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // An in-memory database exists per connection, so the pool must
        // stay at a single connection for it to behave like one database.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn series_repo(&self) -> repositories::series::SeriesRepository {
        repositories::series::SeriesRepository::new(self.conn.clone())
    }

    fn featured_repo(&self) -> repositories::featured::FeaturedRepository {
        repositories::featured::FeaturedRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn views_repo(&self) -> repositories::views::ViewsRepository {
        repositories::views::ViewsRepository::new(self.conn.clone())
    }

    // -- movies ----------------------------------------------------------

    pub async fn add_movie(&self, draft: MovieDraft) -> Result<CatalogItem> {
        self.movie_repo().add(draft).await
    }

    pub async fn update_movie(&self, id: &str, draft: MovieDraft) -> Result<Option<CatalogItem>> {
        self.movie_repo().update(id, draft).await
    }

    pub async fn remove_movie(&self, id: &str) -> Result<bool> {
        let removed = self.movie_repo().remove(id).await?;
        if removed {
            self.views_repo().clear(CatalogKind::Movie, id).await?;
        }
        Ok(removed)
    }

    // -- series ----------------------------------------------------------

    pub async fn add_series(&self, draft: SeriesDraft) -> Result<CatalogItem> {
        self.series_repo().add(draft).await
    }

    pub async fn update_series(&self, id: &str, draft: SeriesDraft) -> Result<Option<CatalogItem>> {
        self.series_repo().update(id, draft).await
    }

    pub async fn remove_series(&self, id: &str) -> Result<bool> {
        let removed = self.series_repo().remove(id).await?;
        if removed {
            self.views_repo().clear(CatalogKind::Series, id).await?;
        }
        Ok(removed)
    }

    // -- kind-generic catalog access -------------------------------------

    pub async fn get_item(&self, kind: CatalogKind, id: &str) -> Result<Option<CatalogItem>> {
        match kind {
            CatalogKind::Movie => self.movie_repo().get(id).await,
            CatalogKind::Series => self.series_repo().get(id).await,
        }
    }

    pub async fn get_item_by_slug(
        &self,
        kind: CatalogKind,
        slug: &str,
    ) -> Result<Option<CatalogItem>> {
        match kind {
            CatalogKind::Movie => self.movie_repo().get_by_slug(slug).await,
            CatalogKind::Series => self.series_repo().get_by_slug(slug).await,
        }
    }

    pub async fn list_items(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>> {
        match kind {
            CatalogKind::Movie => self.movie_repo().list().await,
            CatalogKind::Series => self.series_repo().list().await,
        }
    }

    pub async fn search_items(&self, kind: CatalogKind, query: &str) -> Result<Vec<CatalogItem>> {
        match kind {
            CatalogKind::Movie => self.movie_repo().search(query).await,
            CatalogKind::Series => self.series_repo().search(query).await,
        }
    }

    pub async fn recent_items(
        &self,
        kind: CatalogKind,
        limit: u64,
        exclude_id: Option<&str>,
    ) -> Result<Vec<CatalogItem>> {
        match kind {
            CatalogKind::Movie => self.movie_repo().recent(limit, exclude_id).await,
            CatalogKind::Series => self.series_repo().recent(limit, exclude_id).await,
        }
    }

    // -- featured carousel -----------------------------------------------

    pub async fn list_featured(&self) -> Result<Vec<FeaturedEntry>> {
        self.featured_repo().list().await
    }

    pub async fn add_featured(&self, kind: CatalogKind, item_id: &str) -> Result<FeaturedEntry> {
        self.featured_repo().add(kind, item_id).await
    }

    pub async fn reorder_featured(&self, ordered_ids: &[i32]) -> Result<()> {
        self.featured_repo().reorder(ordered_ids).await
    }

    pub async fn remove_featured(&self, id: i32) -> Result<bool> {
        self.featured_repo().remove(id).await
    }

    // -- settings --------------------------------------------------------

    pub async fn get_settings(&self) -> Result<BTreeMap<String, String>> {
        self.settings_repo().all().await
    }

    pub async fn upsert_settings(&self, values: &BTreeMap<String, String>) -> Result<()> {
        self.settings_repo().upsert(values).await
    }

    // -- users -----------------------------------------------------------

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn update_user_password(&self, username: &str, new_password: &str) -> Result<()> {
        self.user_repo().update_password(username, new_password).await
    }

    pub async fn regenerate_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }

    // -- view counters ---------------------------------------------------

    pub async fn record_view(&self, kind: CatalogKind, item_id: &str) -> Result<i64> {
        self.views_repo().record(kind, item_id).await
    }

    pub async fn top_viewed(&self, limit: u64) -> Result<Vec<ViewCount>> {
        self.views_repo().top(limit).await
    }
}
