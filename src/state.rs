use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::related::RelatedMatcher;
use crate::catalog::resolver::SlugResolver;
use crate::clients::omdb::OmdbClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::ImportService;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// One client is reused across all providers to enable connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Cartelera/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub resolver: Arc<SlugResolver>,

    pub related: Arc<RelatedMatcher>,

    pub import_service: Arc<ImportService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.metadata.request_timeout_seconds.into())?;

        let tmdb = if config.metadata.tmdb_api_key.is_empty() {
            None
        } else {
            Some(TmdbClient::new(
                http_client.clone(),
                config.metadata.tmdb_api_key.clone(),
                config.metadata.language.clone(),
            ))
        };

        let omdb = if config.metadata.omdb_api_key.is_empty() {
            None
        } else {
            Some(OmdbClient::new(
                http_client,
                config.metadata.omdb_api_key.clone(),
            ))
        };

        let import_service = Arc::new(ImportService::new(tmdb, omdb));
        let resolver = Arc::new(SlugResolver::new(store.clone()));
        let related = Arc::new(RelatedMatcher::new(store.clone()));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            resolver,
            related,
            import_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
