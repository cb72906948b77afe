use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod assets;
pub mod auth;
mod catalog;
mod error;
mod import;
mod movies;
mod observability;
mod series;
mod system;
mod titles;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_expiry_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_expiry_minutes,
        )
    };

    let admin_routes = create_admin_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            i64::try_from(session_expiry_minutes).unwrap_or(480),
        )));

    let api_router = Router::new()
        .merge(admin_routes)
        .route("/movies", get(movies::list_movies))
        .route("/movies/{slug}", get(movies::get_movie))
        .route("/movies/{slug}/related", get(movies::related_movies))
        .route("/movies/{slug}/servers", get(movies::movie_servers))
        .route("/series", get(series::list_series))
        .route("/series/{slug}", get(series::get_series))
        .route("/series/{slug}/related", get(series::related_series))
        .route("/series/{slug}/servers", get(series::series_servers))
        .route("/search", get(catalog::search))
        .route("/genres", get(catalog::list_genres))
        .route("/featured", get(catalog::list_featured))
        .route("/settings", get(catalog::get_settings))
        .route("/popular", get(catalog::popular))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .fallback(assets::serve_asset)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::request_middleware))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", post(movies::add_movie))
        .route("/movies/{slug}", put(movies::update_movie))
        .route("/movies/{slug}", delete(movies::remove_movie))
        .route("/series", post(series::add_series))
        .route("/series/{slug}", put(series::update_series))
        .route("/series/{slug}", delete(series::remove_series))
        .route("/featured", post(catalog::add_featured))
        .route("/featured/order", put(catalog::reorder_featured))
        .route("/featured/{id}", delete(catalog::remove_featured))
        .route("/settings", put(catalog::update_settings))
        .route("/import/search", get(import::search_candidates))
        .route("/import", post(import::import_title))
        .route("/auth/password", put(auth::change_password))
        .route(
            "/auth/api-key/regenerate",
            post(auth::regenerate_api_key),
        )
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
