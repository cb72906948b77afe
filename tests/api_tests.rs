use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cartelera::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20240102_seed_defaults.rs)
const DEFAULT_API_KEY: &str = "cartelera_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = cartelera::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    cartelera::api::router(state).await
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authed(method: &str, uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

async fn create_movie(app: &Router, payload: serde_json::Value) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(authed("POST", "/api/movies", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_auth_gate() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/system/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("Authorization", format!("Bearer {DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"username": "admin", "password": "wrong"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"username": "admin", "password": "cambiame"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["api_key"], DEFAULT_API_KEY);
}

#[tokio::test]
async fn test_movie_crud_requires_auth() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"title": "Sin permiso"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_movie_crud_and_slug_resolution() {
    let app = spawn_app().await;

    let created = create_movie(
        &app,
        serde_json::json!({
            "title": "Matrix Reloaded",
            "release_date": "2003-05-15",
            "genres": ["Acción", "Ciencia ficción"],
            "rating": 7.2,
            "stream_servers": [
                {"name": "Servidor 1", "url": "https://cdn.example.com/matrix.mp4", "language": "Español Latino"}
            ]
        }),
    )
    .await;

    assert_eq!(created["data"]["slug"], "matrix-reloaded-2003");
    assert_eq!(created["data"]["year"], "2003");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Canonical slug
    let response = app
        .clone()
        .oneshot(get("/api/movies/matrix-reloaded-2003"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Matrix Reloaded");

    // Yearless variant still resolves
    let response = app
        .clone()
        .oneshot(get("/api/movies/matrix-reloaded"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Raw id resolves too
    let response = app
        .clone()
        .oneshot(get(&format!("/api/movies/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unknown slug is a 404 with the envelope
    let response = app
        .clone()
        .oneshot(get("/api/movies/no-existe-1999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);

    // Update keeps the record reachable
    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/movies/{id}"),
            &serde_json::json!({
                "title": "Matrix Reloaded",
                "release_date": "2003-05-15",
                "genres": ["Acción"],
                "rating": 7.5
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delete, then the slug is gone
    let response = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/movies/{id}"),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/movies/matrix-reloaded-2003"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_movie_validation() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/movies",
            &serde_json::json!({"title": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/movies",
            &serde_json::json!({"title": "Mala nota", "rating": 11.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_related_prefers_genre_overlap() {
    let app = spawn_app().await;

    create_movie(
        &app,
        serde_json::json!({"title": "Base", "genres": ["Acción"], "release_date": "2020-01-01"}),
    )
    .await;
    create_movie(
        &app,
        serde_json::json!({"title": "Pariente", "genres": ["Acción", "Drama"], "release_date": "2021-01-01"}),
    )
    .await;
    create_movie(
        &app,
        serde_json::json!({"title": "Ajena", "genres": ["Comedia"], "release_date": "2022-01-01"}),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get("/api/movies/base/related"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Pariente"]);

    // Client-supplied limit caps the result set.
    let response = app
        .clone()
        .oneshot(get("/api/movies/base/related?limit=0"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_related_falls_back_to_recent() {
    let app = spawn_app().await;

    create_movie(
        &app,
        serde_json::json!({"title": "Solitaria", "genres": ["Terror"]}),
    )
    .await;
    create_movie(
        &app,
        serde_json::json!({"title": "Otra", "genres": ["Comedia"]}),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get("/api/movies/solitaria/related"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // No overlap, so recency fallback kicks in and excludes the source.
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Otra"]);
}

#[tokio::test]
async fn test_servers_grouped_by_language() {
    let app = spawn_app().await;

    create_movie(
        &app,
        serde_json::json!({
            "title": "Doblada",
            "stream_servers": [
                {"name": "L1", "url": "https://a.example.com/1.mp4", "language": "Español Latino"},
                {"name": "C1", "url": "https://b.example.com/embed/2", "language": "Castellano"},
                {"name": "L2", "url": "https://c.example.com/3", "language": "Español Latino"}
            ]
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get("/api/movies/doblada/servers"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let groups = body["data"]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["language"], "Español Latino");
    assert_eq!(groups[0]["servers"].as_array().unwrap().len(), 2);
    assert_eq!(groups[1]["language"], "Castellano");

    let options = body["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[0]["mode"], "native");
    assert_eq!(body["data"]["selected_index"], 0);
}

#[tokio::test]
async fn test_servers_demo_fallback() {
    let app = spawn_app().await;

    create_movie(&app, serde_json::json!({"title": "Vacía"})).await;

    let response = app
        .clone()
        .oneshot(get("/api/movies/vacia/servers"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let options = body["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["name"], "Demo");
}

#[tokio::test]
async fn test_series_episode_servers() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/series",
            &serde_json::json!({
                "title": "Cuentos Nocturnos",
                "first_air_date": "2021-09-17",
                "genres": ["Drama"],
                "stream_servers": [
                    {"name": "Serie-nivel", "url": "https://a.example.com/s.mp4"}
                ],
                "seasons": [{
                    "season_number": 1,
                    "episodes": [{
                        "episode_number": 1,
                        "title": "Piloto",
                        "stream_servers": [
                            {"name": "Ep-nivel", "url": "https://a.example.com/s1e1.mp4"}
                        ]
                    }]
                }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // Series slugs carry no year.
    assert_eq!(body["data"]["slug"], "cuentos-nocturnos");

    let response = app
        .clone()
        .oneshot(get("/api/series/cuentos-nocturnos/servers?season=1&episode=1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["options"][0]["name"], "Ep-nivel");

    // Unknown episode falls back to the series-level list.
    let response = app
        .clone()
        .oneshot(get("/api/series/cuentos-nocturnos/servers?season=1&episode=9"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["options"][0]["name"], "Serie-nivel");
}

#[tokio::test]
async fn test_search_and_genres() {
    let app = spawn_app().await;

    create_movie(
        &app,
        serde_json::json!({"title": "Matrix", "genres": ["Acción"]}),
    )
    .await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/series",
            &serde_json::json!({"title": "Matrix: La Serie", "genres": ["Drama"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/search?q=matrix")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/search?q=matrix&kind=movie"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app.clone().oneshot(get("/api/search?q=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get("/api/genres")).await.unwrap();
    let body = body_json(response).await;
    let genres: Vec<(&str, i64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| (g["genre"].as_str().unwrap(), g["count"].as_i64().unwrap()))
        .collect();
    assert_eq!(genres, vec![("Acción", 1), ("Drama", 1)]);
}

#[tokio::test]
async fn test_list_filters_by_genre_and_query() {
    let app = spawn_app().await;

    create_movie(
        &app,
        serde_json::json!({"title": "Ciudad de Acero", "genres": ["Acción"]}),
    )
    .await;
    create_movie(
        &app,
        serde_json::json!({"title": "Risas y Más", "genres": ["Comedia"]}),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get("/api/movies?genre=acci%C3%B3n"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Ciudad de Acero"]);

    let response = app.clone().oneshot(get("/api/movies?q=risas")).await.unwrap();
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Risas y Más"]);

    let response = app.clone().oneshot(get("/api/movies")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_featured_flow() {
    let app = spawn_app().await;

    let first = create_movie(&app, serde_json::json!({"title": "Primera"})).await;
    let second = create_movie(&app, serde_json::json!({"title": "Segunda"})).await;

    let mut entry_ids = Vec::new();
    for created in [&first, &second] {
        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                "/api/featured",
                &serde_json::json!({
                    "kind": "movie",
                    "item_id": created["data"]["id"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        entry_ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let response = app.clone().oneshot(get("/api/featured")).await.unwrap();
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["item"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Primera", "Segunda"]);

    // Reverse the order
    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            "/api/featured/order",
            &serde_json::json!({"ordered_ids": [entry_ids[1], entry_ids[0]]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/featured")).await.unwrap();
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["item"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Segunda", "Primera"]);

    let response = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/featured/{}", entry_ids[0]),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/featured")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_settings_seeded_and_updatable() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get("/api/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["site_name"], "Cartelera");

    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            "/api/settings",
            &serde_json::json!({"site_name": "Mi Cartelera", "theme": "dark"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["site_name"], "Mi Cartelera");
    assert_eq!(body["data"]["theme"], "dark");
    // Untouched keys survive partial updates.
    assert_eq!(body["data"]["site_tagline"], "Películas y series en español");
}

#[tokio::test]
async fn test_popular_counts_views() {
    let app = spawn_app().await;

    create_movie(&app, serde_json::json!({"title": "Vista", "release_date": "2024-03-01"})).await;
    create_movie(&app, serde_json::json!({"title": "Ignorada"})).await;

    // Each detail fetch counts one view.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/api/movies/vista-2024"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/api/popular")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries[0]["item"]["title"], "Vista");
    assert_eq!(entries[0]["views"], 2);
}

#[tokio::test]
async fn test_spa_fallback() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get("/pelicula/matrix")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
}
