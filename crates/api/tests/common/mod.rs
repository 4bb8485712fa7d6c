//! Shared harness for API integration tests.
//!
//! Each test binary pulls in only some of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use multiverse_api::cache::{Cache, MemoryCache};
use multiverse_api::config::ServerConfig;
use multiverse_api::router::build_app_router;
use multiverse_api::state::AppState;
use multiverse_db::models::character::UpsertCharacter;
use multiverse_db::repositories::CharacterRepo;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        cache_url: None,
    }
}

/// Build the full application router over `pool` with an in-memory cache.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_cache(pool, Arc::new(MemoryCache::new()))
}

/// Build the full application router with a caller-supplied cache backend.
pub fn build_test_app_with_cache(pool: PgPool, cache: Arc<dyn Cache>) -> Router {
    let state = AppState { pool, cache };
    build_app_router(state, &test_config())
}

/// Build the full application router with a caller-supplied configuration.
pub fn build_test_app_with_config(pool: PgPool, config: &ServerConfig) -> Router {
    let state = AppState {
        pool,
        cache: Arc::new(MemoryCache::new()),
    };
    build_app_router(state, config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Store a character row directly, bypassing the sync pipeline.
pub async fn seed_character(
    pool: &PgPool,
    id: i64,
    name: &str,
    species: &str,
    status: &str,
    origin: &str,
) {
    let input = UpsertCharacter {
        id,
        name: name.to_string(),
        status: status.to_string(),
        species: species.to_string(),
        character_type: String::new(),
        gender: "Female".to_string(),
        origin_name: origin.to_string(),
        origin_url: String::new(),
        location_name: "Earth (Replacement Dimension)".to_string(),
        location_url: String::new(),
        image: format!("https://catalog.test/avatar/{id}.jpeg"),
        url: format!("https://catalog.test/character/{id}"),
        created: Utc.with_ymd_and_hms(2017, 11, 4, 18, 48, 46).unwrap(),
    };
    CharacterRepo::upsert(pool, &input).await.unwrap();
}
