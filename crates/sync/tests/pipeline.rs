//! End-to-end sync runs against a mock catalog and a real database.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;
use sqlx::PgPool;

use multiverse_db::repositories::CharacterRepo;
use multiverse_sync::catalog::seed_url;
use multiverse_sync::fetcher::HttpFetcher;
use multiverse_sync::retry::{RetryConfig, RetryPolicy};
use multiverse_sync::store::PgCharacterStore;
use multiverse_sync::{SyncError, SyncRunner};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn character(id: i64, name: &str, origin: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": origin, "url": "" },
        "location": { "name": "Citadel of Ricks", "url": "" },
        "image": format!("http://x/{id}.jpeg"),
        "url": format!("http://x/{id}"),
        "created": "2020-01-01T00:00:00Z"
    })
}

fn page_body(results: Vec<serde_json::Value>, next: Option<String>) -> String {
    json!({ "info": { "count": results.len(), "next": next }, "results": results }).to_string()
}

fn runner(pool: PgPool) -> SyncRunner<HttpFetcher, PgCharacterStore> {
    let fetcher = HttpFetcher::new(std::time::Duration::from_secs(5)).unwrap();
    let retry = RetryPolicy::new(RetryConfig {
        budget: std::time::Duration::from_secs(3),
        ..Default::default()
    });
    SyncRunner::new(fetcher, PgCharacterStore::new(pool), retry)
}

fn seed_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("species".into(), "Human".into()),
        Matcher::UrlEncoded("status".into(), "Alive".into()),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn three_pages_are_fetched_filtered_and_stored(pool: PgPool) {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let p1 = server
        .mock("GET", "/api/character")
        .match_query(seed_query())
        .with_status(200)
        .with_body(page_body(
            vec![character(42, "Rick", "Earth (C-137)"), character(2, "Bare", "Earth")],
            Some(format!("{base}/page/2")),
        ))
        .expect(1)
        .create_async()
        .await;
    let p2 = server
        .mock("GET", "/page/2")
        .with_status(200)
        .with_body(page_body(
            vec![character(3, "Summer", "Earth (Replacement Dimension)")],
            Some(format!("{base}/page/3")),
        ))
        .expect(1)
        .create_async()
        .await;
    let p3 = server
        .mock("GET", "/page/3")
        .with_status(200)
        .with_body(page_body(vec![character(4, "Beth", "Earth (C-137)")], None))
        .expect(1)
        .create_async()
        .await;

    let seed = seed_url(&format!("{base}/api/character")).unwrap();
    let summary = runner(pool.clone()).sync_all(&seed).await.unwrap();

    p1.assert_async().await;
    p2.assert_async().await;
    p3.assert_async().await;

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.seen, 3);
    assert_eq!(summary.created, 3);

    let rick = CharacterRepo::find_by_id(&pool, 42).await.unwrap().unwrap();
    assert_eq!(rick.origin_name, "Earth (C-137)");
    assert_eq!(rick.created, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    assert!(CharacterRepo::find_by_id(&pool, 2).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resync_updates_existing_rows(pool: PgPool) {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let first = server
        .mock("GET", "/api/character")
        .match_query(seed_query())
        .with_status(200)
        .with_body(page_body(vec![character(42, "Rick", "Earth (C-137)")], None))
        .create_async()
        .await;

    let seed = seed_url(&format!("{base}/api/character")).unwrap();
    let summary = runner(pool.clone()).sync_all(&seed).await.unwrap();
    assert_eq!((summary.created, summary.updated), (1, 0));
    first.remove_async().await;

    server
        .mock("GET", "/api/character")
        .match_query(seed_query())
        .with_status(200)
        .with_body(page_body(vec![character(42, "Rick Sanchez", "Earth (C-137)")], None))
        .create_async()
        .await;

    let summary = runner(pool.clone()).sync_all(&seed).await.unwrap();
    assert_eq!((summary.created, summary.updated), (0, 1));

    let rick = CharacterRepo::find_by_id(&pool, 42).await.unwrap().unwrap();
    assert_eq!(rick.name, "Rick Sanchez");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permanent_http_error_aborts_after_partial_progress(pool: PgPool) {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/api/character")
        .match_query(seed_query())
        .with_status(200)
        .with_body(page_body(
            vec![character(1, "Rick", "Earth (C-137)")],
            Some(format!("{base}/page/2")),
        ))
        .create_async()
        .await;
    let gone = server
        .mock("GET", "/page/2")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let seed = seed_url(&format!("{base}/api/character")).unwrap();
    let err = runner(pool.clone()).sync_all(&seed).await.unwrap_err();

    assert_matches!(err, SyncError::HttpStatus { status: 404 });
    gone.assert_async().await;
    assert!(CharacterRepo::find_by_id(&pool, 1).await.unwrap().is_some());
}
