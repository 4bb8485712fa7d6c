//! `multiverse-sync` -- one-shot catalog ingestion.
//!
//! Walks the upstream character catalog from the seed query, upserts every
//! eligible character, and prints the run summary. Exits non-zero if the
//! run aborts; characters written before the failure are kept.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multiverse_sync::catalog;
use multiverse_sync::config::SyncConfig;
use multiverse_sync::fetcher::HttpFetcher;
use multiverse_sync::retry::RetryPolicy;
use multiverse_sync::store::PgCharacterStore;
use multiverse_sync::SyncRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multiverse_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SyncConfig::from_env().context("Invalid sync configuration")?;
    tracing::info!(
        catalog = %config.catalog_base_url,
        timeout_secs = config.http_timeout.as_secs(),
        budget_secs = config.retry.budget.as_secs(),
        policy = ?config.record_policy,
        "Loaded sync configuration",
    );

    let pool = multiverse_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    multiverse_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    let fetcher = HttpFetcher::new(config.http_timeout)?;
    let runner = SyncRunner::new(
        fetcher,
        PgCharacterStore::new(pool),
        RetryPolicy::new(config.retry.clone()),
    )
    .with_record_policy(config.record_policy);

    let seed = catalog::seed_url(&config.catalog_base_url)?;
    let summary = runner.sync_all(&seed).await.context("Catalog sync aborted")?;

    println!("{summary}");
    Ok(())
}
