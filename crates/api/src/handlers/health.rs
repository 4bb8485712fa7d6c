//! Deep health probe: a database round-trip and a cache round-trip.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Key written and read back by the cache probe.
pub const PROBE_KEY: &str = "healthcheck:ping";
const PROBE_VALUE: &str = "pong";
const PROBE_TTL: Duration = Duration::from_secs(10);

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every check passed, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckResult,
    pub cache: CheckResult,
}

/// Outcome of a single probe.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            detail: None,
            error: Some(error.to_string()),
        }
    }
}

/// GET /healthcheck -- 200 when healthy, 503 when any probe fails.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;

    let healthy = database.ok && cache.ok;
    if !healthy {
        tracing::warn!(database = database.ok, cache = cache.ok, "Health check degraded");
    }

    let (code, status) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: HealthChecks { database, cache },
        }),
    )
}

async fn check_database(state: &AppState) -> CheckResult {
    match multiverse_db::health_check(&state.pool).await {
        Ok(row) => CheckResult {
            ok: row == 1,
            detail: Some(row.to_string()),
            error: None,
        },
        Err(e) => CheckResult::failed(e),
    }
}

async fn check_cache(state: &AppState) -> CheckResult {
    if let Err(e) = state.cache.set(PROBE_KEY, PROBE_VALUE, PROBE_TTL).await {
        return CheckResult::failed(e);
    }
    match state.cache.get(PROBE_KEY).await {
        Ok(value) => CheckResult {
            ok: value.as_deref() == Some(PROBE_VALUE),
            detail: None,
            error: None,
        },
        Err(e) => CheckResult::failed(e),
    }
}
