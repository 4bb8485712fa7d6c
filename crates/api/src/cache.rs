//! Key/value cache used by the health probe.
//!
//! [`RedisCache`] talks to a shared Redis instance when `CACHE_URL` is set;
//! [`MemoryCache`] keeps entries in process otherwise.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Errors raised by a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// String key/value store with per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the live value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
}

// ---------------------------------------------------------------------------
// Redis
// ---------------------------------------------------------------------------

/// Redis-backed cache over a reconnecting [`ConnectionManager`].
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Open a managed connection to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry.
        let secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local cache. Expired entries are dropped lazily on read.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > now => return Ok(Some(value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries.write().await.remove(key);
        Ok(None)
    }
}
