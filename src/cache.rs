use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;

/// Key the aggregate scrape result lives under.
pub const CACHE_KEY: &str = "scraped_data";

/// Minimal key-value store with per-key expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
    /// Returns whether a value was removed.
    async fn delete(&self, key: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    redis_url: String,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("redis_url", &self.redis_url)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        info!(%redis_url, "Redis connection manager ready");
        Ok(Self {
            conn,
            redis_url: redis_url.to_string(),
        })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(key, hit = value.is_some(), "GET");
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        debug!(key, ttl_secs, "SETEX");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await?;
        debug!(key, removed, "DEL");
        Ok(removed > 0)
    }
}

struct Entry {
    body: String,
    expires_at: Instant,
}

/// In-process store. Expired entries are dropped lazily on access.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.body.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                body: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        Ok(entries
            .remove(key)
            .is_some_and(|e| e.expires_at > Instant::now()))
    }
}

/// Single-key view over a store: one payload, one lifetime.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    lifetime: u64,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, lifetime: u64) -> Self {
        Self { store, lifetime }
    }

    /// Drops whatever is cached and stores `payload` in its place.
    pub async fn replace(&self, payload: &str) -> Result<()> {
        self.store.delete(CACHE_KEY).await?;
        self.store.set_ex(CACHE_KEY, payload, self.lifetime).await
    }

    pub async fn put(&self, value: &str) -> Result<()> {
        self.store.set_ex(CACHE_KEY, value, self.lifetime).await
    }

    /// Reads the payload and removes it. The delete runs even when the read
    /// fails.
    pub async fn take(&self) -> Result<Option<String>> {
        let read = self.store.get(CACHE_KEY).await;
        self.store.delete(CACHE_KEY).await?;
        read
    }
}
