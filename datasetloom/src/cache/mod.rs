//! Short-lived storage for chunk previews.
//!
//! A preview is computed once per distinct configuration and kept for a
//! few minutes so the client can commit it without re-chunking.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde_json::Value;

use crate::error::Result;
use crate::models::Chunk;

/// Key/value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `None` for missing and expired keys alike.
    async fn get(&self, key: &str) -> Option<Value>;
    async fn set(&self, key: &str, value: Value, ttl: Duration);
    async fn remove(&self, key: &str);
}

struct Entry {
    value: Value,
    expires_at: Instant,
}

/// In-process LRU store. Expired entries are evicted when read.
#[derive(Clone)]
pub struct LruCacheStore {
    cache: Arc<Mutex<LruCache<String, Entry>>>,
}

impl LruCacheStore {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Entry>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for LruCacheStore {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut cache = self.lock();
        let expired = match cache.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            cache.pop(key);
            tracing::debug!(key = %key, "Cache entry expired");
        }
        None
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.lock().put(key.to_string(), entry);
    }

    async fn remove(&self, key: &str) {
        self.lock().pop(key);
    }
}

/// Chunk previews keyed by project and configuration hash.
#[derive(Clone)]
pub struct PreviewCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl PreviewCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn key(project_id: &str, hash: &str) -> String {
        format!("preview-chunks:{project_id}:{hash}")
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached chunk list, or `None` when absent, expired or not a chunk list.
    pub async fn get(&self, project_id: &str, hash: &str) -> Option<Vec<Chunk>> {
        let key = Self::key(project_id, hash);
        let value = self.store.get(&key).await?;
        match serde_json::from_value::<Vec<Chunk>>(value) {
            Ok(chunks) => Some(chunks),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring malformed preview entry");
                None
            }
        }
    }

    pub async fn put(&self, project_id: &str, hash: &str, chunks: &[Chunk]) -> Result<()> {
        let value = serde_json::to_value(chunks)?;
        self.store
            .set(&Self::key(project_id, hash), value, self.ttl)
            .await;
        Ok(())
    }

    /// Drop a preview so it cannot be committed again.
    pub async fn consume(&self, project_id: &str, hash: &str) {
        self.store.remove(&Self::key(project_id, hash)).await;
    }
}
