use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::GeoCoordinates;
use crate::services::lookup::CoordinateLookup;

/// Read-through memo in front of another lookup.
///
/// Failed lookups are cached as `None` just like successes, transient ones
/// included: after a timeout or a 5xx the address stays unresolved (and so
/// infinitely far for matching) until [`clear`](Self::clear). Two concurrent
/// misses on the same address may both reach the inner lookup; the second
/// insert overwrites the first with an equal value.
pub struct CachedLookup<L> {
    inner: L,
    entries: RwLock<HashMap<String, Option<GeoCoordinates>>>,
}

impl<L: CoordinateLookup> CachedLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn cached(&self, address: &str) -> Option<Option<GeoCoordinates>> {
        self.entries.read().await.get(address.trim()).copied()
    }
}

#[async_trait]
impl<L: CoordinateLookup> CoordinateLookup for CachedLookup<L> {
    async fn lookup(&self, address: &str) -> Option<GeoCoordinates> {
        let key = address.trim();
        if key.is_empty() {
            return None;
        }

        if let Some(hit) = self.cached(key).await {
            debug!("Geocode cache hit for '{}'", key);
            return hit;
        }

        let resolved = self.inner.lookup(key).await;
        self.entries.write().await.insert(key.to_string(), resolved);

        resolved
    }
}
