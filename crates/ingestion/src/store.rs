//! In-memory region lookup shared with the HTTP layer.

use std::sync::Arc;

use tokio::sync::RwLock;
use zhvi_common::{RegionEntry, RegionKey};

use crate::builder::Snapshot;

/// Cloneable handle to the current region map.
///
/// The map is replaced wholesale: a reader sees either the previous snapshot
/// or the new one, never a half-built map.
#[derive(Debug, Clone, Default)]
pub struct LookupStore {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl LookupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup. Callers normalize the key first.
    pub async fn get(&self, key: &RegionKey) -> Option<RegionEntry> {
        self.current.read().await.get(key).cloned()
    }

    pub async fn contains(&self, key: &RegionKey) -> bool {
        self.current.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.current.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.current.read().await.is_empty()
    }

    /// All keys in sorted order.
    pub async fn keys(&self) -> Vec<RegionKey> {
        let snapshot = self.snapshot().await;
        let mut keys: Vec<RegionKey> = snapshot.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The map as it is right now.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Publish a new map, returning how many regions the old one held.
    pub async fn replace(&self, snapshot: Snapshot) -> usize {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().await;
        let previous = std::mem::replace(&mut *guard, next);
        previous.len()
    }
}
