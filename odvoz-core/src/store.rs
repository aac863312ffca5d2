//! In-memory holder of the latest published snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, watch};
use tracing::debug;

use crate::model::WasteSnapshot;

/// Snapshot together with the time it was published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Latest published snapshot, empty before the first successful cycle.
    pub snapshot: WasteSnapshot,
    /// When `snapshot` was published; `None` until the first write.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Shared handle to the current snapshot.
///
/// Clones share the same underlying value. Readers always get a copy; a write
/// replaces the snapshot and its timestamp under one lock, so readers never
/// observe a mix of two snapshots.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<StoreStatus>>,
    version: Arc<watch::Sender<u64>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Create a store holding the empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(StoreStatus::default())),
            version: Arc::new(version),
        }
    }

    /// Copy of the current snapshot.
    pub async fn read(&self) -> WasteSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    /// Copy of the current snapshot and its publish time, read together.
    pub async fn status(&self) -> StoreStatus {
        self.inner.read().await.clone()
    }

    /// When the current snapshot was published.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_updated
    }

    /// Replace the current snapshot as a whole.
    pub async fn write(&self, snapshot: WasteSnapshot) {
        let now = Utc::now();
        {
            let mut guard = self.inner.write().await;
            guard.snapshot = snapshot;
            guard.last_updated = Some(now);
        }
        self.version.send_modify(|version| *version += 1);
        debug!(published_at = %now, "snapshot replaced");
    }

    /// Receiver whose value increments on every write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
