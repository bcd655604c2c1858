//! Snapshot reader for downstream consumers.

use std::sync::Arc;

use log::warn;

use super::model::Snapshot;
use super::store::SnapshotStore;
use crate::constants::SNAPSHOT_KEY;

/// Reads the current snapshot.
///
/// `None` covers "never published", "expired", an unreachable store and an
/// unreadable payload. Read failures are logged, never surfaced.
#[derive(Clone)]
pub struct SnapshotReader {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl SnapshotReader {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_key(store, SNAPSHOT_KEY)
    }

    pub fn with_key(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn get_current(&self) -> Option<Snapshot> {
        let payload = match self.store.get(&self.key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    "Snapshot read from {} store failed: {}",
                    self.store.backend(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Stored snapshot under '{}' is unreadable: {}", self.key, e);
                None
            }
        }
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }
}
