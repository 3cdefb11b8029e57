//! Snapshot storage for compacted actors.
//!
//! Given an actor identity, the store reads and writes serialized snapshots
//! with ETag-based optimistic concurrency control. The processing loop writes
//! a snapshot at every compaction and rebuilds the next incarnation from what
//! it reads back.
//!
//! # Design
//!
//! - `ActorStateStore` is a trait so implementations can range from the
//!   in-memory map used here to a real database backend.
//! - ETags prevent lost updates: a write succeeds only if the stored ETag
//!   matches the expected ETag. On mismatch, the caller gets `ETagMismatch`.
//! - Snapshots are opaque bytes; the actor runtime owns serialization.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Errors from state store operations.
#[derive(Debug, thiserror::Error)]
pub enum ActorStateError {
    /// Write failed because the stored ETag does not match the expected ETag.
    #[error("ETag mismatch: expected {expected:?}, found {actual:?}")]
    ETagMismatch {
        /// The ETag the caller expected.
        expected: String,
        /// The ETag currently in the store.
        actual: String,
    },

    /// Generic store error.
    #[error("store error: {0}")]
    StoreError(String),
}

/// A stored snapshot: serialized data plus an ETag.
#[derive(Debug, Clone)]
pub struct StoredState {
    /// Serialized state bytes.
    pub data: Vec<u8>,
    /// Optimistic concurrency token.
    pub etag: String,
}

/// Trait for durable actor snapshot storage.
///
/// Keyed by actor type name and actor identity string.
#[async_trait::async_trait]
pub trait ActorStateStore: fmt::Debug + Send + Sync {
    /// Read the stored snapshot for an actor.
    ///
    /// Returns `Ok(None)` if nothing has been written for this actor.
    async fn read_state(
        &self,
        actor_type: &str,
        actor_id: &str,
    ) -> Result<Option<StoredState>, ActorStateError>;

    /// Write a snapshot for an actor.
    ///
    /// If `expected_etag` is `Some`, the write succeeds only if the currently
    /// stored ETag matches. If `None`, the write is unconditional (first write).
    ///
    /// Returns the new ETag on success.
    async fn write_state(
        &self,
        actor_type: &str,
        actor_id: &str,
        data: Vec<u8>,
        expected_etag: Option<&str>,
    ) -> Result<String, ActorStateError>;
}

/// In-memory snapshot store.
///
/// All snapshots live in a `HashMap`. ETags are monotonically increasing
/// counter values. Nothing survives a process restart.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    entries: Mutex<HashMap<(String, String), StoredState>>,
    counter: AtomicU64,
}

impl InMemoryStateStore {
    /// Create a new empty in-memory state store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, String), StoredState>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_etag(&self) -> String {
        (self.counter.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }

    fn check_etag(
        entries: &HashMap<(String, String), StoredState>,
        key: &(String, String),
        expected_etag: Option<&str>,
    ) -> Result<(), ActorStateError> {
        let Some(expected) = expected_etag else {
            return Ok(());
        };
        match entries.get(key) {
            Some(existing) if existing.etag == expected => Ok(()),
            Some(existing) => Err(ActorStateError::ETagMismatch {
                expected: expected.to_string(),
                actual: existing.etag.clone(),
            }),
            None => Err(ActorStateError::ETagMismatch {
                expected: expected.to_string(),
                actual: String::new(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl ActorStateStore for InMemoryStateStore {
    async fn read_state(
        &self,
        actor_type: &str,
        actor_id: &str,
    ) -> Result<Option<StoredState>, ActorStateError> {
        let key = (actor_type.to_string(), actor_id.to_string());
        Ok(self.lock().get(&key).cloned())
    }

    async fn write_state(
        &self,
        actor_type: &str,
        actor_id: &str,
        data: Vec<u8>,
        expected_etag: Option<&str>,
    ) -> Result<String, ActorStateError> {
        let key = (actor_type.to_string(), actor_id.to_string());
        let mut entries = self.lock();
        Self::check_etag(&entries, &key, expected_etag)?;

        let new_etag = self.next_etag();
        entries.insert(
            key,
            StoredState {
                data,
                etag: new_etag.clone(),
            },
        );
        Ok(new_etag)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_empty() {
        let store = InMemoryStateStore::new();
        let result = store.read_state("Vehicle", "0012.00101").await;
        assert!(result.expect("read should succeed").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let store = InMemoryStateStore::new();
        let data = vec![1, 2, 3];

        let etag = store
            .write_state("Vehicle", "0012.00101", data.clone(), None)
            .await
            .expect("write should succeed");
        assert!(!etag.is_empty());

        let stored = store
            .read_state("Vehicle", "0012.00101")
            .await
            .expect("read should succeed")
            .expect("state should exist");
        assert_eq!(stored.data, data);
        assert_eq!(stored.etag, etag);
    }

    #[tokio::test]
    async fn test_write_etag_match() {
        let store = InMemoryStateStore::new();

        let etag1 = store
            .write_state("Geofence", "Airport", vec![1], None)
            .await
            .expect("first write");

        let etag2 = store
            .write_state("Geofence", "Airport", vec![2], Some(&etag1))
            .await
            .expect("second write with matching etag");

        assert_ne!(etag1, etag2);

        let stored = store
            .read_state("Geofence", "Airport")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(stored.data, vec![2]);
        assert_eq!(stored.etag, etag2);
    }

    #[tokio::test]
    async fn test_write_etag_mismatch() {
        let store = InMemoryStateStore::new();

        store
            .write_state("Geofence", "Airport", vec![1], None)
            .await
            .expect("first write");

        let result = store
            .write_state("Geofence", "Airport", vec![2], Some("wrong-etag"))
            .await;
        assert!(matches!(result, Err(ActorStateError::ETagMismatch { .. })));

        let stored = store
            .read_state("Geofence", "Airport")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(stored.data, vec![1]);
    }

    #[tokio::test]
    async fn test_expected_etag_on_missing_entry() {
        let store = InMemoryStateStore::new();

        let result = store
            .write_state("Geofence", "Airport", vec![1], Some("1"))
            .await;
        assert!(matches!(result, Err(ActorStateError::ETagMismatch { .. })));
    }

    #[tokio::test]
    async fn test_same_identity_different_actor_types() {
        let store = InMemoryStateStore::new();

        store
            .write_state("Vehicle", "0012", vec![1], None)
            .await
            .expect("write vehicle");
        store
            .write_state("Organization", "0012", vec![2], None)
            .await
            .expect("write organization");

        let vehicle = store
            .read_state("Vehicle", "0012")
            .await
            .expect("read")
            .expect("exists");
        let organization = store
            .read_state("Organization", "0012")
            .await
            .expect("read")
            .expect("exists");

        assert_eq!(vehicle.data, vec![1]);
        assert_eq!(organization.data, vec![2]);
        assert_eq!(store.len(), 2);
    }
}
