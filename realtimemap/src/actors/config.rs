//! Runtime configuration for [`ActorHost`](super::ActorHost).
//!
//! Separates compaction limits from the snapshot store so hosts of different
//! actor kinds can share one store.

use std::sync::Arc;

use super::log::ActorLog;
use super::state::{ActorStateStore, InMemoryStateStore};

/// Default journal length that triggers compaction.
///
/// A vehicle journals two entries per position report (the report and the
/// forward to its organization), so this compacts every 32 reports.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 64;

/// Default journal size (bytes) that triggers compaction.
pub const DEFAULT_MAX_LOG_BYTES: usize = 32 * 1024;

/// When an incarnation should be compacted.
///
/// Compaction is suggested as soon as either limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionPolicy {
    /// Maximum journal entries per incarnation.
    pub max_log_entries: usize,
    /// Maximum serialized journal size per incarnation.
    pub max_log_bytes: usize,
}

impl CompactionPolicy {
    /// Whether `log` has grown past either limit.
    pub fn is_suggested(&self, log: &ActorLog) -> bool {
        log.len() >= self.max_log_entries || log.size_bytes() >= self.max_log_bytes
    }
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
            max_log_bytes: DEFAULT_MAX_LOG_BYTES,
        }
    }
}

/// Configuration shared by every [`ActorHost`](super::ActorHost).
///
/// # Example
///
/// ```rust,ignore
/// // Defaults: in-memory snapshots, 64 entries / 32 KiB per incarnation
/// let config = RuntimeConfig::default();
///
/// // Full control via builder
/// let config = RuntimeConfig::builder()
///     .max_log_entries(100)
///     .state_store(store)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    compaction: CompactionPolicy,
    state_store: Arc<dyn ActorStateStore>,
}

impl RuntimeConfig {
    /// Start building a runtime configuration.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Compaction limits.
    pub fn compaction(&self) -> CompactionPolicy {
        self.compaction
    }

    /// The snapshot store.
    pub fn state_store(&self) -> &Arc<dyn ActorStateStore> {
        &self.state_store
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`RuntimeConfig`].
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfigBuilder {
    compaction: CompactionPolicy,
    state_store: Option<Arc<dyn ActorStateStore>>,
}

impl RuntimeConfigBuilder {
    /// Set the journal length that triggers compaction.
    pub fn max_log_entries(mut self, entries: usize) -> Self {
        self.compaction.max_log_entries = entries.max(1);
        self
    }

    /// Set the journal size in bytes that triggers compaction.
    pub fn max_log_bytes(mut self, bytes: usize) -> Self {
        self.compaction.max_log_bytes = bytes.max(1);
        self
    }

    /// Set the snapshot store.
    pub fn state_store(mut self, store: Arc<dyn ActorStateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    /// Build the configuration (infallible).
    ///
    /// Without an explicit store, a fresh [`InMemoryStateStore`] is used.
    pub fn build(self) -> RuntimeConfig {
        RuntimeConfig {
            compaction: self.compaction,
            state_store: self
                .state_store
                .unwrap_or_else(|| Arc::new(InMemoryStateStore::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::ActorId;

    #[test]
    fn test_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.compaction(), CompactionPolicy::default());
    }

    #[test]
    fn test_builder() {
        let config = RuntimeConfig::builder()
            .max_log_entries(10)
            .max_log_bytes(2048)
            .build();
        assert_eq!(config.compaction().max_log_entries, 10);
        assert_eq!(config.compaction().max_log_bytes, 2048);
    }

    #[test]
    fn test_zero_limits_are_clamped() {
        let config = RuntimeConfig::builder().max_log_entries(0).build();
        assert_eq!(config.compaction().max_log_entries, 1);
    }

    #[test]
    fn test_policy_suggests_on_entries_or_bytes() {
        let mut log = ActorLog::new();
        log.record_sent(ActorId::geofence("Airport")).expect("record");

        let by_entries = CompactionPolicy {
            max_log_entries: 1,
            max_log_bytes: usize::MAX,
        };
        let by_bytes = CompactionPolicy {
            max_log_entries: usize::MAX,
            max_log_bytes: 1,
        };

        assert!(by_entries.is_suggested(&log));
        assert!(by_bytes.is_suggested(&log));
        assert!(!CompactionPolicy::default().is_suggested(&log));
    }

    #[test]
    fn test_default_policy_bounds_vehicle_journal() {
        let report = serde_json::json!({
            "Position": {
                "vehicleId": "0012.00101",
                "orgId": "0012",
                "orgName": "Helsingin Bussiliikenne Oy",
                "timestamp": 1_700_000_000,
                "longitude": 24.943936,
                "latitude": 60.171285,
                "heading": 90,
                "doorsOpen": false,
                "speed": 8.5
            }
        });
        let policy = CompactionPolicy::default();
        let mut log = ActorLog::new();
        let mut reports = 0;
        while !policy.is_suggested(&log) {
            log.record_received(&report).expect("record");
            log.record_sent(ActorId::organization("0012")).expect("record");
            reports += 1;
        }

        assert!(reports <= 32, "compacted after {reports} reports");
        assert!(log.size_bytes() <= DEFAULT_MAX_LOG_BYTES + 1024);
    }
}
