//! Per-incarnation actor journal.
//!
//! The journal is append-only. It records every signal an incarnation
//! handled (serialized, so it can be replayed over the incarnation's starting
//! snapshot) and every signal it sent. Its size drives compaction.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::types::ActorId;
use crate::error::ActorError;

/// What happened at one point of an incarnation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    /// A signal was taken from the mailbox and handled.
    SignalReceived {
        /// The signal as JSON.
        payload: serde_json::Value,
    },
    /// A signal was sent to another actor.
    SignalSent {
        /// Recipient address.
        target: ActorId,
    },
}

/// A sequenced journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the journal, starting at 1.
    pub sequence: u64,
    /// The recorded event.
    pub event: LogEvent,
}

/// Append-only journal of one actor incarnation.
#[derive(Debug, Clone, Default)]
pub struct ActorLog {
    entries: Vec<LogEntry>,
    size_bytes: usize,
}

impl ActorLog {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a handled signal.
    pub fn record_received<S: Serialize>(&mut self, signal: &S) -> Result<(), ActorError> {
        let payload = serde_json::to_value(signal)?;
        self.append(LogEvent::SignalReceived { payload })
    }

    /// Record an outgoing signal.
    pub fn record_sent(&mut self, target: ActorId) -> Result<(), ActorError> {
        self.append(LogEvent::SignalSent { target })
    }

    fn append(&mut self, event: LogEvent) -> Result<(), ActorError> {
        let entry = LogEntry {
            sequence: self.entries.len() as u64 + 1,
            event,
        };
        self.size_bytes += serde_json::to_vec(&entry)?.len();
        self.entries.push(entry);
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialized size of all entries, in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Decode the handled signals, in the order they were handled.
    pub fn received<S: DeserializeOwned>(&self) -> Result<Vec<S>, ActorError> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.event {
                LogEvent::SignalReceived { payload } => Some(payload),
                LogEvent::SignalSent { .. } => None,
            })
            .map(|payload| serde_json::from_value(payload.clone()).map_err(ActorError::from))
            .collect()
    }

    /// Recipients of sent signals, in send order.
    pub fn sent(&self) -> Vec<&ActorId> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.event {
                LogEvent::SignalSent { target } => Some(target),
                LogEvent::SignalReceived { .. } => None,
            })
            .collect()
    }
}
