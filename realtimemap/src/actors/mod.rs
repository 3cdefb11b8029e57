//! Durable actor runtime.
//!
//! Every entity in the system is a long-running actor identified by a stable
//! [`ActorId`]. An [`ActorHost`] owns the address space of one actor kind and
//! runs one processing loop per actor instance.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ ActorHost<A>                                             │
//! │   identity → { mailbox sender, committed-state watch }   │
//! ├──────────────────────────────────────────────────────────┤
//! │ processing loop (one task per actor)                     │
//! │   incarnation 0: recv → on_signal → commit → ActorLog    │
//! │   log over threshold + mailbox empty → snapshot          │
//! │   incarnation 1: same mailbox, same state, empty log     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Turn-based concurrency
//!
//! One signal at a time per actor instance. Handlers mutate `&mut self`
//! without locks; many actors run concurrently as independent tasks.
//!
//! # Signals and queries
//!
//! Signals are fire-and-forget: `signal()` enqueues into an unbounded mailbox
//! and returns. Queries read the last committed state from a watch channel
//! without waiting on the actor.
//!
//! # Compaction
//!
//! Each incarnation journals the signals it handled and the signals it sent.
//! Once the journal passes the [`CompactionPolicy`] limits and the mailbox is
//! drained, the loop snapshots the actor into the [`ActorStateStore`], ends
//! the incarnation, and starts the next one from the stored snapshot with an
//! empty journal.

mod config;
mod context;
mod host;
mod log;
mod state;
mod types;

pub use config::{
    CompactionPolicy, RuntimeConfig, RuntimeConfigBuilder, DEFAULT_MAX_LOG_BYTES,
    DEFAULT_MAX_LOG_ENTRIES,
};
pub use context::ActorContext;
pub use host::{replay, ActorHost, ActorStatus, DurableActor};
pub use log::{ActorLog, LogEntry, LogEvent};
pub use state::{ActorStateError, ActorStateStore, InMemoryStateStore, StoredState};
pub use types::{ActorId, ActorType};
