//! ActorHost: owner of one actor kind's address space and processing loops.
//!
//! The `ActorHost` owns the mailboxes of every actor of one kind, spawns one
//! processing loop per actor, and answers queries from committed state. The
//! user implements [`DurableActor`] and the host does the rest.
//!
//! # Usage
//!
//! ```rust,ignore
//! let geofences = ActorHost::<GeofenceActor>::new(notifications.clone(), config.clone());
//! geofences.start("Airport", GeofenceActor::new(airport, false))?;
//! geofences.signal("Airport", GeofenceSignal::Position(position))?;
//! let details = geofences.query("Airport");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc::error::{SendError, TryRecvError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn, Instrument};

use super::config::{CompactionPolicy, RuntimeConfig};
use super::context::ActorContext;
use super::log::ActorLog;
use super::state::{ActorStateError, ActorStateStore};
use super::types::{ActorId, ActorType};
use crate::error::ActorError;

/// Trait implemented by each long-running actor kind.
///
/// The actor value is its own state: it is cloned into the query view after
/// every signal and serialized at every compaction, so it must be cheap
/// enough to clone and fully serializable.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Default, Serialize, Deserialize)]
/// struct Counter { value: i64 }
///
/// #[derive(Debug, Serialize, Deserialize)]
/// enum CounterSignal { Add(i64) }
///
/// #[async_trait]
/// impl DurableActor for Counter {
///     type Signal = CounterSignal;
///     type Query = i64;
///     type Deps = ();
///
///     fn actor_type() -> ActorType { ActorType::Vehicle }
///
///     async fn on_signal(
///         &mut self,
///         signal: CounterSignal,
///         _ctx: &mut ActorContext<'_, ()>,
///     ) -> Result<(), ActorError> {
///         match signal {
///             CounterSignal::Add(n) => self.value += n,
///         }
///         Ok(())
///     }
///
///     fn query(&self) -> i64 { self.value }
/// }
/// ```
#[async_trait::async_trait]
pub trait DurableActor: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Tagged union of every signal this actor accepts.
    type Signal: Serialize + DeserializeOwned + fmt::Debug + Send + 'static;

    /// Answer returned by [`query`](Self::query).
    type Query: Send + 'static;

    /// Handles the actor needs to signal other actors.
    type Deps: Send + Sync + 'static;

    /// The kind of actor (used for addressing and snapshot keys).
    fn actor_type() -> ActorType;

    /// Handle one signal.
    ///
    /// Never called concurrently for the same actor. An error is logged by
    /// the processing loop; the signal counts as handled and is not retried.
    async fn on_signal(
        &mut self,
        signal: Self::Signal,
        ctx: &mut ActorContext<'_, Self::Deps>,
    ) -> Result<(), ActorError>;

    /// Read-only view of the current state.
    fn query(&self) -> Self::Query;
}

/// Observable progress of one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorStatus {
    /// Number of compactions so far.
    pub generation: u64,
    /// Signals handled over the actor's whole life.
    pub signals_processed: u64,
}

/// Last state committed by a processing loop.
#[derive(Debug, Clone)]
struct Committed<A> {
    actor: A,
    generation: u64,
    signals_processed: u64,
}

struct ActorSlot<A: DurableActor> {
    mailbox: mpsc::UnboundedSender<A::Signal>,
    committed: watch::Receiver<Committed<A>>,
}

struct HostInner<A: DurableActor> {
    deps: Arc<A::Deps>,
    config: RuntimeConfig,
    actors: Mutex<HashMap<String, ActorSlot<A>>>,
}

/// Runtime for all actors of kind `A`.
///
/// Cloning is cheap and every clone addresses the same actors.
pub struct ActorHost<A: DurableActor> {
    inner: Arc<HostInner<A>>,
}

impl<A: DurableActor> Clone for ActorHost<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: DurableActor> fmt::Debug for ActorHost<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHost")
            .field("actor_type", &A::actor_type())
            .field("actors", &self.len())
            .finish()
    }
}

impl<A: DurableActor> ActorHost<A> {
    /// Create a host with no running actors.
    ///
    /// # Arguments
    ///
    /// * `deps` - Handles passed to every actor of this kind
    /// * `config` - Compaction limits and snapshot store
    pub fn new(deps: A::Deps, config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(HostInner {
                deps: Arc::new(deps),
                config,
                actors: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ActorSlot<A>>> {
        self.inner
            .actors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn address(identity: &str) -> ActorId {
        ActorId::new(A::actor_type(), identity)
    }

    /// Start an actor with an initial state.
    ///
    /// Registers the mailbox and the query view in one step. Fails with
    /// [`ActorError::AlreadyStarted`] if the address is taken.
    pub fn start(&self, identity: impl Into<String>, actor: A) -> Result<(), ActorError> {
        let identity = identity.into();
        let mut actors = self.lock();
        if actors.contains_key(&identity) {
            return Err(ActorError::AlreadyStarted(Self::address(&identity)));
        }

        let slot = self.spawn(&identity, actor, 0, 0);
        actors.insert(identity, slot);
        Ok(())
    }

    /// Enqueue a signal for a running actor.
    ///
    /// Fire-and-forget: returns as soon as the signal is in the mailbox.
    pub fn signal(&self, identity: &str, signal: A::Signal) -> Result<(), ActorError> {
        let actors = self.lock();
        let slot = actors
            .get(identity)
            .ok_or_else(|| ActorError::NotFound(Self::address(identity)))?;
        slot.mailbox
            .send(signal)
            .map_err(|_| ActorError::MailboxClosed(Self::address(identity)))
    }

    /// Deliver a signal, starting the actor first if it does not exist.
    ///
    /// Lookup, creation and enqueue happen under one lock, so the first
    /// signal can never race the creation of its recipient. `init` runs only
    /// when the actor is created.
    ///
    /// If the actor's processing loop has died, it is restarted from its last
    /// committed state before the signal is delivered.
    pub fn signal_with_start<F>(
        &self,
        identity: &str,
        signal: A::Signal,
        init: F,
    ) -> Result<(), ActorError>
    where
        F: FnOnce() -> A,
    {
        let mut actors = self.lock();

        let signal = match actors.get(identity) {
            Some(slot) => match slot.mailbox.send(signal) {
                Ok(()) => return Ok(()),
                Err(SendError(signal)) => signal,
            },
            None => signal,
        };

        let (actor, generation, signals_processed) = match actors.remove(identity) {
            Some(dead) => {
                warn!(actor = %Self::address(identity), "processing loop gone, restarting from last committed state");
                let committed = dead.committed.borrow();
                (
                    committed.actor.clone(),
                    committed.generation,
                    committed.signals_processed,
                )
            }
            None => {
                debug!(actor = %Self::address(identity), "starting actor on first signal");
                (init(), 0, 0)
            }
        };

        let slot = self.spawn(identity, actor, generation, signals_processed);
        slot.mailbox
            .send(signal)
            .map_err(|_| ActorError::MailboxClosed(Self::address(identity)))?;
        actors.insert(identity.to_string(), slot);
        Ok(())
    }

    /// Answer a query from the actor's last committed state.
    ///
    /// Never waits on the actor. Returns `None` if no actor has this identity.
    pub fn query(&self, identity: &str) -> Option<A::Query> {
        let committed = self.lock().get(identity)?.committed.clone();
        let view = committed.borrow();
        Some(view.actor.query())
    }

    /// Progress counters of one actor.
    pub fn status(&self, identity: &str) -> Option<ActorStatus> {
        let committed = self.lock().get(identity)?.committed.clone();
        let view = committed.borrow();
        Some(ActorStatus {
            generation: view.generation,
            signals_processed: view.signals_processed,
        })
    }

    /// Whether an actor with this identity exists.
    pub fn contains(&self, identity: &str) -> bool {
        self.lock().contains_key(identity)
    }

    /// Number of actors.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no actor has been started.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn spawn(
        &self,
        identity: &str,
        actor: A,
        generation: u64,
        signals_processed: u64,
    ) -> ActorSlot<A> {
        let id = Self::address(identity);
        let (mailbox, inbox) = mpsc::unbounded_channel();
        let (committed_tx, committed_rx) = watch::channel(Committed {
            actor: actor.clone(),
            generation,
            signals_processed,
        });

        let span = tracing::info_span!("actor", actor = %id);
        let processing = ProcessingLoop {
            id,
            deps: Arc::clone(&self.inner.deps),
            store: Arc::clone(self.inner.config.state_store()),
            policy: self.inner.config.compaction(),
            committed: committed_tx,
        };
        tokio::spawn(
            processing
                .run(actor, inbox, generation)
                .instrument(span),
        );

        ActorSlot {
            mailbox,
            committed: committed_rx,
        }
    }
}

/// How an incarnation ended.
enum Incarnation {
    /// Journal over threshold and mailbox drained: snapshot and restart.
    ContinueAsNew,
    /// Every sender is gone.
    MailboxClosed,
}

/// Processing loop for a single actor.
///
/// Owns the mailbox receiver for the actor's whole life; incarnations come
/// and go around it, so no signal is lost at a compaction boundary.
struct ProcessingLoop<A: DurableActor> {
    id: ActorId,
    deps: Arc<A::Deps>,
    store: Arc<dyn ActorStateStore>,
    policy: CompactionPolicy,
    committed: watch::Sender<Committed<A>>,
}

impl<A: DurableActor> ProcessingLoop<A> {
    async fn run(
        self,
        mut actor: A,
        mut inbox: mpsc::UnboundedReceiver<A::Signal>,
        mut generation: u64,
    ) {
        let mut etag: Option<String> = None;
        debug!(generation, "actor started");

        loop {
            match self
                .run_incarnation(&mut actor, &mut inbox)
                .await
            {
                Incarnation::ContinueAsNew => {
                    match self.compact(&actor, &mut etag).await {
                        Ok(restored) => actor = restored,
                        Err(e) => {
                            warn!(error = %e, "snapshot failed, continuing from in-memory state");
                        }
                    }
                    generation += 1;
                    self.committed.send_modify(|committed| {
                        committed.actor = actor.clone();
                        committed.generation = generation;
                    });
                    info!(generation, "actor compacted");
                }
                Incarnation::MailboxClosed => {
                    debug!("mailbox closed, actor stopping");
                    return;
                }
            }
        }
    }

    /// Run one incarnation with a fresh journal.
    async fn run_incarnation(
        &self,
        actor: &mut A,
        inbox: &mut mpsc::UnboundedReceiver<A::Signal>,
    ) -> Incarnation {
        let mut log = ActorLog::new();

        while let Some(signal) = inbox.recv().await {
            self.process(actor, signal, &mut log).await;

            if self.policy.is_suggested(&log) {
                // Compact only with an empty mailbox.
                loop {
                    match inbox.try_recv() {
                        Ok(signal) => self.process(actor, signal, &mut log).await,
                        Err(TryRecvError::Empty) => {
                            debug!(
                                entries = log.len(),
                                sent = log.sent().len(),
                                bytes = log.size_bytes(),
                                "compaction suggested, mailbox drained"
                            );
                            return Incarnation::ContinueAsNew;
                        }
                        Err(TryRecvError::Disconnected) => return Incarnation::MailboxClosed,
                    }
                }
            }
        }

        Incarnation::MailboxClosed
    }

    async fn process(&self, actor: &mut A, signal: A::Signal, log: &mut ActorLog) {
        if let Err(e) = log.record_received(&signal) {
            warn!(error = %e, ?signal, "failed to journal signal");
        }

        let mut ctx = ActorContext::new(self.deps.as_ref(), log);
        if let Err(e) = actor.on_signal(signal, &mut ctx).await {
            error!(error = %e, "signal handler failed");
        }

        self.committed.send_modify(|committed| {
            committed.actor = actor.clone();
            committed.signals_processed += 1;
        });
    }

    /// Write a snapshot and rebuild the actor from what the store returns.
    ///
    /// Floats are encoded with their shortest exact representation and
    /// parsed back exactly, so the rebuilt actor equals `actor`.
    async fn compact(&self, actor: &A, etag: &mut Option<String>) -> Result<A, ActorError> {
        let actor_type = A::actor_type().name();
        let snapshot = serde_json::to_vec(actor)?;

        let new_etag = self
            .store
            .write_state(actor_type, &self.id.identity, snapshot, etag.as_deref())
            .await?;
        *etag = Some(new_etag);

        let stored = self
            .store
            .read_state(actor_type, &self.id.identity)
            .await?
            .ok_or_else(|| {
                ActorStateError::StoreError(format!("snapshot for {} vanished", self.id))
            })?;

        Ok(serde_json::from_slice(&stored.data)?)
    }
}

/// Re-execute a journal over the snapshot it started from.
///
/// Outgoing signals are journaled but not delivered. Returns the resulting
/// actor and the replay's own journal; for a deterministic actor the journal
/// equals the live one entry for entry.
pub async fn replay<A: DurableActor>(
    id: &ActorId,
    snapshot: A,
    log: &ActorLog,
    deps: &A::Deps,
) -> Result<(A, ActorLog), ActorError> {
    let mut actor = snapshot;
    let mut journal = ActorLog::new();

    for signal in log.received::<A::Signal>()? {
        journal.record_received(&signal)?;
        let mut ctx = ActorContext::replaying(deps, &mut journal);
        if let Err(e) = actor.on_signal(signal, &mut ctx).await {
            debug!(actor = %id, error = %e, "signal handler failed during replay");
        }
    }

    Ok((actor, journal))
}
