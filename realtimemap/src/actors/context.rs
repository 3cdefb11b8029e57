//! Context handed to actors while they handle a signal.

use super::host::{ActorHost, DurableActor};
use super::log::ActorLog;
use super::types::ActorId;
use crate::error::ActorError;

/// Context provided to [`DurableActor::on_signal`].
///
/// Gives the actor its typed dependencies (usually the hosts of the actors
/// it talks to) and journaled access to outgoing signals.
pub struct ActorContext<'a, D> {
    deps: &'a D,
    log: &'a mut ActorLog,
    replaying: bool,
}

impl<'a, D> ActorContext<'a, D> {
    pub(crate) fn new(deps: &'a D, log: &'a mut ActorLog) -> Self {
        Self {
            deps,
            log,
            replaying: false,
        }
    }

    /// Context used while replaying a journal: outgoing signals are recorded
    /// but not delivered.
    pub(crate) fn replaying(deps: &'a D, log: &'a mut ActorLog) -> Self {
        Self {
            deps,
            log,
            replaying: true,
        }
    }

    /// The actor's dependencies.
    ///
    /// The returned reference outlives this borrow of the context, so it can
    /// be passed straight back into [`signal_external`](Self::signal_external).
    pub fn deps(&self) -> &'a D {
        self.deps
    }

    /// Send a fire-and-forget signal to another actor and journal it.
    ///
    /// Returns once the signal is in the recipient's mailbox; nothing waits
    /// for it to be processed.
    pub fn signal_external<B: DurableActor>(
        &mut self,
        host: &ActorHost<B>,
        identity: &str,
        signal: B::Signal,
    ) -> Result<(), ActorError> {
        if self.replaying {
            if !host.contains(identity) {
                return Err(ActorError::NotFound(ActorId::new(B::actor_type(), identity)));
            }
        } else {
            host.signal(identity, signal)?;
        }
        self.log.record_sent(ActorId::new(B::actor_type(), identity))
    }
}
