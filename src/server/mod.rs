//! # Mining Server
//!
//! The world-thread side of assisted mining. Connection threads decode client
//! messages and push them, tagged with the sending actor, into an inbound
//! channel; the world thread drains that channel once per tick and pushes the
//! replies into an outbound channel.
//!
//! ## Message Lifecycle
//! 1. A connection thread sends an [`Envelope`] through the `Sender` returned by
//!    [`MiningServer::new`]
//! 2. [`MiningServer::process_tick`] drains every queued envelope, in arrival
//!    order, on the world thread
//! 3. Previews and break results are sent back as `(ActorId, Outbound)` pairs
//! 4. Selection and activation messages only update the session store
//!
//! Break requests are verified against the world before anything is broken; a
//! client cannot name contents the origin does not actually hold.
//!
//! Every world mutation happens inside `process_tick`, so the world itself needs
//! no locking. The session store is shared and may be read from any thread.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use log::{debug, info};

use crate::config::MiningConfig;
use crate::mining::actor::{ActorContext, ActorId};
use crate::mining::execution::ExecutionEngine;
use crate::mining::preview::PreviewPipeline;
use crate::mining::protocol::{Inbound, Outbound};
use crate::mining::session::SessionStore;
use crate::voxels::world::BlockBreaker;

/// One inbound message with a snapshot of the actor who sent it.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Sender at the time the message was received.
    pub actor: ActorContext,
    /// The decoded message.
    pub message: Inbound,
}

/// Routes client messages to the preview pipeline, session store and
/// execution engine.
pub struct MiningServer {
    inbound: Receiver<Envelope>,
    outbound: Sender<(ActorId, Outbound)>,
    sessions: SessionStore,
    preview: PreviewPipeline,
    engine: ExecutionEngine,
}

impl MiningServer {
    /// Creates a server and the two channel ends the connection layer uses.
    ///
    /// # Returns
    /// The server, the sender connection threads push envelopes into, and the
    /// receiver replies come out of.
    pub fn new(config: MiningConfig) -> (Self, Sender<Envelope>, Receiver<(ActorId, Outbound)>) {
        let (inbound_tx, inbound_rx) = channel::<Envelope>();
        let (outbound_tx, outbound_rx) = channel::<(ActorId, Outbound)>();

        let sessions = SessionStore::new(&config);
        let server = MiningServer {
            inbound: inbound_rx,
            outbound: outbound_tx,
            preview: PreviewPipeline::new(sessions.clone(), config.clone()),
            engine: ExecutionEngine::new(sessions.clone(), config),
            sessions,
        };

        (server, inbound_tx, outbound_rx)
    }

    /// Shared handle to the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Forgets everything known about a disconnected actor.
    pub fn disconnect(&self, actor: ActorId) {
        self.sessions.evict(actor);
        info!("actor {:?} disconnected", actor);
    }

    /// Handles a single envelope against `world`.
    ///
    /// # Returns
    /// The reply owed to the sender, if the message calls for one.
    pub fn handle(&self, world: &mut impl BlockBreaker, envelope: &Envelope) -> Option<Outbound> {
        let actor = &envelope.actor;
        match &envelope.message {
            Inbound::Target(request) => {
                Some(Outbound::Preview(self.preview.preview(&*world, actor, request)))
            }
            Inbound::Select(select) => {
                self.sessions.apply_shape_select(actor.id, select);
                None
            }
            Inbound::Activation(toggle) => {
                self.sessions.set_activated(actor.id, toggle.is_active);
                None
            }
            Inbound::Break(trigger) => {
                let report = self.engine.dispatch_requested(world, actor, trigger);
                Some(Outbound::Execution(report.to_result()))
            }
        }
    }

    /// Drains every queued envelope and sends the replies.
    ///
    /// # Returns
    /// Number of envelopes handled.
    pub fn process_tick(&mut self, world: &mut impl BlockBreaker) -> usize {
        let mut handled = 0;

        loop {
            let envelope = match self.inbound.try_recv() {
                Ok(envelope) => envelope,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("all connection senders dropped");
                    break;
                }
            };

            handled += 1;
            if let Some(reply) = self.handle(world, &envelope) {
                if self.outbound.send((envelope.actor.id, reply)).is_err() {
                    debug!("reply for {:?} dropped, receiver gone", envelope.actor.id);
                }
            }
        }

        handled
    }
}
