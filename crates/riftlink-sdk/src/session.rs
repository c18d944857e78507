//! A live two-player game session.
//!
//! A [`Session`] owns one participant's [`SyncStore`] and the transport to
//! the other participant. Local operations go store → outbox → codec →
//! transport. Inbound transport events are consumed by a single dispatch
//! path ([`Session::pump`] or [`Session::run`]) in arrival order.

use crate::error::{Result, SdkError};
use crate::lifecycle::{Lifecycle, LifecycleTrigger, SessionState};
use crate::network::{PeerId, PeerTransport, TransportEvent};
use crate::sync::SyncConfig;
use parking_lot::Mutex;
use riftlink_core::{
    DisplayCallback, DisplaySlot, GameSnapshot, MightChange, MightSlot, Mutation, Notice, Origin,
    Role, RoomCode, Side, SyncStore, WinThreshold,
};
use riftlink_protocol::{decode_mutation, encode_mutation};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, trace, warn};

/// Events emitted by a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The lifecycle moved to a new state.
    StateChanged(SessionState),
    /// A guest arrived (host side).
    PeerJoined(PeerId),
    /// Channel and media are up; the handshake was sent.
    Connected,
    /// The outcome changed to a win.
    WinnerDeclared { winner: Role, side: Side },
    /// The opponent reset the game.
    OpponentReset,
    /// An inbound frame was discarded.
    MessageDropped { reason: String },
    /// Non-fatal transport trouble worth showing the player.
    TransportNotice(String),
    /// The channel closed. State is frozen.
    Disconnected,
}

#[derive(Clone, Copy, Debug, Default)]
struct LinkProgress {
    channel_open: bool,
    media_ready: bool,
}

/// One participant's side of a game.
pub struct Session<T: PeerTransport> {
    room: RoomCode,
    transport: Arc<T>,
    store: Mutex<SyncStore>,
    lifecycle: Mutex<Lifecycle>,
    link: Mutex<LinkProgress>,
    peer: Mutex<Option<PeerId>>,
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<TransportEvent>>,
    event_tx: broadcast::Sender<SessionEvent>,
    config: SyncConfig,
}

impl<T: PeerTransport> Session<T> {
    /// Wrap an established transport.
    ///
    /// `lifecycle` must have reached [`SessionState::AwaitingPeer`].
    pub fn new(
        room: RoomCode,
        role: Role,
        transport: T,
        lifecycle: Lifecycle,
        threshold: WinThreshold,
        config: SyncConfig,
    ) -> Result<Self> {
        if lifecycle.state() != SessionState::AwaitingPeer {
            return Err(SdkError::InvalidTransition {
                from: lifecycle.state(),
                trigger: LifecycleTrigger::Established,
            });
        }

        let inbound = transport.subscribe()?;
        let (event_tx, _) = broadcast::channel(config.event_capacity);

        Ok(Self {
            room,
            transport: Arc::new(transport),
            store: Mutex::new(SyncStore::with_threshold(role, threshold)),
            lifecycle: Mutex::new(lifecycle),
            link: Mutex::new(LinkProgress::default()),
            peer: Mutex::new(None),
            inbound: tokio::sync::Mutex::new(inbound),
            event_tx,
            config,
        })
    }

    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    pub fn role(&self) -> Role {
        self.store.lock().role()
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.lock().state()
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The connected peer's identity, once known.
    pub fn peer_id(&self) -> Option<PeerId> {
        self.peer.lock().clone()
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.store.lock().snapshot()
    }

    /// Register a display callback for one slot.
    pub fn bind_display(&self, slot: DisplaySlot, callback: DisplayCallback) -> Result<()> {
        self.store.lock().bind_display(slot, callback)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Local operations
    // ------------------------------------------------------------------

    /// Change the local player's score by `delta`.
    pub async fn adjust_score(&self, delta: i32) -> Result<u16> {
        self.apply_local(|store| store.adjust_score(Side::Mine, delta, Origin::Local))
            .await
    }

    /// Pick the standard or extended threshold for both players.
    pub async fn set_win_condition(&self, extended: bool) -> Result<WinThreshold> {
        self.apply_local(|store| Ok(store.set_win_threshold(extended, Origin::Local)))
            .await
    }

    /// Change one of the local player's might counters.
    pub async fn adjust_might(&self, slot: MightSlot, change: MightChange) -> Result<u16> {
        self.apply_local(|store| store.adjust_might(slot, change, Origin::Local))
            .await
    }

    /// Claim the local battlefield. Only once per game.
    pub async fn claim_battlefield(&self, image_ref: &str) -> Result<()> {
        self.apply_local(|store| store.set_battlefield(Side::Mine, image_ref, Origin::Local))
            .await
    }

    /// Zero everything on both sides.
    pub async fn reset(&self) -> Result<()> {
        self.apply_local(|store| {
            store.reset_all(Origin::Local);
            Ok(())
        })
        .await
    }

    /// Close the channel. The peer observes the closure too.
    pub async fn leave(&self) -> Result<()> {
        info!(room = %self.room, "Leaving session");
        self.transport.close().await?;
        self.pump().await;
        Ok(())
    }

    async fn apply_local<R>(
        &self,
        op: impl FnOnce(&mut SyncStore) -> riftlink_core::Result<R>,
    ) -> Result<R> {
        let (result, outbound, notices) = {
            let mut store = self.store.lock();
            let result = op(&mut store)?;
            (result, store.drain_outbox(), store.drain_notices())
        };
        self.publish(notices);
        self.transmit(outbound).await;
        Ok(result)
    }

    async fn transmit(&self, outbound: Vec<Mutation>) {
        if outbound.is_empty() {
            return;
        }
        if !self.state().is_connected() || !self.transport.is_open() {
            debug!(
                room = %self.room,
                held = outbound.len(),
                "Channel not open; changes will go out with the handshake"
            );
            return;
        }

        for mutation in outbound {
            let frame = match encode_mutation(&mutation) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(kind = mutation.kind(), error = %e, "Failed to encode mutation");
                    continue;
                }
            };
            trace!(room = %self.room, kind = mutation.kind(), %frame, "Sending frame");
            if let Err(e) = self.transport.send(frame).await {
                warn!(room = %self.room, error = %e, "Send failed");
                self.emit(SessionEvent::TransportNotice(e.to_string()));
            }
        }
    }

    // ------------------------------------------------------------------
    // Inbound dispatch
    // ------------------------------------------------------------------

    /// Handle every inbound event already queued. Returns how many were
    /// handled.
    pub async fn pump(&self) -> usize {
        let mut handled = 0;
        loop {
            let event = {
                let mut inbound = self.inbound.lock().await;
                match inbound.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                }
            };
            self.handle_event(event).await;
            handled += 1;
        }
        handled
    }

    /// Handle inbound events until the channel closes or the transport
    /// goes away.
    pub async fn run(&self) {
        loop {
            let event = { self.inbound.lock().await.recv().await };
            match event {
                Some(TransportEvent::ChannelClosed) | None => {
                    self.mark_disconnected();
                    break;
                }
                Some(event) => self.handle_event(event).await,
            }
        }
    }

    async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::PeerConnected(peer_id) => {
                info!(room = %self.room, peer = %peer_id, "Peer joined");
                *self.peer.lock() = Some(peer_id.clone());
                self.emit(SessionEvent::PeerJoined(peer_id));
            }
            TransportEvent::ChannelOpen => {
                self.link.lock().channel_open = true;
                self.try_connect().await;
            }
            TransportEvent::RemoteStream => {
                self.link.lock().media_ready = true;
                self.try_connect().await;
            }
            TransportEvent::MediaFailed(reason) => {
                warn!(room = %self.room, %reason, "Media unavailable");
                self.emit(SessionEvent::TransportNotice(format!(
                    "camera or microphone unavailable: {}",
                    reason
                )));
            }
            TransportEvent::Message(frame) => {
                if let Err(e) = self.receive(&frame) {
                    self.drop_frame(e);
                }
            }
            TransportEvent::ChannelClosed => self.mark_disconnected(),
        }
    }

    fn receive(&self, frame: &str) -> Result<()> {
        if self.state().is_terminal() {
            debug!(room = %self.room, "Ignoring frame after disconnect");
            return Ok(());
        }

        let mutation = decode_mutation(frame)?;
        let kind = mutation.kind();
        let notices = {
            let mut store = self.store.lock();
            store.apply_remote(mutation)?;
            store.drain_notices()
        };
        trace!(room = %self.room, kind, "Applied remote mutation");
        self.emit(SessionEvent::StateChanged(self.state()));
        self.publish(notices);
        Ok(())
    }

    fn drop_frame(&self, error: SdkError) {
        match &error {
            SdkError::Codec(e) if e.is_unknown_kind() => {
                debug!(room = %self.room, error = %e, "Ignoring unknown message kind");
                return;
            }
            SdkError::Codec(e) => warn!(room = %self.room, error = %e, "Dropping malformed frame"),
            _ => warn!(room = %self.room, error = %error, "Rejected remote mutation"),
        }
        self.emit(SessionEvent::MessageDropped {
            reason: error.to_string(),
        });
    }

    async fn try_connect(&self) {
        let link = *self.link.lock();
        let ready = link.channel_open && (link.media_ready || !self.config.require_media);
        if !ready || self.state() != SessionState::AwaitingPeer {
            return;
        }

        let outbound = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.apply(LifecycleTrigger::PeerLinked).is_err() {
                return;
            }
            let mut store = self.store.lock();
            store.drain_outbox();
            store.handshake();
            store.drain_outbox()
        };

        info!(room = %self.room, role = %self.role(), "Session connected");
        self.emit(SessionEvent::StateChanged(SessionState::Connected));
        self.emit(SessionEvent::Connected);
        self.transmit(outbound).await;
    }

    fn mark_disconnected(&self) {
        let changed = {
            let mut lifecycle = self.lifecycle.lock();
            let before = lifecycle.state();
            match lifecycle.apply(LifecycleTrigger::ChannelClosed) {
                Ok(after) => before != after,
                Err(e) => {
                    debug!(room = %self.room, error = %e, "Ignoring channel closure");
                    false
                }
            }
        };
        self.link.lock().channel_open = false;

        if changed {
            info!(room = %self.room, "Session disconnected");
            self.emit(SessionEvent::StateChanged(SessionState::Disconnected));
            self.emit(SessionEvent::Disconnected);
        }
    }

    fn publish(&self, notices: Vec<Notice>) {
        let role = self.role();
        for notice in notices {
            let event = match notice {
                Notice::WinnerDeclared(side) => {
                    let winner = role.resolve(side);
                    info!(room = %self.room, %winner, "Winner declared");
                    SessionEvent::WinnerDeclared { winner, side }
                }
                Notice::OpponentReset => SessionEvent::OpponentReset,
            };
            self.emit(event);
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}
