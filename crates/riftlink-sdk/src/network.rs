//! Peer session boundary and an in-memory implementation.
//!
//! A real deployment hands the SDK a [`SessionAdapter`] backed by a browser
//! peer-connection library. Everything that library would report through
//! callbacks (peer arrival, channel open, media, data, closure) is
//! delivered as a [`TransportEvent`] on a single ordered queue.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use riftlink_core::RoomCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Unique identifier for a peer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh, unguessable identity.
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the transport reports, in delivery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// A peer arrived in the room (host side).
    PeerConnected(PeerId),
    /// The data channel is open.
    ChannelOpen,
    /// The opponent's media stream arrived.
    RemoteStream,
    /// A data frame from the peer.
    Message(String),
    /// Local media could not be acquired.
    MediaFailed(String),
    /// The data channel closed.
    ChannelClosed,
}

/// Network error type.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Room {0} is already in use")]
    RoomTaken(String),
    #[error("Room {0} not found")]
    RoomNotFound(String),
    #[error("Room {0} already has two players")]
    RoomFull(String),
    #[error("Channel closed")]
    ChannelClosed,
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Transport events already subscribed")]
    AlreadySubscribed,
}

/// One established (or pending) peer connection.
#[async_trait]
pub trait PeerTransport: Send + Sync + 'static {
    /// This participant's addressable identity.
    fn local_id(&self) -> &PeerId;

    /// Whether the data channel is currently open.
    fn is_open(&self) -> bool;

    /// Send a frame to the peer over the ordered, reliable channel.
    async fn send(&self, frame: String) -> Result<(), NetworkError>;

    /// Close the data channel. Both sides observe `ChannelClosed`.
    async fn close(&self) -> Result<(), NetworkError>;

    /// Take the inbound event queue. Can only be taken once.
    fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<TransportEvent>, NetworkError>;
}

/// Creates and joins rooms.
#[async_trait]
pub trait SessionAdapter: Send + Sync + 'static {
    type Transport: PeerTransport;

    /// Register `room` and wait for a guest.
    async fn create_session(&self, room: &RoomCode) -> Result<Self::Transport, NetworkError>;

    /// Connect to the host registered under `room`.
    async fn join_session(&self, room: &RoomCode) -> Result<Self::Transport, NetworkError>;
}

/// The far end of a memory channel.
struct Link {
    peer_id: PeerId,
    peer_tx: mpsc::UnboundedSender<TransportEvent>,
    /// Shared by both ends.
    open: Arc<AtomicBool>,
}

type SharedLink = Arc<RwLock<Option<Link>>>;
type RoomTable = Arc<RwLock<HashMap<RoomCode, RoomEntry>>>;

/// Where a transport's room is registered. Closing frees the code.
struct Registration {
    rooms: RoomTable,
    room: RoomCode,
    /// Identifies this room's entry, so a later room under the same code is
    /// left alone.
    host_link: SharedLink,
}

/// In-memory transport for testing and simulation.
///
/// Queues are unbounded like a reliable data channel's send buffer, so a
/// send never waits for the peer to drain.
pub struct MemoryTransport {
    local_id: PeerId,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<TransportEvent>>>,
    link: SharedLink,
    registration: Option<Registration>,
}

impl MemoryTransport {
    fn new(local_id: PeerId) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            local_id,
            event_tx: tx,
            event_rx: Mutex::new(Some(rx)),
            link: Arc::new(RwLock::new(None)),
            registration: None,
        }
    }

    /// Identity of the connected peer, if any.
    pub fn peer_id(&self) -> Option<PeerId> {
        self.link.read().as_ref().map(|link| link.peer_id.clone())
    }

    /// Report a media failure on this side.
    pub async fn fail_media(&self, reason: impl Into<String>) -> Result<(), NetworkError> {
        self.event_tx
            .send(TransportEvent::MediaFailed(reason.into()))
            .map_err(|e| NetworkError::SendFailed(e.to_string()))
    }

    /// Inject a raw frame as if the peer had sent it.
    pub async fn inject(&self, frame: impl Into<String>) -> Result<(), NetworkError> {
        self.event_tx
            .send(TransportEvent::Message(frame.into()))
            .map_err(|e| NetworkError::SendFailed(e.to_string()))
    }

    fn release_room(&self) {
        let Some(registration) = &self.registration else {
            return;
        };
        let mut rooms = registration.rooms.write();
        let ours = rooms
            .get(&registration.room)
            .map_or(false, |entry| Arc::ptr_eq(&entry.host_link, &registration.host_link));
        if ours {
            rooms.remove(&registration.room);
            debug!(room = %registration.room, "Room released");
        }
    }
}

#[async_trait]
impl PeerTransport for MemoryTransport {
    fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    fn is_open(&self) -> bool {
        self.link
            .read()
            .as_ref()
            .map_or(false, |link| link.open.load(Ordering::SeqCst))
    }

    async fn send(&self, frame: String) -> Result<(), NetworkError> {
        let link = self.link.read();
        let sent = match link.as_ref() {
            Some(link) if link.open.load(Ordering::SeqCst) => link
                .peer_tx
                .send(TransportEvent::Message(frame))
                .map_err(|e| NetworkError::SendFailed(e.to_string())),
            _ => Err(NetworkError::ChannelClosed),
        };
        sent
    }

    async fn close(&self) -> Result<(), NetworkError> {
        let peer_tx = {
            let link = self.link.read();
            match link.as_ref() {
                Some(link) if link.open.swap(false, Ordering::SeqCst) => Some(link.peer_tx.clone()),
                _ => None,
            }
        };

        if let Some(peer_tx) = peer_tx {
            let _ = peer_tx.send(TransportEvent::ChannelClosed);
            let _ = self.event_tx.send(TransportEvent::ChannelClosed);
        }
        self.release_room();
        Ok(())
    }

    fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<TransportEvent>, NetworkError> {
        self.event_rx
            .lock()
            .take()
            .ok_or(NetworkError::AlreadySubscribed)
    }
}

struct RoomEntry {
    host_id: PeerId,
    host_tx: mpsc::UnboundedSender<TransportEvent>,
    host_link: SharedLink,
    guest: Option<PeerId>,
}

/// In-memory signalling broker pairing a host and a guest by room code.
#[derive(Clone)]
pub struct MemoryRendezvous {
    rooms: RoomTable,
    media: bool,
}

impl MemoryRendezvous {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            media: true,
        }
    }

    /// A broker whose peers never deliver a media stream.
    pub fn without_media(mut self) -> Self {
        self.media = false;
        self
    }

    /// Rooms currently registered. A room is freed when either side closes.
    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    /// Create `room` and join it, returning `(host, guest)`.
    pub async fn connect_pair(
        &self,
        room: &RoomCode,
    ) -> Result<(MemoryTransport, MemoryTransport), NetworkError> {
        let host = self.create_session(room).await?;
        let guest = self.join_session(room).await?;
        Ok((host, guest))
    }

    fn registration(&self, room: &RoomCode, host_link: &SharedLink) -> Registration {
        Registration {
            rooms: self.rooms.clone(),
            room: room.clone(),
            host_link: host_link.clone(),
        }
    }
}

impl Default for MemoryRendezvous {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionAdapter for MemoryRendezvous {
    type Transport = MemoryTransport;

    async fn create_session(&self, room: &RoomCode) -> Result<MemoryTransport, NetworkError> {
        let mut rooms = self.rooms.write();
        if rooms.contains_key(room) {
            return Err(NetworkError::RoomTaken(room.to_string()));
        }

        // The host is addressable by the room code itself.
        let mut host = MemoryTransport::new(PeerId::new(room.as_str()));
        host.registration = Some(self.registration(room, &host.link));
        rooms.insert(
            room.clone(),
            RoomEntry {
                host_id: host.local_id.clone(),
                host_tx: host.event_tx.clone(),
                host_link: host.link.clone(),
                guest: None,
            },
        );
        Ok(host)
    }

    async fn join_session(&self, room: &RoomCode) -> Result<MemoryTransport, NetworkError> {
        let mut guest = MemoryTransport::new(PeerId::generate());

        let host_tx = {
            let mut rooms = self.rooms.write();
            let entry = rooms
                .get_mut(room)
                .ok_or_else(|| NetworkError::RoomNotFound(room.to_string()))?;
            if entry.guest.is_some() {
                return Err(NetworkError::RoomFull(room.to_string()));
            }
            entry.guest = Some(guest.local_id.clone());

            let open = Arc::new(AtomicBool::new(true));
            *entry.host_link.write() = Some(Link {
                peer_id: guest.local_id.clone(),
                peer_tx: guest.event_tx.clone(),
                open: open.clone(),
            });
            *guest.link.write() = Some(Link {
                peer_id: entry.host_id.clone(),
                peer_tx: entry.host_tx.clone(),
                open,
            });
            guest.registration = Some(self.registration(room, &entry.host_link));
            entry.host_tx.clone()
        };

        let mut host_events = vec![
            TransportEvent::PeerConnected(guest.local_id.clone()),
            TransportEvent::ChannelOpen,
        ];
        let mut guest_events = vec![TransportEvent::ChannelOpen];
        if self.media {
            host_events.push(TransportEvent::RemoteStream);
            guest_events.push(TransportEvent::RemoteStream);
        }

        for event in host_events {
            host_tx
                .send(event)
                .map_err(|e| NetworkError::SendFailed(e.to_string()))?;
        }
        for event in guest_events {
            guest
                .event_tx
                .send(event)
                .map_err(|e| NetworkError::SendFailed(e.to_string()))?;
        }

        Ok(guest)
    }
}
