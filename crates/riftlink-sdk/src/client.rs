//! High-level client for the Riftlink SDK.

use crate::error::{Result, SdkError};
use crate::lifecycle::{Lifecycle, LifecycleTrigger};
use crate::network::{NetworkError, SessionAdapter};
use crate::session::Session;
use crate::sync::{SyncConfig, SyncConfigBuilder};
use rand::Rng;
use riftlink_core::{CoreError, Role, RoomCode, WinThreshold};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Public STUN servers handed to a browser peer connection.
pub const DEFAULT_ICE_SERVERS: [&str; 2] = [
    "stun:stun.l.google.com:19302",
    "stun:global.stun.twilio.com:3478",
];

/// Fresh codes drawn before a collision is reported.
const ROOM_CODE_ATTEMPTS: usize = 8;

/// Configuration for the Riftlink client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Name shown for the local player.
    pub player_name: String,
    /// Start every session with the extended threshold.
    pub extended_win_by_default: bool,
    /// ICE servers for a real peer connection. Opaque to the SDK.
    pub ice_servers: Vec<String>,
    /// Session synchronization settings.
    pub sync: SyncConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            extended_win_by_default: false,
            ice_servers: DEFAULT_ICE_SERVERS.iter().map(|s| s.to_string()).collect(),
            sync: SyncConfig::default(),
        }
    }
}

/// Builder for client configuration.
pub struct ClientConfigBuilder {
    config: ClientConfig,
    sync: SyncConfigBuilder,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            sync: SyncConfigBuilder::new(),
        }
    }

    pub fn player_name(mut self, name: impl Into<String>) -> Self {
        self.config.player_name = name.into();
        self
    }

    pub fn extended_win_by_default(mut self, extended: bool) -> Self {
        self.config.extended_win_by_default = extended;
        self
    }

    pub fn ice_servers(mut self, servers: Vec<String>) -> Self {
        self.config.ice_servers = servers;
        self
    }

    pub fn require_media(mut self, required: bool) -> Self {
        self.sync = self.sync.require_media(required);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.sync = self.sync.event_capacity(capacity);
        self
    }

    /// Replace all sync settings at once.
    pub fn sync(mut self, sync: SyncConfig) -> Self {
        self.sync = SyncConfigBuilder::from(sync);
        self
    }

    pub fn build(mut self) -> ClientConfig {
        self.config.sync = self.sync.build();
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for hosting or joining a game.
///
/// # Example
///
/// ```rust
/// use riftlink_sdk::{Client, ClientConfig, MemoryRendezvous};
///
/// # tokio_test::block_on(async {
/// let rendezvous = MemoryRendezvous::new();
/// let host = Client::new(rendezvous.clone(), ClientConfig::default());
/// let guest = Client::new(rendezvous, ClientConfig::default());
///
/// let hosted = host.create_room().await.unwrap();
/// let joined = guest.join_room(hosted.room().as_str()).await.unwrap();
///
/// hosted.pump().await;
/// joined.pump().await;
/// assert!(hosted.state().is_connected());
/// # });
/// ```
pub struct Client<A: SessionAdapter> {
    adapter: Arc<A>,
    config: ClientConfig,
}

impl<A: SessionAdapter> Client<A> {
    pub fn new(adapter: A, config: ClientConfig) -> Self {
        Self {
            adapter: Arc::new(adapter),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn player_name(&self) -> &str {
        &self.config.player_name
    }

    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    /// Host a game under a freshly generated room code. A code that is
    /// already in use is replaced by a new one.
    pub async fn create_room(&self) -> Result<Arc<Session<A::Transport>>> {
        self.create_room_from(generate_room_code).await
    }

    async fn create_room_from(
        &self,
        mut next_code: impl FnMut() -> RoomCode,
    ) -> Result<Arc<Session<A::Transport>>> {
        let mut attempt = 1;
        loop {
            match self.create_room_with_code(next_code()).await {
                Err(SdkError::Network(NetworkError::RoomTaken(room)))
                    if attempt < ROOM_CODE_ATTEMPTS =>
                {
                    debug!(%room, attempt, "Room code collided; drawing another");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Host a game under a chosen room code.
    pub async fn create_room_with_code(
        &self,
        room: RoomCode,
    ) -> Result<Arc<Session<A::Transport>>> {
        let mut lifecycle = Lifecycle::new();
        lifecycle.apply(LifecycleTrigger::BeginCreate)?;
        info!(%room, player = %self.config.player_name, "Creating room");

        match self.adapter.create_session(&room).await {
            Ok(transport) => self.establish(room, Role::Host, transport, lifecycle),
            Err(e) => {
                lifecycle.apply(LifecycleTrigger::Failed)?;
                warn!(%room, error = %e, "Room creation failed");
                Err(e.into())
            }
        }
    }

    /// Join a game by the code the host shared. Surrounding whitespace is
    /// ignored.
    pub async fn join_room(&self, code: &str) -> Result<Arc<Session<A::Transport>>> {
        let room = RoomCode::parse(code).map_err(SdkError::from)?;
        let mut lifecycle = Lifecycle::new();
        lifecycle.apply(LifecycleTrigger::BeginJoin)?;
        info!(%room, player = %self.config.player_name, "Joining room");

        match self.adapter.join_session(&room).await {
            Ok(transport) => self.establish(room, Role::Guest, transport, lifecycle),
            Err(e) => {
                lifecycle.apply(LifecycleTrigger::Failed)?;
                warn!(%room, error = %e, "Join failed");
                Err(e.into())
            }
        }
    }

    fn establish(
        &self,
        room: RoomCode,
        role: Role,
        transport: A::Transport,
        mut lifecycle: Lifecycle,
    ) -> Result<Arc<Session<A::Transport>>> {
        lifecycle.apply(LifecycleTrigger::Established)?;
        let threshold = WinThreshold::from_extended(self.config.extended_win_by_default);
        let session = Session::new(
            room,
            role,
            transport,
            lifecycle,
            threshold,
            self.config.sync.clone(),
        )?;
        Ok(Arc::new(session))
    }
}

/// A random six-digit room code.
pub fn generate_room_code() -> RoomCode {
    let entropy: u32 = rand::thread_rng().gen();
    RoomCode::from_entropy(entropy)
}

/// Reject anything that is not a six-digit code, before touching the
/// network.
pub fn validate_room_code(code: &str) -> std::result::Result<RoomCode, CoreError> {
    RoomCode::parse(code)
}

/// Convenience functions for two-player setups over the memory transport.
pub mod quick {
    use super::*;
    use crate::network::{MemoryRendezvous, MemoryTransport};

    /// A host and guest session in the same room, already connected.
    pub async fn connected_pair(
        host_config: ClientConfig,
        guest_config: ClientConfig,
    ) -> Result<(Arc<Session<MemoryTransport>>, Arc<Session<MemoryTransport>>)> {
        let rendezvous = MemoryRendezvous::new();
        let host = Client::new(rendezvous.clone(), host_config)
            .create_room()
            .await?;
        let guest = Client::new(rendezvous, guest_config)
            .join_room(host.room().as_str())
            .await?;
        settle(&host, &guest).await;
        Ok((host, guest))
    }

    /// Pump both sides until neither has anything left to handle.
    pub async fn settle(host: &Session<MemoryTransport>, guest: &Session<MemoryTransport>) -> usize {
        let mut total = 0;
        loop {
            let handled = host.pump().await + guest.pump().await;
            if handled == 0 {
                return total;
            }
            total += handled;
        }
    }
}
