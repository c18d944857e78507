//! Riftlink SDK - peer sessions for a two-player tabletop scoreboard
//!
//! This SDK pairs two players in a room, keeps each player's
//! [`SyncStore`](riftlink_core::SyncStore) in step over a data channel, and
//! reports winners, resets and connection changes as events.
//!
//! # Quick Start
//!
//! ```rust
//! use riftlink_sdk::client::quick;
//! use riftlink_sdk::ClientConfig;
//! use riftlink_sdk::game::Role;
//!
//! # tokio_test::block_on(async {
//! let (host, guest) = quick::connected_pair(ClientConfig::default(), ClientConfig::default())
//!     .await
//!     .unwrap();
//!
//! // The host scores to the standard threshold
//! host.adjust_score(8).await.unwrap();
//! quick::settle(&host, &guest).await;
//!
//! assert_eq!(guest.snapshot().their_score, 8);
//! assert_eq!(guest.snapshot().winner(), Some(Role::Host));
//! # });
//! ```
//!
//! # Architecture
//!
//! - [`client`] - Hosting and joining rooms
//! - [`session`] - A connected game: local operations and inbound dispatch
//! - [`lifecycle`] - Session state machine
//! - [`network`] - Transport boundary and in-memory implementation
//! - [`sync`] - Synchronization settings
//! - [`cards`] - Card lookup for battlefield images
//! - [`error`] - Error types

pub mod cards;
pub mod client;
pub mod error;
pub mod lifecycle;
pub mod network;
pub mod session;
pub mod sync;

// Re-exports for convenience
pub use cards::{CardCatalog, CardLookup, CardSummary, LookupError};
pub use client::{
    generate_room_code, validate_room_code, Client, ClientConfig, ClientConfigBuilder,
};
pub use error::{Result, SdkError};
pub use lifecycle::{Lifecycle, LifecycleTrigger, SessionState};
pub use network::{
    MemoryRendezvous, MemoryTransport, NetworkError, PeerId, PeerTransport, SessionAdapter,
    TransportEvent,
};
pub use session::{Session, SessionEvent};
pub use sync::{SyncConfig, SyncConfigBuilder};

/// The game-state model and wire codec this SDK is built on.
pub use riftlink_core as game;
pub use riftlink_protocol as wire;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::{Client, ClientConfig};
    pub use crate::error::SdkError;
    pub use crate::network::{MemoryRendezvous, PeerTransport, SessionAdapter};
    pub use crate::session::{Session, SessionEvent};
    pub use riftlink_core::{MightChange, MightSlot, Role, Side};
}
