//! Session lifecycle state machine.
//!
//! ```text
//! Idle --BeginCreate--> Creating --Established--> AwaitingPeer --PeerLinked--> Connected
//! Idle --BeginJoin----> Joining  --Established--> AwaitingPeer
//! Creating/Joining --Failed--> Idle
//! AwaitingPeer/Connected --ChannelClosed--> Disconnected
//! ```
//!
//! `Disconnected` is terminal for a session; a new game starts a new one.

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Creating,
    Joining,
    AwaitingPeer,
    Connected,
    Disconnected,
}

impl SessionState {
    /// Whether state changes are exchanged with a peer.
    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Disconnected)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleTrigger {
    BeginCreate,
    BeginJoin,
    /// The room was registered or reached.
    Established,
    /// Registration or join failed.
    Failed,
    /// Channel open and media ready.
    PeerLinked,
    ChannelClosed,
}

/// Tracks the current [`SessionState`] and rejects illegal moves.
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    state: SessionState,
    history: Vec<SessionState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state visited, oldest first, excluding the current one.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// The state `trigger` would lead to, if legal.
    pub fn next(state: SessionState, trigger: LifecycleTrigger) -> Option<SessionState> {
        use LifecycleTrigger as T;
        use SessionState as S;

        match (state, trigger) {
            (S::Idle, T::BeginCreate) => Some(S::Creating),
            (S::Idle, T::BeginJoin) => Some(S::Joining),
            (S::Creating | S::Joining, T::Established) => Some(S::AwaitingPeer),
            (S::Creating | S::Joining, T::Failed) => Some(S::Idle),
            (S::AwaitingPeer, T::PeerLinked) => Some(S::Connected),
            (S::AwaitingPeer | S::Connected, T::ChannelClosed) => Some(S::Disconnected),
            (S::Disconnected, T::ChannelClosed) => Some(S::Disconnected),
            _ => None,
        }
    }

    /// Move to the next state, or fail without changing anything.
    pub fn apply(&mut self, trigger: LifecycleTrigger) -> Result<SessionState> {
        let next = Self::next(self.state, trigger).ok_or(SdkError::InvalidTransition {
            from: self.state,
            trigger,
        })?;
        if next != self.state {
            self.history.push(self.state);
            self.state = next;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_path() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.apply(LifecycleTrigger::BeginCreate).unwrap();
        lifecycle.apply(LifecycleTrigger::Established).unwrap();
        assert_eq!(
            lifecycle.apply(LifecycleTrigger::PeerLinked).unwrap(),
            SessionState::Connected
        );
        assert_eq!(
            lifecycle.history(),
            &[
                SessionState::Idle,
                SessionState::Creating,
                SessionState::AwaitingPeer
            ]
        );
    }

    #[test]
    fn test_failed_join_returns_to_idle() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.apply(LifecycleTrigger::BeginJoin).unwrap();
        assert_eq!(
            lifecycle.apply(LifecycleTrigger::Failed).unwrap(),
            SessionState::Idle
        );
    }

    #[test]
    fn test_disconnect_is_terminal() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.apply(LifecycleTrigger::BeginJoin).unwrap();
        lifecycle.apply(LifecycleTrigger::Established).unwrap();
        lifecycle.apply(LifecycleTrigger::ChannelClosed).unwrap();

        assert!(lifecycle.state().is_terminal());
        assert!(lifecycle.apply(LifecycleTrigger::ChannelClosed).is_ok());
        assert!(matches!(
            lifecycle.apply(LifecycleTrigger::PeerLinked),
            Err(SdkError::InvalidTransition {
                from: SessionState::Disconnected,
                trigger: LifecycleTrigger::PeerLinked,
            })
        ));
    }

    #[test]
    fn test_cannot_link_before_established() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.apply(LifecycleTrigger::PeerLinked).is_err());
        assert_eq!(lifecycle.state(), SessionState::Idle);
    }
}
