//! # Riftlink WebAssembly Bindings
//!
//! Browser bindings for one player's side of a Riftlink game. The page owns
//! the real peer connection; this crate owns the state and the wire format.
//!
//! ## Features
//!
//! - **Companion**: the synchronized store for one player, plus the codec
//! - **VideoMirror**: local mirroring flags for the two video feeds
//! - **Room codes**: generation and validation of six-digit codes
//!
//! ## Usage
//!
//! ```javascript
//! import init, { Companion, generate_room_code } from 'riftlink-wasm';
//!
//! await init();
//!
//! const me = new Companion(true);
//! me.adjust_score(1);
//! for (const frame of me.take_outbound()) channel.send(frame);
//!
//! channel.onmessage = (event) => {
//!   if (me.receive(event.data)) render(me.snapshot());
//!   const winner = me.take_winner();
//!   if (winner) alert(`${winner} won!`);
//! };
//! ```

use riftlink_core::{
    MightChange, MightSlot, MirrorAxis, Origin, Role, RoomCode, Side, SyncStore, VideoFeed,
    VideoMirrors,
};
use riftlink_protocol::{decode_mutation, decode_value, encode_mutation, CodecError};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// ============================================================================
// Companion
// ============================================================================

/// One player's synchronized game state.
///
/// Local operations update the state and queue frames for the peer; call
/// [`Companion::take_outbound`] after each one and send every frame over
/// the data channel. Frames from the peer go to [`Companion::receive`].
#[wasm_bindgen]
pub struct Companion {
    store: SyncStore,
    winner: Option<Side>,
    opponent_reset: bool,
}

#[wasm_bindgen]
impl Companion {
    /// Create the state for a host (`true`) or guest (`false`).
    #[wasm_bindgen(constructor)]
    pub fn new(is_host: bool) -> Self {
        let role = if is_host { Role::Host } else { Role::Guest };
        Self {
            store: SyncStore::new(role),
            winner: None,
            opponent_reset: false,
        }
    }

    /// "host" or "guest".
    #[wasm_bindgen(getter)]
    pub fn role(&self) -> String {
        self.store.role().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn my_score(&self) -> u16 {
        self.store.score(Side::Mine)
    }

    #[wasm_bindgen(getter)]
    pub fn their_score(&self) -> u16 {
        self.store.score(Side::Theirs)
    }

    #[wasm_bindgen(getter)]
    pub fn win_threshold(&self) -> u16 {
        self.store.threshold().points()
    }

    /// Change the local score by `delta`. Returns the clamped score.
    pub fn adjust_score(&mut self, delta: i32) -> u16 {
        let score = self
            .store
            .adjust_score(Side::Mine, delta, Origin::Local)
            .unwrap_or_else(|_| self.store.score(Side::Mine));
        self.collect();
        score
    }

    /// Toggle the extended ("Aspirant's Climb") threshold. Returns the new
    /// threshold.
    pub fn set_aspirants_climb(&mut self, enabled: bool) -> u16 {
        let threshold = self.store.set_win_threshold(enabled, Origin::Local);
        self.collect();
        threshold.points()
    }

    /// Change one of the local player's might counters by `delta`.
    ///
    /// `key` is `ownFieldOwnCounter` or `remoteFieldOwnCounter`.
    pub fn adjust_might(&mut self, key: &str, delta: i32) -> Result<u16, JsValue> {
        self.change_might(key, MightChange::Delta(delta))
    }

    /// Set one of the local player's might counters.
    pub fn set_might(&mut self, key: &str, value: i32) -> Result<u16, JsValue> {
        self.change_might(key, MightChange::Absolute(value))
    }

    /// Read any of the four might counters by key.
    pub fn might(&self, key: &str) -> Option<u16> {
        MightSlot::from_wire_key(key).map(|slot| self.store.might(slot))
    }

    /// Claim the local battlefield. Fails if one is already set.
    pub fn claim_battlefield(&mut self, image_ref: &str) -> Result<(), JsValue> {
        let result = self
            .store
            .set_battlefield(Side::Mine, image_ref, Origin::Local);
        self.collect();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn my_battlefield(&self) -> Option<String> {
        self.store.battlefield(Side::Mine).map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn their_battlefield(&self) -> Option<String> {
        self.store.battlefield(Side::Theirs).map(str::to_string)
    }

    /// Zero both sides and tell the peer to do the same.
    pub fn reset(&mut self) {
        self.store.reset_all(Origin::Local);
        self.collect();
    }

    /// Queue the initial sync for a peer whose channel just opened.
    /// Returns the number of frames queued.
    pub fn on_connected(&mut self) -> usize {
        self.store.drain_outbox();
        self.store.handshake()
    }

    /// Apply a JSON frame from the peer. Returns whether it changed
    /// anything; bad frames are logged and ignored.
    pub fn receive(&mut self, frame: &str) -> bool {
        let mutation = decode_mutation(frame);
        self.apply(mutation)
    }

    /// Apply a frame the page already parsed into an object.
    pub fn receive_value(&mut self, value: JsValue) -> bool {
        let mutation = serde_wasm_bindgen::from_value::<serde_json::Value>(value)
            .map_err(|e| CodecError::Malformed(e.to_string()))
            .and_then(|value| decode_value(&value))
            .map(|message| message.into_mutation());
        self.apply(mutation)
    }

    /// Frames waiting to be sent, oldest first.
    pub fn take_outbound(&mut self) -> Vec<String> {
        self.store
            .drain_outbox()
            .iter()
            .filter_map(|mutation| match encode_mutation(mutation) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    log_warn(&format!("Failed to encode {}: {}", mutation.kind(), e));
                    None
                }
            })
            .collect()
    }

    /// "You" or "Opponent" once per new winner, otherwise nothing.
    pub fn take_winner(&mut self) -> Option<String> {
        self.winner
            .take()
            .map(|side| side.display_name().to_string())
    }

    /// Whether the opponent reset the game since the last call.
    pub fn take_opponent_reset(&mut self) -> bool {
        std::mem::take(&mut self.opponent_reset)
    }

    /// Whether each side is at or over the threshold, as `[mine, theirs]`.
    pub fn highlights(&self) -> Vec<u8> {
        let snapshot = self.store.snapshot();
        vec![
            snapshot.i_am_winning as u8,
            snapshot.they_are_winning as u8,
        ]
    }

    /// All state as a plain object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.store.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// All state as a JSON string.
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.store.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl Companion {
    fn change_might(&mut self, key: &str, change: MightChange) -> Result<u16, JsValue> {
        let slot = MightSlot::from_wire_key(key)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown might counter: {}", key)))?;
        let result = self.store.adjust_might(slot, change, Origin::Local);
        self.collect();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn apply(&mut self, mutation: Result<riftlink_core::Mutation, CodecError>) -> bool {
        let mutation = match mutation {
            Ok(mutation) => mutation,
            Err(e) if e.is_unknown_kind() => {
                log_debug(&format!("Ignoring frame: {}", e));
                return false;
            }
            Err(e) => {
                log_warn(&format!("Dropping malformed frame: {}", e));
                return false;
            }
        };

        let kind = mutation.kind();
        let applied = match self.store.apply_remote(mutation) {
            Ok(()) => true,
            Err(e) => {
                log_warn(&format!("Rejected {} from peer: {}", kind, e));
                false
            }
        };
        self.collect();
        applied
    }

    fn collect(&mut self) {
        for notice in self.store.drain_notices() {
            match notice {
                riftlink_core::Notice::WinnerDeclared(side) => self.winner = Some(side),
                riftlink_core::Notice::OpponentReset => self.opponent_reset = true,
            }
        }
    }
}

// ============================================================================
// VideoMirror
// ============================================================================

/// Mirroring flags for the local and opponent video feeds. Never synced.
#[wasm_bindgen]
pub struct VideoMirror {
    mirrors: VideoMirrors,
}

#[wasm_bindgen]
impl VideoMirror {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            mirrors: VideoMirrors::new(),
        }
    }

    /// Flip one axis of one feed. `feed` is "own" or "opponent", `axis`
    /// is "horizontal" or "vertical". Returns the feed's CSS transform.
    pub fn toggle(&mut self, feed: &str, axis: &str) -> Result<String, JsValue> {
        let feed = parse_feed(feed)?;
        let axis = match axis {
            "horizontal" => MirrorAxis::Horizontal,
            "vertical" => MirrorAxis::Vertical,
            other => return Err(JsValue::from_str(&format!("Unknown axis: {}", other))),
        };
        Ok(self.mirrors.toggle(feed, axis).css_transform())
    }

    /// The CSS transform for a feed.
    pub fn css_transform(&self, feed: &str) -> Result<String, JsValue> {
        Ok(self.mirrors.flags(parse_feed(feed)?).css_transform())
    }

    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        let own = self.mirrors.flags(VideoFeed::Own);
        let opponent = self.mirrors.flags(VideoFeed::Opponent);
        let state = MirrorState {
            own_horizontal: own.horizontal,
            own_vertical: own.vertical,
            opponent_horizontal: opponent.horizontal,
            opponent_vertical: opponent.vertical,
        };
        serde_wasm_bindgen::to_value(&state).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for VideoMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MirrorState {
    own_horizontal: bool,
    own_vertical: bool,
    opponent_horizontal: bool,
    opponent_vertical: bool,
}

fn parse_feed(feed: &str) -> Result<VideoFeed, JsValue> {
    match feed {
        "own" => Ok(VideoFeed::Own),
        "opponent" => Ok(VideoFeed::Opponent),
        other => Err(JsValue::from_str(&format!("Unknown feed: {}", other))),
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Generate a random six-digit room code.
#[wasm_bindgen]
pub fn generate_room_code() -> Result<String, JsValue> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(RoomCode::from_entropy(u32::from_le_bytes(bytes)).to_string())
}

/// Normalize a typed room code, or return nothing if it is not six digits.
#[wasm_bindgen]
pub fn validate_room_code(input: &str) -> Option<String> {
    RoomCode::parse(input).ok().map(|code| code.to_string())
}

/// Log a message to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(target_arch = "wasm32")]
fn log_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(target_arch = "wasm32")]
fn log_debug(message: &str) {
    web_sys::console::debug_1(&JsValue::from_str(message));
}

// Imported JS functions abort off the browser.
#[cfg(not(target_arch = "wasm32"))]
fn log_warn(_message: &str) {}

#[cfg(not(target_arch = "wasm32"))]
fn log_debug(_message: &str) {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(from: &mut Companion, to: &mut Companion) -> usize {
        let frames = from.take_outbound();
        for frame in &frames {
            assert!(to.receive(frame));
        }
        frames.len()
    }

    #[test]
    fn test_score_sync() {
        let mut host = Companion::new(true);
        let mut guest = Companion::new(false);

        assert_eq!(host.adjust_score(3), 3);
        assert_eq!(forward(&mut host, &mut guest), 1);
        assert_eq!(guest.their_score(), 3);

        // Applying a frame never produces one.
        assert!(guest.take_outbound().is_empty());
    }

    #[test]
    fn test_winner_is_reported_once() {
        let mut host = Companion::new(true);
        let mut guest = Companion::new(false);

        host.adjust_score(8);
        forward(&mut host, &mut guest);

        assert_eq!(host.take_winner().as_deref(), Some("You"));
        assert_eq!(guest.take_winner().as_deref(), Some("Opponent"));
        assert_eq!(guest.take_winner(), None);
        assert_eq!(guest.highlights(), vec![0, 1]);
    }

    #[test]
    fn test_aspirants_climb() {
        let mut host = Companion::new(true);
        let mut guest = Companion::new(false);

        assert_eq!(guest.set_aspirants_climb(true), 9);
        forward(&mut guest, &mut host);
        assert_eq!(host.win_threshold(), 9);
    }

    #[test]
    fn test_might_keys() {
        let mut host = Companion::new(true);
        let mut guest = Companion::new(false);

        assert!(host.adjust_might("ownFieldOwnCounter", 4).is_ok());
        forward(&mut host, &mut guest);
        assert_eq!(guest.might("remoteFieldRemoteCounter"), Some(4));
        assert_eq!(guest.might("bogus"), None);
    }

    #[test]
    fn test_bad_frames_are_ignored() {
        let mut guest = Companion::new(false);
        assert!(!guest.receive("{"));
        assert!(!guest.receive(r#"{"type":"score","score":"abc"}"#));
        assert!(!guest.receive(r#"{"type":"hello"}"#));
        assert_eq!(guest.their_score(), 0);
    }

    #[test]
    fn test_reset_and_battlefield() {
        let mut host = Companion::new(true);
        let mut guest = Companion::new(false);

        assert!(host.claim_battlefield("grove.png").is_ok());
        forward(&mut host, &mut guest);
        assert_eq!(guest.their_battlefield().as_deref(), Some("grove.png"));

        guest.reset();
        forward(&mut guest, &mut host);
        assert!(host.take_opponent_reset());
        assert_eq!(host.my_battlefield(), None);
    }

    #[test]
    fn test_on_connected_queues_owned_state() {
        let mut guest = Companion::new(false);
        guest.adjust_score(2);
        assert_eq!(guest.on_connected(), 3);
        assert_eq!(guest.take_outbound().len(), 3);
    }

    #[test]
    fn test_room_codes() {
        let code = generate_room_code().unwrap();
        assert_eq!(validate_room_code(&code), Some(code.clone()));
        assert_eq!(validate_room_code(" 123456 ").as_deref(), Some("123456"));
        assert_eq!(validate_room_code("12345"), None);
    }

    #[test]
    fn test_snapshot_json() {
        let mut host = Companion::new(true);
        host.adjust_score(5);
        let json = host.snapshot_json().unwrap();
        assert!(json.contains("\"myScore\":5"));
    }
}
