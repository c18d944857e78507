//! The synchronized state store.
//!
//! One [`SyncStore`] exists per session and per participant. Every mutating
//! operation takes an explicit [`Origin`]:
//!
//! - `Origin::Local` mutations are checked against ownership, applied, and
//!   queued in the outbox for the peer.
//! - `Origin::Remote` mutations are applied and never queued, so a peer's
//!   update can not echo back to it.
//!
//! Each field is written by exactly one side (my score by me, their score
//! by them, and so on), so arrival order between local edits and remote
//! messages can not produce a write-write conflict.

use crate::battlefield::Battlefield;
use crate::bounded::ScoreCounter;
use crate::display::{DisplayBindings, DisplayCallback, DisplaySlot, DisplayValue};
use crate::error::{CoreError, Result};
use crate::might::{MightBoard, MightChange, MightSlot};
use crate::role::{Origin, Role, Side};
use crate::win::{evaluate, WinOutcome, WinThreshold};
use serde::{Deserialize, Serialize};

/// A state change, named from the sender's point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// The sender's own score.
    Score(u16),
    /// The sender's threshold choice.
    WinCondition { extended: bool },
    /// Full reset of both sides.
    Reset,
    /// One of the sender's owned might slots, in the sender's naming.
    Might { slot: MightSlot, value: u16 },
    /// The sender's battlefield image.
    Battlefield(String),
}

impl Mutation {
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Score(_) => "score",
            Mutation::WinCondition { .. } => "winCondition",
            Mutation::Reset => "reset",
            Mutation::Might { .. } => "might",
            Mutation::Battlefield(_) => "battlefield",
        }
    }
}

/// Something the UI should tell the player about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The outcome changed to a win for `Side`.
    WinnerDeclared(Side),
    /// The opponent reset the game.
    OpponentReset,
}

/// A serializable copy of all synchronized and derived state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub role: Role,
    pub my_score: u16,
    pub their_score: u16,
    pub win_threshold: u16,
    pub extended: bool,
    pub own_field_own_counter: u16,
    pub remote_field_own_counter: u16,
    pub own_field_remote_counter: u16,
    pub remote_field_remote_counter: u16,
    pub my_battlefield: Option<String>,
    pub their_battlefield: Option<String>,
    pub outcome: WinOutcome,
    pub i_am_winning: bool,
    pub they_are_winning: bool,
}

impl GameSnapshot {
    pub fn might(&self, slot: MightSlot) -> u16 {
        match slot {
            MightSlot::OwnFieldOwnCounter => self.own_field_own_counter,
            MightSlot::RemoteFieldOwnCounter => self.remote_field_own_counter,
            MightSlot::OwnFieldRemoteCounter => self.own_field_remote_counter,
            MightSlot::RemoteFieldRemoteCounter => self.remote_field_remote_counter,
        }
    }

    /// The winning role, if any.
    pub fn winner(&self) -> Option<Role> {
        self.outcome
            .winner_side()
            .map(|side| self.role.resolve(side))
    }
}

/// Single source of truth for one participant's view of the game.
#[derive(Debug)]
pub struct SyncStore {
    role: Role,
    scores: [ScoreCounter; 2],
    threshold: WinThreshold,
    might: MightBoard,
    battlefield: Battlefield,
    outcome: WinOutcome,
    highlights: [bool; 2],
    outbox: Vec<Mutation>,
    notices: Vec<Notice>,
    bindings: DisplayBindings,
}

impl SyncStore {
    pub fn new(role: Role) -> Self {
        Self::with_threshold(role, WinThreshold::default())
    }

    pub fn with_threshold(role: Role, threshold: WinThreshold) -> Self {
        Self {
            role,
            scores: [ScoreCounter::ZERO; 2],
            threshold,
            might: MightBoard::new(),
            battlefield: Battlefield::new(),
            outcome: WinOutcome::NoWinner,
            highlights: [false; 2],
            outbox: Vec::new(),
            notices: Vec::new(),
            bindings: DisplayBindings::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn score(&self, side: Side) -> u16 {
        self.scores[side.index()].get()
    }

    pub fn threshold(&self) -> WinThreshold {
        self.threshold
    }

    pub fn might(&self, slot: MightSlot) -> u16 {
        self.might.get(slot)
    }

    pub fn battlefield(&self, side: Side) -> Option<&str> {
        self.battlefield.get(side)
    }

    /// The outcome as of the last mutation.
    pub fn outcome(&self) -> WinOutcome {
        self.outcome
    }

    /// The winning role, if any.
    pub fn winner(&self) -> Option<Role> {
        self.outcome
            .winner_side()
            .map(|side| self.role.resolve(side))
    }

    /// Register a display callback. Each slot can be bound once.
    pub fn bind_display(&mut self, slot: DisplaySlot, callback: DisplayCallback) -> Result<()> {
        self.bindings.bind(slot, callback)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add `delta` to a score, clamped to `[0, 99]`.
    ///
    /// Locally, only [`Side::Mine`] may be adjusted.
    pub fn adjust_score(&mut self, side: Side, delta: i32, origin: Origin) -> Result<u16> {
        Self::check_score_owner(side, origin)?;
        let value = self.scores[side.index()].adjust(delta);
        self.after_score_change(side, value, origin);
        Ok(value)
    }

    /// Overwrite a score, clamped to `[0, 99]`.
    pub fn set_score(&mut self, side: Side, value: i32, origin: Origin) -> Result<u16> {
        Self::check_score_owner(side, origin)?;
        let value = self.scores[side.index()].set(value as i64);
        self.after_score_change(side, value, origin);
        Ok(value)
    }

    /// Choose the standard or extended threshold.
    pub fn set_win_threshold(&mut self, extended: bool, origin: Origin) -> WinThreshold {
        let threshold = WinThreshold::from_extended(extended);
        if threshold != self.threshold {
            self.threshold = threshold;
            self.bindings.notify(
                DisplaySlot::Threshold,
                &DisplayValue::Threshold(threshold.points()),
            );
        }
        if origin.is_local() {
            self.outbox.push(Mutation::WinCondition { extended });
        }
        self.refresh_outcome();
        threshold
    }

    /// Change a might counter, clamped to `[0, 999]`.
    ///
    /// Locally, only the two owned slots may change. The outbox carries
    /// the local slot name; the receiver translates it.
    pub fn adjust_might(
        &mut self,
        slot: MightSlot,
        change: MightChange,
        origin: Origin,
    ) -> Result<u16> {
        if origin.is_local() && !slot.is_owned() {
            return Err(CoreError::NotOwned(format!("might counter {}", slot)));
        }
        let value = self.might.apply(slot, change);
        self.bindings
            .notify(DisplaySlot::Might(slot), &DisplayValue::Count(value));
        if origin.is_local() {
            self.outbox.push(Mutation::Might { slot, value });
        }
        Ok(value)
    }

    /// Set a battlefield image.
    ///
    /// Locally, only [`Side::Mine`] may be set, and only once per game.
    /// A remote origin may always overwrite.
    pub fn set_battlefield(&mut self, side: Side, image_ref: &str, origin: Origin) -> Result<()> {
        match (origin, side) {
            (Origin::Local, Side::Theirs) => {
                return Err(CoreError::NotOwned("opponent battlefield".to_string()));
            }
            (Origin::Local, Side::Mine) => self.battlefield.claim_mine(image_ref)?,
            (Origin::Remote, side) => self.battlefield.assign(side, image_ref)?,
        }

        let image = self.battlefield.get(side).map(str::to_string);
        if origin.is_local() {
            if let Some(image) = &image {
                self.outbox.push(Mutation::Battlefield(image.clone()));
            }
        }
        self.bindings
            .notify(DisplaySlot::Battlefield(side), &DisplayValue::Image(image));
        Ok(())
    }

    /// Zero every score and might counter and clear both battlefields.
    /// The threshold is kept.
    pub fn reset_all(&mut self, origin: Origin) {
        self.scores = [ScoreCounter::ZERO; 2];
        self.might.reset();
        self.battlefield.clear();

        for side in Side::BOTH {
            self.bindings
                .notify(DisplaySlot::Score(side), &DisplayValue::Count(0));
            self.bindings
                .notify(DisplaySlot::Battlefield(side), &DisplayValue::Image(None));
        }
        for slot in MightSlot::ALL {
            self.bindings
                .notify(DisplaySlot::Might(slot), &DisplayValue::Count(0));
        }

        match origin {
            Origin::Local => self.outbox.push(Mutation::Reset),
            Origin::Remote => self.notices.push(Notice::OpponentReset),
        }
        self.refresh_outcome();
    }

    /// Apply a mutation received from the peer.
    ///
    /// Sender-side names are translated to local ones here: their score is
    /// [`Side::Theirs`], their might slots map through
    /// [`MightSlot::counterpart`], their battlefield is ours to display.
    pub fn apply_remote(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::Score(value) => {
                self.set_score(Side::Theirs, value as i32, Origin::Remote)?;
            }
            Mutation::WinCondition { extended } => {
                self.set_win_threshold(extended, Origin::Remote);
            }
            Mutation::Reset => self.reset_all(Origin::Remote),
            Mutation::Might { slot, value } => {
                if !slot.is_owned() {
                    return Err(CoreError::NotOwned(format!(
                        "might counter {} sent by peer",
                        slot
                    )));
                }
                self.adjust_might(
                    slot.counterpart(),
                    MightChange::Absolute(value as i32),
                    Origin::Remote,
                )?;
            }
            Mutation::Battlefield(image_ref) => {
                self.set_battlefield(Side::Theirs, &image_ref, Origin::Remote)?;
            }
        }
        Ok(())
    }

    /// Queue everything this side owns, for a peer that just connected.
    ///
    /// The host also owns the threshold at connect time, so both sides
    /// start from the host's choice.
    ///
    /// Returns the number of mutations queued.
    pub fn handshake(&mut self) -> usize {
        let before = self.outbox.len();
        self.outbox.push(Mutation::Score(self.score(Side::Mine)));
        for slot in MightSlot::OWNED {
            self.outbox.push(Mutation::Might {
                slot,
                value: self.might.get(slot),
            });
        }
        if let Some(image) = self.battlefield.get(Side::Mine) {
            self.outbox.push(Mutation::Battlefield(image.to_string()));
        }
        if self.role == Role::Host {
            self.outbox.push(Mutation::WinCondition {
                extended: self.threshold.is_extended(),
            });
        }
        self.outbox.len() - before
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Evaluate the win condition without touching any state.
    pub fn evaluate_win(&self) -> WinOutcome {
        evaluate(
            self.score(Side::Mine),
            self.score(Side::Theirs),
            self.threshold,
        )
    }

    pub fn has_outbound(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Take every mutation waiting to be sent, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.outbox)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            role: self.role,
            my_score: self.score(Side::Mine),
            their_score: self.score(Side::Theirs),
            win_threshold: self.threshold.points(),
            extended: self.threshold.is_extended(),
            own_field_own_counter: self.might(MightSlot::OwnFieldOwnCounter),
            remote_field_own_counter: self.might(MightSlot::RemoteFieldOwnCounter),
            own_field_remote_counter: self.might(MightSlot::OwnFieldRemoteCounter),
            remote_field_remote_counter: self.might(MightSlot::RemoteFieldRemoteCounter),
            my_battlefield: self.battlefield(Side::Mine).map(str::to_string),
            their_battlefield: self.battlefield(Side::Theirs).map(str::to_string),
            outcome: self.outcome,
            i_am_winning: self.highlights[Side::Mine.index()],
            they_are_winning: self.highlights[Side::Theirs.index()],
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn check_score_owner(side: Side, origin: Origin) -> Result<()> {
        if origin.is_local() && side == Side::Theirs {
            return Err(CoreError::NotOwned("opponent score".to_string()));
        }
        Ok(())
    }

    fn after_score_change(&mut self, side: Side, value: u16, origin: Origin) {
        self.bindings
            .notify(DisplaySlot::Score(side), &DisplayValue::Count(value));
        // A side only ever transmits its own score.
        if origin.is_local() && side == Side::Mine {
            self.outbox.push(Mutation::Score(value));
        }
        self.refresh_outcome();
    }

    /// Recompute highlights and the outcome. A winner notice is queued only
    /// when the outcome changes.
    fn refresh_outcome(&mut self) {
        let target = self.threshold.points();
        for side in Side::BOTH {
            let winning = self.score(side) >= target;
            if self.highlights[side.index()] != winning {
                self.highlights[side.index()] = winning;
                self.bindings
                    .notify(DisplaySlot::Winning(side), &DisplayValue::Highlight(winning));
            }
        }

        let outcome = self.evaluate_win();
        if outcome != self.outcome {
            self.outcome = outcome;
            if let Some(side) = outcome.winner_side() {
                self.notices.push(Notice::WinnerDeclared(side));
            }
        }
    }
}
