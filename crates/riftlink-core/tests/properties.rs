//! Property-based tests for the synchronized state store.
//!
//! These cover the invariants two stores rely on to agree:
//! - Every counter stays inside its clamp bounds
//! - Remote application never queues outbound mutations
//! - Forwarding one store's outbox into the other converges both views
//! - Win evaluation is a pure function of scores and threshold

use proptest::prelude::*;
use riftlink_core::{
    evaluate, MightChange, MightSlot, Mutation, Origin, Role, Side, SyncStore, WinThreshold,
    MIGHT_MAX, SCORE_MAX,
};

#[derive(Clone, Debug)]
enum LocalOp {
    Score(i32),
    Threshold(bool),
    Might(MightSlot, i32),
    Reset,
}

fn local_op_strategy() -> impl Strategy<Value = LocalOp> {
    prop_oneof![
        4 => (-20i32..20).prop_map(LocalOp::Score),
        1 => any::<bool>().prop_map(LocalOp::Threshold),
        3 => (prop::sample::select(MightSlot::OWNED.to_vec()), -50i32..50)
            .prop_map(|(slot, delta)| LocalOp::Might(slot, delta)),
        1 => Just(LocalOp::Reset),
    ]
}

fn apply_local(store: &mut SyncStore, op: &LocalOp) {
    match op {
        LocalOp::Score(delta) => {
            store.adjust_score(Side::Mine, *delta, Origin::Local).unwrap();
        }
        LocalOp::Threshold(extended) => {
            store.set_win_threshold(*extended, Origin::Local);
        }
        LocalOp::Might(slot, delta) => {
            store
                .adjust_might(*slot, MightChange::Delta(*delta), Origin::Local)
                .unwrap();
        }
        LocalOp::Reset => store.reset_all(Origin::Local),
    }
}

fn forward(from: &mut SyncStore, to: &mut SyncStore) {
    for mutation in from.drain_outbox() {
        to.apply_remote(mutation).unwrap();
    }
}

proptest! {
    #[test]
    fn score_always_within_bounds(deltas in prop::collection::vec(any::<i32>(), 0..50)) {
        let mut store = SyncStore::new(Role::Host);
        for delta in deltas {
            let value = store.adjust_score(Side::Mine, delta, Origin::Local).unwrap();
            prop_assert!(value <= SCORE_MAX);
        }
    }

    #[test]
    fn remote_score_is_clamped(value in any::<i32>()) {
        let mut store = SyncStore::new(Role::Guest);
        let applied = store.set_score(Side::Theirs, value, Origin::Remote).unwrap();
        prop_assert!(applied <= SCORE_MAX);
        prop_assert!(!store.has_outbound());
    }

    #[test]
    fn might_always_within_bounds(
        slot in prop::sample::select(MightSlot::OWNED.to_vec()),
        changes in prop::collection::vec(any::<i32>(), 0..50)
    ) {
        let mut store = SyncStore::new(Role::Host);
        for change in changes {
            let value = store
                .adjust_might(slot, MightChange::Delta(change), Origin::Local)
                .unwrap();
            prop_assert!(value <= MIGHT_MAX);
        }
    }

    #[test]
    fn counterpart_is_an_involution(slot in prop::sample::select(MightSlot::ALL.to_vec())) {
        prop_assert_eq!(slot.counterpart().counterpart(), slot);
        prop_assert_ne!(slot.counterpart().is_owned(), slot.is_owned());
    }

    #[test]
    fn evaluation_is_idempotent(mine in 0u16..=99, theirs in 0u16..=99, extended in any::<bool>()) {
        let threshold = WinThreshold::from_extended(extended);
        prop_assert_eq!(evaluate(mine, theirs, threshold), evaluate(mine, theirs, threshold));
    }

    #[test]
    fn remote_application_never_queues(values in prop::collection::vec(0u16..=99, 1..20)) {
        let mut store = SyncStore::new(Role::Guest);
        for value in values {
            store.apply_remote(Mutation::Score(value)).unwrap();
            store.apply_remote(Mutation::Might {
                slot: MightSlot::OwnFieldOwnCounter,
                value,
            }).unwrap();
        }
        prop_assert!(!store.has_outbound());
    }

    #[test]
    fn forwarded_outboxes_converge(
        host_ops in prop::collection::vec(local_op_strategy(), 0..30),
        guest_ops in prop::collection::vec(local_op_strategy(), 0..30)
    ) {
        let mut host = SyncStore::new(Role::Host);
        let mut guest = SyncStore::new(Role::Guest);

        // Alternate turns, forwarding after each step as an ordered channel would.
        let rounds = host_ops.len().max(guest_ops.len());
        for i in 0..rounds {
            if let Some(op) = host_ops.get(i) {
                apply_local(&mut host, op);
                forward(&mut host, &mut guest);
            }
            if let Some(op) = guest_ops.get(i) {
                apply_local(&mut guest, op);
                forward(&mut guest, &mut host);
            }
        }

        prop_assert_eq!(host.score(Side::Mine), guest.score(Side::Theirs));
        prop_assert_eq!(host.score(Side::Theirs), guest.score(Side::Mine));
        prop_assert_eq!(host.threshold(), guest.threshold());
        for slot in MightSlot::ALL {
            prop_assert_eq!(host.might(slot), guest.might(slot.counterpart()));
        }
        // Both sides over the line is reported as a local win on each side.
        let target = host.threshold().points();
        if host.score(Side::Mine) < target || host.score(Side::Theirs) < target {
            prop_assert_eq!(host.winner(), guest.winner());
        }
    }
}
