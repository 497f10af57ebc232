//! Property-based invariant tests for the keyed reconciler.
//!
//! For any pair of trees:
//!
//! 1. Diffing a tree against itself produces no edits.
//! 2. Applying `diff(a, b)` to a live copy of `a` yields exactly `b`.
//! 3. Diff is deterministic.
//! 4. Applying the edits never faults.
//!
//! And for any message sequence fed to the dispatch loop, the live surface
//! equals `render(state)` after every message.

use proptest::prelude::*;

use skycast_core::tree::{button, container, input, row, text};
use skycast_core::{
    render, Action, EntryId, Handler, KeyedReconciler, LookupResult, Message, Node, Reconciler,
    RetainedTree, Runtime, State, Surface, WeatherReport,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-c]{0,2}".prop_map(|s| text(s)),
        "[a-c]{0,2}".prop_map(|s| input(s)),
        (0u64..4).prop_map(|id| button("x").on(Handler::on_click(Action::DeleteEntry {
            id: EntryId(id)
        }))),
    ]
}

fn decorate(node: Node, key: Option<u8>, class: Option<u8>) -> Node {
    let node = match key {
        Some(k) => node.key(format!("k{k}").as_str()),
        None => node,
    };
    match class {
        Some(c) => node.class(format!("c{c}")),
        None => node,
    }
}

fn tree() -> impl Strategy<Value = Node> {
    let leaf = (leaf(), proptest::option::of(0u8..5), proptest::option::of(0u8..3))
        .prop_map(|(node, key, class)| decorate(node, key, class));
    leaf.prop_recursive(3, 32, 6, |inner| {
        (
            proptest::collection::vec(inner, 0..6),
            any::<bool>(),
            proptest::option::of(0u8..5),
            proptest::option::of(0u8..3),
        )
            .prop_map(|(children, is_row, key, class)| {
                let node = if is_row { row(children) } else { container(children) };
                decorate(node, key, class)
            })
    })
}

fn message() -> impl Strategy<Value = Message> {
    prop_oneof![
        "[A-Za-z ]{0,8}".prop_map(|text| Message::TextInputChanged { text }),
        Just(Message::SubmitLookupRequested),
        ("[A-Z][a-z]{1,6}", -30.0f64..40.0).prop_map(|(name, t)| Message::LookupCompleted {
            result: LookupResult::Found(WeatherReport::new(name, t, t + 2.0, t - 2.0)),
        }),
        "[a-z ]{1,12}".prop_map(|e| Message::LookupCompleted {
            result: LookupResult::failed(e),
        }),
        (0u64..8).prop_map(|id| Message::EntryDeleted { id: EntryId(id) }),
        Just(Message::Unrecognized),
    ]
}

fn apply(old: &Node, new: &Node) -> RetainedTree {
    let mut live = RetainedTree::new();
    live.mount(old);
    live.patch(&KeyedReconciler::new().diff(old, new));
    live
}

// ═════════════════════════════════════════════════════════════════════════
// Reconciler invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identical_trees_produce_empty_diff(a in tree()) {
        let edits = KeyedReconciler::new().diff(&a, &a);
        prop_assert!(edits.is_empty(), "expected no edits, got {:?}", edits);
    }

    #[test]
    fn patch_of_diff_reaches_target(a in tree(), b in tree()) {
        let live = apply(&a, &b);
        prop_assert_eq!(live.root(), Some(&b));
        prop_assert_eq!(live.faults(), 0);
    }

    #[test]
    fn diff_is_deterministic(a in tree(), b in tree()) {
        let reconciler = KeyedReconciler::new();
        prop_assert_eq!(reconciler.diff(&a, &b), reconciler.diff(&a, &b));
    }

    #[test]
    fn container_rewrap_converges(children in proptest::collection::vec(tree(), 0..5)) {
        let mut reversed = children.clone();
        reversed.reverse();
        let a = container(children);
        let b = container(reversed);
        let live = apply(&a, &b);
        prop_assert_eq!(live.root(), Some(&b));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Dispatch loop invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn live_surface_tracks_state(messages in proptest::collection::vec(message(), 0..24)) {
        let mut runtime = Runtime::new(State::seeded(), RetainedTree::new());
        for message in messages {
            runtime.dispatch(message);
            prop_assert_eq!(runtime.surface().root(), Some(&render(runtime.state())));
        }
        prop_assert_eq!(runtime.surface().faults(), 0);
    }

    #[test]
    fn entry_ids_stay_unique(messages in proptest::collection::vec(message(), 0..32)) {
        let mut runtime = Runtime::new(State::seeded(), RetainedTree::new());
        for message in messages {
            runtime.dispatch(message);
        }
        let state = runtime.state();
        let mut ids: Vec<_> = state.history.iter().map(|e| e.id).collect();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), len);
        prop_assert!(state.history.iter().all(|e| e.id < state.next_entry_id));
    }
}
