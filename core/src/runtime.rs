//! Dispatch Loop
//!
//! [`Runtime`] owns the current state, the current tree and the live surface.
//! Each [`Runtime::dispatch`] runs reduce → render → diff → patch → commit to
//! completion before returning. `dispatch` takes `&mut self`, so a second
//! dispatch cannot start while one is running.
//!
//! # Example
//!
//! ```
//! use skycast_core::{Message, RetainedTree, Runtime, State};
//!
//! let mut runtime = Runtime::new(State::seeded(), RetainedTree::new());
//! runtime.dispatch(Message::TextInputChanged { text: "Paris".into() });
//! assert_eq!(runtime.state().location_text, "Paris");
//! assert_eq!(runtime.surface().root(), Some(runtime.tree()));
//! ```

use crate::messages::Message;
use crate::model::State;
use crate::reconcile::{KeyedReconciler, Reconciler, Surface};
use crate::reducer::{self, ReduceFn};
use crate::tree::Node;
use crate::view;

/// Signature shared by tree builders the runtime can drive
pub type RenderFn = fn(&State) -> Node;

/// The dispatch loop
pub struct Runtime<S: Surface, R: Reconciler = KeyedReconciler> {
    /// Current state snapshot
    state: State,
    /// Tree rendered from `state`
    tree: Node,
    /// State transition function
    reduce: ReduceFn,
    /// Tree builder
    render: RenderFn,
    /// Diff implementation
    reconciler: R,
    /// Live output surface
    surface: S,
    /// Messages processed so far
    dispatched: u64,
}

impl<S: Surface> Runtime<S> {
    /// Create a runtime with the widget's reducer, tree builder and the keyed
    /// reconciler, and mount the initial tree on `surface`
    pub fn new(initial: State, surface: S) -> Self {
        Self::with_parts(
            initial,
            reducer::reduce,
            view::render,
            KeyedReconciler::new(),
            surface,
        )
    }
}

impl<S: Surface, R: Reconciler> Runtime<S, R> {
    /// Create a runtime from explicit parts and mount the initial tree
    pub fn with_parts(
        initial: State,
        reduce: ReduceFn,
        render: RenderFn,
        reconciler: R,
        mut surface: S,
    ) -> Self {
        let tree = render(&initial);
        surface.mount(&tree);
        tracing::debug!(nodes = tree.size(), "Mounted initial tree");

        Self {
            state: initial,
            tree,
            reduce,
            render,
            reconciler,
            surface,
            dispatched: 0,
        }
    }

    /// Process one message
    pub fn dispatch(&mut self, message: Message) {
        let kind = message.kind();

        let state = (self.reduce)(message, &self.state);
        // Always re-render; unchanged states simply diff to nothing.
        let tree = (self.render)(&state);
        let edits = self.reconciler.diff(&self.tree, &tree);
        self.surface.patch(&edits);

        self.state = state;
        self.tree = tree;
        self.dispatched += 1;

        tracing::debug!(
            kind,
            edits = edits.len(),
            seq = self.dispatched,
            "Dispatched message"
        );
    }

    /// Current state snapshot
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Tree rendered from the current state
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// The live surface (read-only; only `dispatch` mutates it)
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Messages processed so far
    pub fn dispatch_count(&self) -> u64 {
        self.dispatched
    }

    /// Tear down the runtime, handing back the final state and surface
    pub fn into_parts(self) -> (State, S) {
        (self.state, self.surface)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::messages::LookupResult;
    use crate::model::{EntryId, WeatherReport};
    use crate::reconcile::{Edit, EditSet, RetainedTree};
    use crate::tree::text;
    use pretty_assertions::assert_eq;

    /// Surface that records what it was asked to do
    #[derive(Default)]
    struct RecordingSurface {
        mounted: Option<Node>,
        patches: Vec<EditSet>,
    }

    impl Surface for RecordingSurface {
        fn mount(&mut self, root: &Node) {
            self.mounted = Some(root.clone());
        }

        fn patch(&mut self, edits: &EditSet) {
            self.patches.push(edits.clone());
        }
    }

    /// Reconciler that always replaces the root and remembers its inputs
    #[derive(Clone, Default)]
    struct FakeReconciler {
        calls: Rc<RefCell<Vec<(Node, Node)>>>,
    }

    impl Reconciler for FakeReconciler {
        fn diff(&self, old: &Node, new: &Node) -> EditSet {
            self.calls.borrow_mut().push((old.clone(), new.clone()));
            EditSet::from(vec![Edit::Replace {
                path: vec![],
                node: new.clone(),
            }])
        }
    }

    fn paris() -> Message {
        Message::LookupCompleted {
            result: LookupResult::Found(WeatherReport::new("Paris", 15.0, 17.0, 12.0)),
        }
    }

    #[test]
    fn test_new_mounts_initial_tree() {
        let runtime = Runtime::new(State::seeded(), RecordingSurface::default());
        assert_eq!(
            runtime.surface().mounted.as_ref(),
            Some(&view::render(&State::seeded()))
        );
        assert_eq!(runtime.dispatch_count(), 0);
    }

    #[test]
    fn test_dispatch_commits_state_and_tree() {
        let mut runtime = Runtime::new(State::seeded(), RetainedTree::new());
        let before = runtime.state().clone();

        runtime.dispatch(Message::SubmitLookupRequested);

        let expected = reducer::reduce(Message::SubmitLookupRequested, &before);
        assert_eq!(runtime.state(), &expected);
        assert_eq!(runtime.tree(), &view::render(&expected));
        assert_eq!(runtime.surface().root(), Some(runtime.tree()));
        assert_eq!(runtime.dispatch_count(), 1);
    }

    #[test]
    fn test_diff_receives_previous_and_next_tree() {
        let reconciler = FakeReconciler::default();
        let calls = reconciler.calls.clone();
        let mut runtime = Runtime::with_parts(
            State::seeded(),
            reducer::reduce,
            view::render,
            reconciler,
            RecordingSurface::default(),
        );
        let first_tree = runtime.tree().clone();

        runtime.dispatch(Message::TextInputChanged {
            text: "Paris".to_string(),
        });

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, first_tree);
        assert_eq!(&calls[0].1, runtime.tree());
        assert_eq!(runtime.surface().patches.len(), 1);
    }

    #[test]
    fn test_unchanged_state_still_patches_empty_set() {
        let mut runtime = Runtime::new(State::seeded(), RecordingSurface::default());
        runtime.dispatch(Message::Unrecognized);
        runtime.dispatch(Message::EntryDeleted { id: EntryId(42) });
        assert_eq!(runtime.surface().patches.len(), 2);
        assert!(runtime.surface().patches.iter().all(EditSet::is_empty));
        assert_eq!(runtime.state(), &State::seeded());
    }

    #[test]
    fn test_custom_reduce_and_render() {
        fn count_reduce(_message: Message, state: &State) -> State {
            State {
                location_text: format!("{}!", state.location_text),
                ..state.clone()
            }
        }
        fn plain_render(state: &State) -> Node {
            text(state.location_text.as_str())
        }

        let mut runtime = Runtime::with_parts(
            State::empty(),
            count_reduce,
            plain_render,
            KeyedReconciler::new(),
            RetainedTree::new(),
        );
        runtime.dispatch(Message::Unrecognized);
        runtime.dispatch(Message::Unrecognized);
        assert_eq!(runtime.surface().root(), Some(&text("!!")));
    }

    #[test]
    fn test_live_surface_tracks_full_scenario() {
        let mut runtime = Runtime::new(State::seeded(), RetainedTree::new());
        let messages = vec![
            Message::TextInputChanged {
                text: "Paris".to_string(),
            },
            Message::SubmitLookupRequested,
            paris(),
            Message::EntryDeleted { id: EntryId(1) },
            Message::LookupCompleted {
                result: LookupResult::failed("not found"),
            },
        ];
        for message in messages {
            runtime.dispatch(message);
            assert_eq!(runtime.surface().root(), Some(runtime.tree()));
            assert_eq!(runtime.tree(), &view::render(runtime.state()));
        }
        assert_eq!(runtime.surface().faults(), 0);

        let (state, _surface) = runtime.into_parts();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].id, EntryId(2));
        assert_eq!(state.error_message(), Some("not found"));
    }
}
