//! Weather Widget
//!
//! Couples the dispatch loop with the lookup bridge. Surfaces report user
//! interactions as `(path, UiEvent)` pairs; the widget resolves the handler on
//! the current tree, dispatches its message and, for the submit action, starts
//! the external lookup. Completions come back through the [`Completions`]
//! returned by [`WeatherWidget::new`] and are fed to [`WeatherWidget::dispatch`].
//!
//! # Example
//!
//! ```ignore
//! let (mut widget, mut completions) =
//!     WeatherWidget::new(OpenWeatherLookup::from_env()?, State::seeded(), RetainedTree::new());
//! widget.set_location("Paris");
//! widget.submit();
//! if let Some(message) = completions.recv().await {
//!     widget.dispatch(message);
//! }
//! ```

use crate::bridge::{lookup_channel, Completions, LookupBridge, DEFAULT_CAPACITY};
use crate::lookup::WeatherLookup;
use crate::messages::Message;
use crate::model::{EntryId, State};
use crate::reconcile::Surface;
use crate::runtime::Runtime;
use crate::tree::{Action, UiEvent};
use crate::view;

/// Dispatch loop plus lookup bridge
pub struct WeatherWidget<L, S: Surface> {
    runtime: Runtime<S>,
    bridge: LookupBridge<L>,
}

impl<L: WeatherLookup + 'static, S: Surface> WeatherWidget<L, S> {
    /// Mount the widget on `surface` and return it with its completion receiver
    pub fn new(lookup: L, initial: State, surface: S) -> (Self, Completions) {
        Self::from_runtime(lookup, Runtime::new(initial, surface))
    }

    /// Wrap an already mounted runtime, e.g. one built with a custom render
    pub fn from_runtime(lookup: L, runtime: Runtime<S>) -> (Self, Completions) {
        let (bridge, completions) = lookup_channel(lookup, DEFAULT_CAPACITY);
        (Self { runtime, bridge }, completions)
    }

    /// Route a surface interaction to the handler at `path`
    ///
    /// Returns `false` when no node or no matching handler exists there.
    pub fn handle_event(&mut self, path: &[usize], event: UiEvent) -> bool {
        let Some(node) = self.runtime.tree().at(path) else {
            tracing::debug!(?path, "Event for a node that is no longer rendered");
            return false;
        };
        let Some(handler) = node.handler(event.trigger()) else {
            return false;
        };
        let starts_lookup = handler.action.starts_lookup();
        let Some(message) = handler.message_for(&event) else {
            return false;
        };

        self.dispatch(message);
        if starts_lookup {
            self.start_lookup();
        }
        true
    }

    /// Submit the current location text for lookup
    ///
    /// Returns `false` when no submit control is rendered; nothing is
    /// dispatched and no lookup starts in that case.
    pub fn submit(&mut self) -> bool {
        self.fire(&Action::SubmitLookup, UiEvent::Click)
    }

    /// Replace the location text, as typing into the input would
    pub fn set_location(&mut self, text: impl Into<String>) {
        self.fire(&Action::SetLocation, UiEvent::Input(text.into()));
    }

    /// Delete a history entry, as its delete control would
    ///
    /// Returns `false` if no row for `id` is rendered.
    pub fn delete_entry(&mut self, id: EntryId) -> bool {
        self.fire(&Action::DeleteEntry { id }, UiEvent::Click)
    }

    /// Apply a message directly (completions, scripted input)
    pub fn dispatch(&mut self, message: Message) {
        self.runtime.dispatch(message);
    }

    /// Current state snapshot
    pub fn state(&self) -> &State {
        self.runtime.state()
    }

    /// The dispatch loop
    pub fn runtime(&self) -> &Runtime<S> {
        &self.runtime
    }

    /// The live surface
    pub fn surface(&self) -> &S {
        self.runtime.surface()
    }

    /// Lookups started and not yet settled
    pub fn in_flight(&self) -> usize {
        self.bridge.in_flight()
    }

    fn fire(&mut self, action: &Action, event: UiEvent) -> bool {
        match self.runtime.tree().find_path(|node| node.handles(action)) {
            Some(path) => self.handle_event(&path, event),
            None => false,
        }
    }

    fn start_lookup(&self) {
        let query = self.state().location_text.clone();
        // The task handle is not needed; the outcome arrives as a message.
        drop(self.bridge.issue(query));
    }
}

impl<L, S: Surface> std::fmt::Debug for WeatherWidget<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherWidget")
            .field("state", self.runtime.state())
            .field("dispatched", &self.runtime.dispatch_count())
            .finish_non_exhaustive()
    }
}

/// Path of the location input in a rendered tree
#[must_use]
pub fn input_path() -> Vec<usize> {
    vec![view::CONTROLS, 0]
}
