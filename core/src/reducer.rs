//! Reducer
//!
//! The widget's state machine. [`reduce`] is pure, total and synchronous: it
//! never performs I/O, never panics, and returns the input unchanged for
//! messages it has nothing to do with.
//!
//! | Message | Effect |
//! |---|---|
//! | `TextInputChanged` | replace `location_text` |
//! | `SubmitLookupRequested` | status becomes loading |
//! | `LookupCompleted` (ok) | append entry, bump id, status idle, remember result |
//! | `LookupCompleted` (error) | status becomes error, history untouched |
//! | `EntryDeleted` | drop the matching entry, no-op on miss |
//! | `Unrecognized` | identity |

use crate::messages::{LookupResult, Message};
use crate::model::{Entry, LookupStatus, State};

/// Signature shared by reducers the runtime can drive
pub type ReduceFn = fn(Message, &State) -> State;

/// Compute the next state for a message
#[must_use]
pub fn reduce(message: Message, state: &State) -> State {
    match message {
        Message::TextInputChanged { text } => State {
            location_text: text,
            ..state.clone()
        },

        // The lookup itself is started by the bridge, not here.
        Message::SubmitLookupRequested => State {
            lookup_status: LookupStatus::Loading,
            ..state.clone()
        },

        Message::LookupCompleted {
            result: LookupResult::Found(report),
        } => {
            let mut history = state.history.clone();
            history.push(Entry::from_report(state.next_entry_id, &report));
            State {
                history,
                next_entry_id: state.next_entry_id.next(),
                lookup_status: LookupStatus::Idle,
                pending_lookup: Some(report),
                ..state.clone()
            }
        }

        Message::LookupCompleted {
            result: LookupResult::Failed { error_text },
        } => State {
            lookup_status: LookupStatus::Error {
                message: error_text,
            },
            ..state.clone()
        },

        Message::EntryDeleted { id } => State {
            history: state
                .history
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect(),
            ..state.clone()
        },

        Message::Unrecognized => state.clone(),
    }
}
