//! Async Action Bridge
//!
//! Starts external lookups and turns each outcome into exactly one
//! `LookupCompleted` message. The dispatch loop never awaits anything: the
//! bridge spawns a tokio task per lookup, and completions come back through an
//! mpsc channel that the owner of the dispatch loop drains.
//!
//! # Design Philosophy
//!
//! The sending half ([`LookupBridge`]) and the receiving half ([`Completions`])
//! are separate values, so an event loop can `select!` on completions while
//! still holding the widget mutably.
//!
//! Overlapping lookups are allowed. Each one completes on its own, and the
//! last completion to arrive decides the final status. Issuing while another
//! lookup is in flight is logged at `warn`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lookup::WeatherLookup;
use crate::messages::{LookupResult, Message};

/// Default completion channel capacity
pub const DEFAULT_CAPACITY: usize = 16;

/// Create a bridge for `lookup` and the receiver for its completions
pub fn lookup_channel<L: WeatherLookup + 'static>(
    lookup: L,
    capacity: usize,
) -> (LookupBridge<L>, Completions) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let bridge = LookupBridge {
        lookup: Arc::new(lookup),
        tx,
        in_flight: Arc::new(AtomicUsize::new(0)),
    };
    (bridge, Completions { rx })
}

/// Sending half: starts lookups
pub struct LookupBridge<L> {
    lookup: Arc<L>,
    tx: mpsc::Sender<Message>,
    in_flight: Arc<AtomicUsize>,
}

impl<L: WeatherLookup + 'static> LookupBridge<L> {
    /// Start a lookup for `query`
    ///
    /// Must be called from within a tokio runtime. The spawned task sends
    /// exactly one `LookupCompleted` unless the receiver is gone.
    pub fn issue(&self, query: impl Into<String>) -> JoinHandle<()> {
        let query = query.into();
        let previous = self.in_flight.fetch_add(1, Ordering::SeqCst);
        if previous > 0 {
            tracing::warn!(
                in_flight = previous,
                query = %query,
                "Lookup started while another is in flight; last completion wins"
            );
        }

        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        tokio::spawn(async move {
            tracing::debug!(provider = lookup.name(), query = %query, "Lookup started");
            let result = LookupResult::from(lookup.lookup(&query).await);
            drop(guard);

            if let LookupResult::Failed { error_text } = &result {
                tracing::info!(query = %query, error = %error_text, "Lookup completed with error");
            }
            if tx.send(Message::LookupCompleted { result }).await.is_err() {
                tracing::debug!(query = %query, "Completion dropped: receiver closed");
            }
        })
    }

    /// Lookups started and not yet settled
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The lookup capability in use
    #[must_use]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}

/// Releases one in-flight slot when dropped, including when a lookup panics
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Receiving half: completion messages waiting to be dispatched
#[derive(Debug)]
pub struct Completions {
    rx: mpsc::Receiver<Message>,
}

impl Completions {
    /// Wait for the next completion
    ///
    /// Returns `None` once the bridge is dropped and every task has settled.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Take a completion if one is ready
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }
}
