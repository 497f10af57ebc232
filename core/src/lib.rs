//! Skycast Core - Headless Weather Lookup Widget
//!
//! This crate provides the complete weather widget: state, reducer, tree
//! builder, reconciler, dispatch loop and the async lookup bridge. It is
//! independent of any UI framework and can drive a terminal, a test recorder,
//! or run headless from scripted messages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Surfaces                                 │
//! │   ┌──────────────┐   ┌──────────────┐   ┌─────────────────────┐  │
//! │   │ TUI          │   │ RetainedTree │   │ Headless (stdin)    │  │
//! │   │ (ratatui)    │   │ (tests)      │   │                     │  │
//! │   └──────┬───────┘   └──────┬───────┘   └──────────┬──────────┘  │
//! │          └──────────────────┴──────────────────────┘             │
//! │                (path, UiEvent) up      EditSet down              │
//! └──────────────────────────────┼───────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────────┐
//! │                        SKYCAST CORE                               │
//! │   WeatherWidget ── Runtime: reduce → render → diff → patch       │
//! │        │                                                          │
//! │        └── LookupBridge ── tokio task ── WeatherLookup (HTTP)    │
//! │                 │                                                 │
//! │                 └──── LookupCompleted ──▶ Completions ──▶ dispatch│
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`State`]: the single state aggregate
//! - [`Message`]: intents consumed by [`reduce`]
//! - [`Node`]: declarative tree produced by [`render`]
//! - [`Runtime`]: the dispatch loop
//! - [`WeatherWidget`]: dispatch loop plus lookup bridge
//! - [`WeatherLookup`]: external lookup capability
//!
//! # Module Overview
//!
//! - [`model`]: state, entries, reports, units
//! - [`messages`]: message enum and its JSON wire form
//! - [`reducer`]: pure state transitions
//! - [`tree`]: node, handler and action types
//! - [`view`]: state → tree
//! - [`reconcile`]: keyed diff and the retained live tree
//! - [`runtime`]: the dispatch loop
//! - [`bridge`]: async lookups → completion messages
//! - [`lookup`]: weather provider abstraction (OpenWeather)
//! - [`widget`]: the assembled widget
//! - [`config`]: TOML + environment configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod config;
pub mod lookup;
pub mod messages;
pub mod model;
pub mod reconcile;
pub mod reducer;
pub mod runtime;
pub mod tree;
pub mod view;
pub mod widget;

// Re-exports for convenience
pub use bridge::{lookup_channel, Completions, LookupBridge};
pub use lookup::{LookupError, OpenWeatherLookup, WeatherLookup};
pub use messages::{LookupResult, Message};
pub use model::{Entry, EntryId, LookupStatus, State, Units, WeatherReport};
pub use reconcile::{Edit, EditSet, KeyedReconciler, PatchFault, Reconciler, RetainedTree, Surface};
pub use reducer::reduce;
pub use runtime::Runtime;
pub use tree::{Action, Handler, Key, Node, Tag, Trigger, UiEvent};
pub use view::render;
pub use widget::WeatherWidget;

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigSource,
    LookupConfig, SkycastConfig, SkycastToml, WidgetConfig,
};
