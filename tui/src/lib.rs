//! Skycast TUI - Terminal surface for the skycast weather widget
//!
//! This crate mounts the headless widget from `skycast-core` on a terminal.
//!
//! # Architecture
//!
//! - **Surface**: live tree kept in a retained tree, drawn every frame
//! - **Widgets**: scrollable tree view with focus highlighting
//! - **App**: key handling and the `select!` event loop
//! - **Headless**: JSON-lines driver for scripting and tests

pub mod app;
pub mod headless;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use surface::TerminalSurface;
