//! Widgets
//!
//! - [`TreeView`]: scrollable rendering of a live widget tree

mod tree_view;

pub use tree_view::{TreeView, TreeViewState};
