//! Reconciliation
//!
//! Turns the difference between two trees into an ordered [`EditSet`] and
//! applies it to a live [`Surface`].
//!
//! # Contract
//!
//! - [`Reconciler::diff`] is pure and deterministic. Children are matched by
//!   [`Key`](crate::tree::Key) first, then by position among unkeyed siblings.
//! - Edits are meant to be applied in order, once. Every index and path in an
//!   edit is valid for the tree as it stands after the edits before it.
//! - [`Surface::patch`] is the only place a live surface changes.
//!
//! # Available Implementations
//!
//! - [`KeyedReconciler`]: key-aware diff producing a short edit list
//! - [`RetainedTree`]: in-memory live tree, used headless and as the backing
//!   store of the terminal surface

mod keyed;
mod retained;

use serde::{Deserialize, Serialize};

use crate::tree::{Handler, Node};

pub use keyed::KeyedReconciler;
pub use retained::{PatchFault, RetainedTree};

/// A single mutation of a live tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edit {
    /// Swap the node at `path` (the root when `path` is empty)
    Replace {
        /// Target node
        path: Vec<usize>,
        /// Replacement subtree
        node: Node,
    },
    /// Change a node's text content
    SetText {
        /// Target node
        path: Vec<usize>,
        /// New text
        text: Option<String>,
    },
    /// Add or overwrite an attribute
    SetAttr {
        /// Target node
        path: Vec<usize>,
        /// Attribute name
        name: String,
        /// Attribute value
        value: String,
    },
    /// Drop an attribute
    RemoveAttr {
        /// Target node
        path: Vec<usize>,
        /// Attribute name
        name: String,
    },
    /// Replace a node's handler list
    SetHandlers {
        /// Target node
        path: Vec<usize>,
        /// New handlers
        handlers: Vec<Handler>,
    },
    /// Insert a new child
    InsertChild {
        /// Parent node
        parent: Vec<usize>,
        /// Position of the new child
        index: usize,
        /// Child subtree
        node: Node,
    },
    /// Remove a child
    RemoveChild {
        /// Parent node
        parent: Vec<usize>,
        /// Position of the removed child
        index: usize,
    },
    /// Move an existing child to another position
    MoveChild {
        /// Parent node
        parent: Vec<usize>,
        /// Current position
        from: usize,
        /// Position after the move
        to: usize,
    },
}

/// Ordered list of edits produced by one diff
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    /// Empty edit set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edit
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Number of edits
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether there is nothing to apply
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits in application order
    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    /// Edits as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Edit] {
        &self.edits
    }
}

impl From<Vec<Edit>> for EditSet {
    fn from(edits: Vec<Edit>) -> Self {
        Self { edits }
    }
}

impl<'a> IntoIterator for &'a EditSet {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// Computes edits between two trees
pub trait Reconciler {
    /// Edits that turn `old` into `new`
    fn diff(&self, old: &Node, new: &Node) -> EditSet;
}

/// A live output surface
///
/// Implement this trait to show trees somewhere (terminal, test recorder, ...).
pub trait Surface {
    /// Attach the initial tree
    fn mount(&mut self, root: &Node);

    /// Apply edits in order
    fn patch(&mut self, edits: &EditSet);
}
