//! Retained Live Tree
//!
//! A [`Surface`] that keeps the live tree in memory and mutates it edit by
//! edit. Edits that do not fit the tree are logged and skipped; applying an
//! edit set never panics.

use thiserror::Error;

use super::{Edit, EditSet, Surface};
use crate::tree::Node;

/// Why an edit could not be applied
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchFault {
    /// Nothing has been mounted yet
    #[error("surface has no mounted root")]
    Unmounted,

    /// The edit addressed a node that does not exist
    #[error("no node at path {0:?}")]
    MissingNode(Vec<usize>),

    /// A child index was past the end of the parent's children
    #[error("child index {index} out of range under {parent:?} ({len} children)")]
    IndexOutOfRange {
        /// Parent node
        parent: Vec<usize>,
        /// Offending index
        index: usize,
        /// Number of children at the time
        len: usize,
    },
}

/// In-memory live tree
#[derive(Clone, Debug, Default)]
pub struct RetainedTree {
    root: Option<Node>,
    edits_applied: u64,
    faults: u64,
}

impl RetainedTree {
    /// Unmounted surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live root
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Edits applied successfully so far
    #[must_use]
    pub fn edits_applied(&self) -> u64 {
        self.edits_applied
    }

    /// Edits skipped because they did not fit the tree
    #[must_use]
    pub fn faults(&self) -> u64 {
        self.faults
    }

    /// Apply one edit
    ///
    /// # Errors
    ///
    /// Returns a [`PatchFault`] if the edit addresses a node or child index that
    /// does not exist. The tree is left untouched in that case.
    pub fn apply(&mut self, edit: &Edit) -> Result<(), PatchFault> {
        if let Edit::Replace { path, node } = edit {
            if path.is_empty() {
                self.root = Some(node.clone());
                return Ok(());
            }
        }

        let root = self.root.as_mut().ok_or(PatchFault::Unmounted)?;
        match edit {
            Edit::Replace { path, node } => {
                *node_at(root, path)? = node.clone();
            }
            Edit::SetText { path, text } => {
                node_at(root, path)?.text.clone_from(text);
            }
            Edit::SetAttr { path, name, value } => {
                node_at(root, path)?
                    .attrs
                    .insert(name.clone(), value.clone());
            }
            Edit::RemoveAttr { path, name } => {
                node_at(root, path)?.attrs.remove(name);
            }
            Edit::SetHandlers { path, handlers } => {
                node_at(root, path)?.handlers.clone_from(handlers);
            }
            Edit::InsertChild {
                parent,
                index,
                node,
            } => {
                let children = &mut node_at(root, parent)?.children;
                check_index(parent, *index, children.len(), true)?;
                children.insert(*index, node.clone());
            }
            Edit::RemoveChild { parent, index } => {
                let children = &mut node_at(root, parent)?.children;
                check_index(parent, *index, children.len(), false)?;
                children.remove(*index);
            }
            Edit::MoveChild { parent, from, to } => {
                let children = &mut node_at(root, parent)?.children;
                check_index(parent, *from, children.len(), false)?;
                check_index(parent, *to, children.len(), false)?;
                let moved = children.remove(*from);
                children.insert(*to, moved);
            }
        }
        Ok(())
    }
}

fn node_at<'a>(root: &'a mut Node, path: &[usize]) -> Result<&'a mut Node, PatchFault> {
    root.at_mut(path)
        .ok_or_else(|| PatchFault::MissingNode(path.to_vec()))
}

fn check_index(parent: &[usize], index: usize, len: usize, allow_end: bool) -> Result<(), PatchFault> {
    if index < len || (allow_end && index == len) {
        Ok(())
    } else {
        Err(PatchFault::IndexOutOfRange {
            parent: parent.to_vec(),
            index,
            len,
        })
    }
}

impl Surface for RetainedTree {
    fn mount(&mut self, root: &Node) {
        self.root = Some(root.clone());
    }

    fn patch(&mut self, edits: &EditSet) {
        for edit in edits {
            match self.apply(edit) {
                Ok(()) => self.edits_applied += 1,
                Err(fault) => {
                    self.faults += 1;
                    tracing::error!(%fault, ?edit, "Skipping edit that does not fit the live tree");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{container, text};
    use pretty_assertions::assert_eq;

    fn mounted() -> RetainedTree {
        let mut live = RetainedTree::new();
        live.mount(&container([text("a"), text("b")]));
        live
    }

    #[test]
    fn test_unmounted_rejects_edits() {
        let mut live = RetainedTree::new();
        let fault = live.apply(&Edit::SetText {
            path: vec![],
            text: None,
        });
        assert_eq!(fault, Err(PatchFault::Unmounted));
    }

    #[test]
    fn test_root_replace_mounts() {
        let mut live = RetainedTree::new();
        live.apply(&Edit::Replace {
            path: vec![],
            node: text("root"),
        })
        .unwrap();
        assert_eq!(live.root(), Some(&text("root")));
    }

    #[test]
    fn test_move_child() {
        let mut live = mounted();
        live.apply(&Edit::MoveChild {
            parent: vec![],
            from: 1,
            to: 0,
        })
        .unwrap();
        assert_eq!(live.root(), Some(&container([text("b"), text("a")])));
    }

    #[test]
    fn test_insert_at_end_allowed() {
        let mut live = mounted();
        live.apply(&Edit::InsertChild {
            parent: vec![],
            index: 2,
            node: text("c"),
        })
        .unwrap();
        assert_eq!(live.root().map(|n| n.children.len()), Some(3));
    }

    #[test]
    fn test_bad_edits_are_skipped_and_counted() {
        let mut live = mounted();
        let edits = EditSet::from(vec![
            Edit::RemoveChild {
                parent: vec![],
                index: 9,
            },
            Edit::SetText {
                path: vec![4, 2],
                text: None,
            },
            Edit::SetText {
                path: vec![0],
                text: Some("z".to_string()),
            },
        ]);
        live.patch(&edits);
        assert_eq!(live.faults(), 2);
        assert_eq!(live.edits_applied(), 1);
        assert_eq!(live.root(), Some(&container([text("z"), text("b")])));
    }

    #[test]
    fn test_missing_node_fault() {
        let mut live = mounted();
        let fault = live.apply(&Edit::SetAttr {
            path: vec![7],
            name: "class".to_string(),
            value: "x".to_string(),
        });
        assert_eq!(fault, Err(PatchFault::MissingNode(vec![7])));
    }
}
