//! Terminal Surface
//!
//! The live surface the TUI mounts the widget on. It keeps the live tree in a
//! [`RetainedTree`] and draws it with [`TreeView`] on every frame. Focus is a
//! path into the live tree, owned by the app; the surface only answers which
//! nodes can take it.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

use skycast_core::{EditSet, Node, RetainedTree, Surface, Tag};

use crate::widgets::{TreeView, TreeViewState};

/// Live tree drawn into a ratatui buffer
#[derive(Debug, Default)]
pub struct TerminalSurface {
    live: RetainedTree,
}

impl TerminalSurface {
    /// Unmounted surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live root, once mounted
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.live.root()
    }

    /// Edits skipped because they did not fit the live tree
    #[must_use]
    pub fn faults(&self) -> u64 {
        self.live.faults()
    }

    /// Paths of controls that accept focus, in document order
    #[must_use]
    pub fn focusables(&self) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        if let Some(root) = self.live.root() {
            root.walk(&mut Vec::new(), &mut |path: &[usize], node: &Node| {
                if matches!(node.tag, Tag::Input | Tag::Button) && !node.handlers.is_empty() {
                    paths.push(path.to_vec());
                }
            });
        }
        paths
    }

    /// Live node at `path`
    #[must_use]
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        self.live.root().and_then(|root| root.at(path))
    }

    /// Draw the live tree into `area`
    pub fn draw(
        &self,
        area: Rect,
        buf: &mut Buffer,
        focus: Option<&[usize]>,
        state: &mut TreeViewState,
    ) {
        if let Some(root) = self.live.root() {
            TreeView::new(root).focus(focus).render(area, buf, state);
        }
    }
}

impl Surface for TerminalSurface {
    fn mount(&mut self, root: &Node) {
        self.live.mount(root);
    }

    fn patch(&mut self, edits: &EditSet) {
        tracing::trace!(edits = edits.len(), "Patching terminal surface");
        self.live.patch(edits);
    }
}
