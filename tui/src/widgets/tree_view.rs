//! TreeView Widget
//!
//! A borderless, scrollable rendering of a live widget tree.
//!
//! Containers stack their children vertically, `layout = row` containers flow
//! their children left to right (wrapping when the width runs out), inputs show
//! as `[ value_ ]` and buttons as `< label >`. The focused control is
//! highlighted and kept in view.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use skycast_core::{Node, Tag};

use crate::theme::{class_style, focus_style, hint_style};

/// Minimum inner width of an input box
const INPUT_WIDTH: usize = 20;

/// Gap between items on a row
const ROW_GAP: &str = "  ";

/// State for a scrollable tree view
#[derive(Debug, Default)]
pub struct TreeViewState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
}

impl TreeViewState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }
}

/// A borderless, scrollable view of a tree
pub struct TreeView<'a> {
    root: &'a Node,
    focus: Option<&'a [usize]>,
}

impl<'a> TreeView<'a> {
    /// View of `root` with nothing focused
    #[must_use]
    pub fn new(root: &'a Node) -> Self {
        Self { root, focus: None }
    }

    /// Highlight the control at `path`
    #[must_use]
    pub fn focus(mut self, path: Option<&'a [usize]>) -> Self {
        self.focus = path;
        self
    }

    /// Lay the tree out for `width` columns
    ///
    /// Returns the lines and the index of the line holding the focused control.
    #[must_use]
    pub fn layout(&self, width: u16) -> (Vec<Line<'static>>, Option<usize>) {
        let mut layout = Layout {
            width: usize::from(width).max(1),
            focus: self.focus,
            lines: Vec::new(),
            focus_line: None,
        };
        layout.block(self.root, &mut Vec::new(), Style::default());
        (layout.lines, layout.focus_line)
    }
}

impl StatefulWidget for TreeView<'_> {
    type State = TreeViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let (lines, focus_line) = self.layout(area.width);
        let height = usize::from(area.height);

        state.total_lines = lines.len();

        // Keep the focused control on screen
        if let Some(line) = focus_line {
            if line < state.scroll_offset {
                state.scroll_offset = line;
            } else if height > 0 && line >= state.scroll_offset + height {
                state.scroll_offset = line + 1 - height;
            }
        }

        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (y, line) in (area.y..area.bottom()).zip(lines.iter().skip(state.scroll_offset)) {
            buf.set_line(area.x, y, line, area.width);
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

struct Layout<'a> {
    width: usize,
    focus: Option<&'a [usize]>,
    lines: Vec<Line<'static>>,
    focus_line: Option<usize>,
}

impl Layout<'_> {
    fn block(&mut self, node: &Node, path: &mut Vec<usize>, inherited: Style) {
        let style = inherited.patch(class_style(node.get_attr("class")));
        match node.tag {
            Tag::Container if is_row(node) => self.row(node, path, style),
            Tag::Container => {
                let is_root = path.is_empty();
                for (index, child) in node.children.iter().enumerate() {
                    let before = self.lines.len();
                    path.push(index);
                    self.block(child, path, style);
                    path.pop();
                    // blank line between top-level regions
                    if is_root && self.lines.len() > before {
                        self.lines.push(Line::default());
                    }
                }
            }
            Tag::Text => {
                let content = node.text.as_deref().unwrap_or_default();
                for line in wrap(content, self.width) {
                    self.lines.push(Line::styled(line.into_owned(), style));
                }
            }
            Tag::Input | Tag::Button => {
                let span = self.control(node, path, style);
                self.lines.push(Line::from(span));
            }
        }
    }

    /// Flow children left to right, breaking onto a new line when full
    fn row(&mut self, node: &Node, path: &mut Vec<usize>, style: Style) {
        let mut current: Vec<Span<'static>> = Vec::new();
        let mut used = 0;

        for (index, child) in node.children.iter().enumerate() {
            path.push(index);
            let child_style = style.patch(class_style(child.get_attr("class")));
            let span = match child.tag {
                Tag::Input | Tag::Button => self.control(child, path, child_style),
                Tag::Text | Tag::Container => Span::styled(inline_text(child), child_style),
            };
            path.pop();

            let span_width = span.content.width();
            let gap = if current.is_empty() { 0 } else { ROW_GAP.len() };
            if !current.is_empty() && used + gap + span_width > self.width {
                self.lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            } else if gap > 0 {
                current.push(Span::raw(ROW_GAP));
                used += gap;
            }

            // A focused control lands on the line currently being filled.
            if self.focus == Some(path_with(path, index).as_slice()) {
                self.focus_line = Some(self.lines.len());
            }
            used += span_width;
            current.push(span);
        }

        if !current.is_empty() {
            self.lines.push(Line::from(current));
        }
    }

    fn control(&mut self, node: &Node, path: &[usize], style: Style) -> Span<'static> {
        let focused = self.focus == Some(path);
        if focused {
            self.focus_line = Some(self.lines.len());
        }

        let content = match node.tag {
            Tag::Input => input_box(node, focused),
            _ => format!("< {} >", node.text.as_deref().unwrap_or_default()),
        };

        if focused {
            Span::styled(content, focus_style(style))
        } else if node.tag == Tag::Input && node.get_attr("value").map_or(true, str::is_empty) {
            Span::styled(content, hint_style())
        } else {
            Span::styled(content, style)
        }
    }
}

fn is_row(node: &Node) -> bool {
    node.get_attr("layout") == Some("row")
}

fn path_with(parent: &[usize], index: usize) -> Vec<usize> {
    let mut path = parent.to_vec();
    path.push(index);
    path
}

/// Flattened text of a subtree, for nesting inside a row
fn inline_text(node: &Node) -> String {
    let mut parts = Vec::new();
    node.walk(&mut Vec::new(), &mut |_: &[usize], n: &Node| {
        if let Some(text) = n.text.as_deref() {
            parts.push(text.to_string());
        }
    });
    parts.join(" ")
}

/// `[ value_ ]`, padded to [`INPUT_WIDTH`], showing the placeholder when empty
fn input_box(node: &Node, focused: bool) -> String {
    let value = node.get_attr("value").unwrap_or_default();
    let shown = if value.is_empty() && !focused {
        node.get_attr("placeholder").unwrap_or_default()
    } else {
        value
    };
    let cursor = if focused { "_" } else { "" };
    let used = shown.width() + cursor.len();
    let padding = " ".repeat(INPUT_WIDTH.saturating_sub(used));
    format!("[ {shown}{cursor}{padding} ]")
}
