//! Declarative UI Tree
//!
//! Immutable description of what the surface should show for one state
//! snapshot. Trees are plain data: event handlers are [`Handler`] values naming
//! an [`Action`], not closures, so two renders of the same state compare equal.
//!
//! Nodes are addressed by a child-index path from the root (`&[]` is the root,
//! `&[1, 0]` is the first child of the root's second child).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::messages::Message;
use crate::model::EntryId;

/// Element kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Groups children (laid out as a column unless `layout = row`)
    Container,
    /// A line of text
    Text,
    /// Single-line text input
    Input,
    /// Activatable control
    Button,
}

/// Reconciliation key for list children
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(pub String);

impl From<EntryId> for Key {
    fn from(id: EntryId) -> Self {
        Self(format!("entry-{id}"))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which user interaction a handler listens for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// The value of an input changed
    Input,
    /// A control was activated
    Click,
}

/// What a handler does when it fires
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Replace the location text with the input's new value
    SetLocation,
    /// Start a lookup for the current location text
    SubmitLookup,
    /// Remove a history entry
    DeleteEntry {
        /// Entry to remove
        id: EntryId,
    },
}

impl Action {
    /// Whether firing this action must also start an external lookup
    #[must_use]
    pub fn starts_lookup(&self) -> bool {
        matches!(self, Self::SubmitLookup)
    }
}

/// An interaction reported by the surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// An input now holds this value
    Input(String),
    /// A control was activated
    Click,
}

impl UiEvent {
    /// The trigger this event matches
    #[must_use]
    pub fn trigger(&self) -> Trigger {
        match self {
            Self::Input(_) => Trigger::Input,
            Self::Click => Trigger::Click,
        }
    }
}

/// An event handler attached to a node
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handler {
    /// Interaction this handler listens for
    pub trigger: Trigger,
    /// Action taken when it fires
    pub action: Action,
}

impl Handler {
    /// Handler fired on input changes
    #[must_use]
    pub fn on_input(action: Action) -> Self {
        Self {
            trigger: Trigger::Input,
            action,
        }
    }

    /// Handler fired on activation
    #[must_use]
    pub fn on_click(action: Action) -> Self {
        Self {
            trigger: Trigger::Click,
            action,
        }
    }

    /// Build the message for an event, if this handler listens for it
    #[must_use]
    pub fn message_for(&self, event: &UiEvent) -> Option<Message> {
        match (&self.action, event) {
            (Action::SetLocation, UiEvent::Input(text)) => Some(Message::TextInputChanged {
                text: text.clone(),
            }),
            (Action::SubmitLookup, UiEvent::Click) => Some(Message::SubmitLookupRequested),
            (Action::DeleteEntry { id }, UiEvent::Click) => Some(Message::EntryDeleted { id: *id }),
            _ => None,
        }
        .filter(|_| self.trigger == event.trigger())
    }
}

/// One node of the declarative tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Element kind
    pub tag: Tag,
    /// Identity among siblings
    pub key: Option<Key>,
    /// Attributes (class, placeholder, value, layout, ...)
    pub attrs: BTreeMap<String, String>,
    /// Text content
    pub text: Option<String>,
    /// Event handlers
    pub handlers: Vec<Handler>,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Empty node of the given kind
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            key: None,
            attrs: BTreeMap::new(),
            text: None,
            handlers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the key
    #[must_use]
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the `class` attribute
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Attach a handler
    #[must_use]
    pub fn on(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Read an attribute
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Node at a child-index path
    #[must_use]
    pub fn at(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Mutable node at a child-index path
    pub fn at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Path of the first node (document order) matching `pred`
    #[must_use]
    pub fn find_path(&self, pred: impl Fn(&Node) -> bool) -> Option<Vec<usize>> {
        let mut found = None;
        self.walk(&mut Vec::new(), &mut |path: &[usize], node: &Node| {
            if found.is_none() && pred(node) {
                found = Some(path.to_vec());
            }
        });
        found
    }

    /// Visit every node in document order together with its path
    pub fn walk(&self, path: &mut Vec<usize>, visit: &mut impl FnMut(&[usize], &Node)) {
        visit(path, self);
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            child.walk(path, visit);
            path.pop();
        }
    }

    /// Handler for a trigger, if any
    #[must_use]
    pub fn handler(&self, trigger: Trigger) -> Option<&Handler> {
        self.handlers.iter().find(|h| h.trigger == trigger)
    }

    /// Whether any handler on this node performs `action`
    #[must_use]
    pub fn handles(&self, action: &Action) -> bool {
        self.handlers.iter().any(|h| &h.action == action)
    }

    /// Total number of nodes in this subtree
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }
}

// ============================================
// Constructor helpers
// ============================================

/// Container node
#[must_use]
pub fn container(children: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Tag::Container).children(children)
}

/// Row container (children laid out horizontally)
#[must_use]
pub fn row(children: impl IntoIterator<Item = Node>) -> Node {
    container(children).attr("layout", "row")
}

/// Text node
#[must_use]
pub fn text(content: impl Into<String>) -> Node {
    let mut node = Node::new(Tag::Text);
    node.text = Some(content.into());
    node
}

/// Input node bound to a value
#[must_use]
pub fn input(value: impl Into<String>) -> Node {
    Node::new(Tag::Input).attr("value", value)
}

/// Button node with a label
#[must_use]
pub fn button(label: impl Into<String>) -> Node {
    let mut node = Node::new(Tag::Button);
    node.text = Some(label.into());
    node
}
