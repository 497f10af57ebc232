//! Key-aware tree diff

use std::collections::HashSet;

use super::{Edit, EditSet, Reconciler};
use crate::tree::{Key, Node};

/// Diff that matches children by key, then by position
///
/// Nodes whose tag or key differ are replaced wholesale. For matched nodes the
/// text, attributes and handlers are compared individually and children are
/// reconciled in three passes:
///
/// 1. remove old children whose identity is gone (back to front)
/// 2. walk the new children front to back, moving or inserting as needed
/// 3. drop whatever is left past the end (duplicate keys)
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyedReconciler;

impl KeyedReconciler {
    /// Create a reconciler
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Reconciler for KeyedReconciler {
    fn diff(&self, old: &Node, new: &Node) -> EditSet {
        let mut edits = EditSet::new();
        diff_node(old, new, &mut Vec::new(), &mut edits);
        edits
    }
}

/// Sibling identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Slot<'a> {
    Keyed(&'a Key),
    /// Ordinal among unkeyed siblings
    Positional(usize),
}

fn slots(children: &[Node]) -> Vec<Slot<'_>> {
    let mut unkeyed = 0;
    children
        .iter()
        .map(|child| match &child.key {
            Some(key) => Slot::Keyed(key),
            None => {
                unkeyed += 1;
                Slot::Positional(unkeyed - 1)
            }
        })
        .collect()
}

fn diff_node(old: &Node, new: &Node, path: &mut Vec<usize>, edits: &mut EditSet) {
    if old.tag != new.tag || old.key != new.key {
        edits.push(Edit::Replace {
            path: path.clone(),
            node: new.clone(),
        });
        return;
    }

    if old.text != new.text {
        edits.push(Edit::SetText {
            path: path.clone(),
            text: new.text.clone(),
        });
    }

    for (name, value) in &new.attrs {
        if old.attrs.get(name) != Some(value) {
            edits.push(Edit::SetAttr {
                path: path.clone(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
    for name in old.attrs.keys() {
        if !new.attrs.contains_key(name) {
            edits.push(Edit::RemoveAttr {
                path: path.clone(),
                name: name.clone(),
            });
        }
    }

    if old.handlers != new.handlers {
        edits.push(Edit::SetHandlers {
            path: path.clone(),
            handlers: new.handlers.clone(),
        });
    }

    diff_children(&old.children, &new.children, path, edits);
}

fn diff_children(old: &[Node], new: &[Node], path: &mut Vec<usize>, edits: &mut EditSet) {
    let old_slots = slots(old);
    let new_slots = slots(new);
    let wanted: HashSet<Slot<'_>> = new_slots.iter().copied().collect();

    // Simulated child list: identity plus the old node it came from.
    let mut current: Vec<(Slot<'_>, Option<usize>)> = old_slots
        .iter()
        .copied()
        .enumerate()
        .map(|(index, slot)| (slot, Some(index)))
        .collect();

    for index in (0..current.len()).rev() {
        if !wanted.contains(&current[index].0) {
            edits.push(Edit::RemoveChild {
                parent: path.clone(),
                index,
            });
            current.remove(index);
        }
    }

    for (index, (slot, child)) in new_slots.iter().zip(new).enumerate() {
        let in_place = current.get(index).is_some_and(|(s, _)| s == slot);
        if !in_place {
            let found = (index + 1..current.len()).find(|&k| current[k].0 == *slot);
            match found {
                Some(from) => {
                    edits.push(Edit::MoveChild {
                        parent: path.clone(),
                        from,
                        to: index,
                    });
                    let moved = current.remove(from);
                    current.insert(index, moved);
                }
                None => {
                    edits.push(Edit::InsertChild {
                        parent: path.clone(),
                        index,
                        node: child.clone(),
                    });
                    current.insert(index, (*slot, None));
                    continue;
                }
            }
        }

        if let Some(old_index) = current[index].1 {
            path.push(index);
            diff_node(&old[old_index], child, path, edits);
            path.pop();
        }
    }

    for index in (new.len()..current.len()).rev() {
        edits.push(Edit::RemoveChild {
            parent: path.clone(),
            index,
        });
    }
}
