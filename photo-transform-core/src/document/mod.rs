//! In-memory control tree standing in for the page DOM.
//!
//! Nodes live in an arena; removed subtrees free their slots for reuse and drop
//! their ids from the registry, so an id always resolves to a live node.

mod html;
mod node;

use std::collections::HashMap;

pub use node::{Action, InputType, Node, NodeId, Tag};

use crate::error::{CoreError, CoreResult};

/// Visibility class.
pub const HIDDEN: &str = "hidden";

#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    ids: HashMap<String, NodeId>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Node::new(Tag::Div))],
            free: Vec::new(),
            ids: HashMap::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Appends `node` as the last child of `parent` and registers its id.
    pub fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        node.children.clear();
        let id = node.id.clone();

        let nid = if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(node);
            NodeId(slot)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        };

        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(nid);
        }
        if let Some(id) = id
            && let Some(previous) = self.ids.insert(id.clone(), nid)
        {
            log::warn!("Duplicate element id '{id}' (replacing node {})", previous.0);
        }
        nid
    }

    pub fn get(&self, nid: NodeId) -> Option<&Node> {
        self.slots.get(nid.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, nid: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(nid.0).and_then(Option::as_mut)
    }

    /// Looks up a node by element id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Like [`Self::find`] but reports a missing element as an error.
    pub fn require(&self, id: &str) -> CoreResult<NodeId> {
        self.find(id)
            .ok_or_else(|| CoreError::ElementNotFound(id.to_string()))
    }

    pub fn by_id(&self, id: &str) -> Option<&Node> {
        self.find(id).and_then(|nid| self.get(nid))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        let nid = self.find(id)?;
        self.get_mut(nid)
    }

    pub fn children(&self, nid: NodeId) -> &[NodeId] {
        self.get(nid).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, nid: NodeId) -> Option<NodeId> {
        self.get(nid).and_then(|n| n.parent)
    }

    /// Removes every child subtree of `nid`.
    pub fn clear_children(&mut self, nid: NodeId) {
        let children = match self.get_mut(nid) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        let mut stack = children;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.slots.get_mut(current.0).and_then(Option::take) {
                if let Some(id) = &node.id
                    && self.ids.get(id) == Some(&current)
                {
                    self.ids.remove(id);
                }
                stack.extend(node.children);
                self.free.push(current.0);
            }
        }
    }

    fn sibling(&self, nid: NodeId, offset: isize) -> Option<NodeId> {
        let siblings = self.children(self.parent(nid)?);
        let pos = siblings.iter().position(|&c| c == nid)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    pub fn previous_sibling(&self, nid: NodeId) -> Option<NodeId> {
        self.sibling(nid, -1)
    }

    pub fn next_sibling(&self, nid: NodeId) -> Option<NodeId> {
        self.sibling(nid, 1)
    }

    /// Nearest ancestor (excluding `nid`) with the given tag.
    pub fn closest(&self, nid: NodeId, tag: Tag) -> Option<NodeId> {
        let mut current = self.parent(nid);
        while let Some(candidate) = current {
            if self.get(candidate).is_some_and(|n| n.tag == tag) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// All descendants of `nid` in document order.
    pub fn descendants(&self, nid: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(nid).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    pub fn is_hidden(&self, nid: NodeId) -> bool {
        self.get(nid).is_some_and(Node::is_hidden)
    }

    pub fn set_hidden(&mut self, nid: NodeId, hidden: bool) {
        if let Some(node) = self.get_mut(nid) {
            node.set_class(HIDDEN, hidden);
        }
    }

    /// Sets the hidden class on the element with `id`; returns whether it exists.
    pub fn set_hidden_by_id(&mut self, id: &str, hidden: bool) -> bool {
        match self.find(id) {
            Some(nid) => {
                self.set_hidden(nid, hidden);
                true
            }
            None => false,
        }
    }

    /// Replaces the text of the element with `id`; returns whether it exists.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.by_id_mut(id) {
            Some(node) => {
                node.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Live nodes carrying `class`, in document order.
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&nid| self.get(nid).is_some_and(|n| n.has_class(class)))
            .collect()
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}
