#![forbid(unsafe_code)]

//! Document and modal-widget seams for popup dialogs.
//!
//! Dialog code never talks to a browser directly. It builds and inspects
//! trees through the [`Dom`] trait and shows/hides them through the
//! [`ModalWidget`] trait. Two implementations ship here:
//!
//! - [`MemoryDom`]: an arena-backed document used by tests and headless
//!   hosts. Events are delivered by the caller.
//! - [`ScriptedModal`]: a widget that records open/close requests and emits
//!   lifecycle notifications on demand or immediately.
//!
//! The `wasm32` realisations live in `popup-web`.
//!
//! # Invariants
//!
//! - A [`NodeId`] is never reused by the same document, so a stale id held
//!   by a torn-down dialog can only ever miss.
//! - Operations on unknown or removed nodes are no-ops (queries return
//!   empty/false/`None`).

pub mod memory;
pub mod modal;

pub use memory::MemoryDom;
pub use modal::{
    ModalCall, ModalConfig, ModalNotification, ModalPhase, ModalWidget, ScriptedModal, Transitions,
};

use std::fmt;

/// Handle to a node owned by a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw index. Only documents should mint ids.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM events dialogs subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyUp,
    Input,
    Change,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyUp => "keyup",
            Self::Input => "input",
            Self::Change => "change",
        }
    }
}

/// A mutable document tree.
///
/// Element and text creation returns detached nodes; they become part of the
/// document once appended under [`Dom::body`] (directly or transitively).
pub trait Dom {
    /// The document body.
    fn body(&self) -> NodeId;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> NodeId;

    /// Parse `markup` and return its top-level nodes, detached, in order.
    fn create_fragment(&mut self, markup: &str) -> Vec<NodeId>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Add a single class token.
    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Add every whitespace-separated token of `classes`.
    fn add_classes(&mut self, node: NodeId, classes: &str) {
        for class in classes.split_whitespace() {
            self.add_class(node, class);
        }
    }

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Move `child` to the front of `parent`'s children.
    fn prepend_child(&mut self, parent: NodeId, child: NodeId);

    /// Move `node` directly after `reference` under the same parent.
    fn insert_after(&mut self, reference: NodeId, node: NodeId);

    /// Replace all children with a single text node.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Parse `markup` and append its nodes to `parent`, as assigning
    /// `innerHTML` on an empty element would. Entities decode and tags
    /// become elements.
    fn append_markup(&mut self, parent: NodeId, markup: &str) {
        for node in self.create_fragment(markup) {
            self.append_child(parent, node);
        }
    }

    /// Concatenated text content of the subtree.
    fn text(&self, node: NodeId) -> String;

    /// Detach and drop a subtree. Listeners on removed nodes are dropped too.
    fn remove(&mut self, node: NodeId);

    /// Whether the node is attached to the document.
    fn contains(&self, node: NodeId) -> bool;

    /// Descendants of `scope` (excluding `scope`) carrying `class`, in
    /// document order.
    fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId>;

    /// Current value of a form control.
    fn value(&self, node: NodeId) -> String;

    fn set_value(&mut self, node: NodeId, value: &str);

    fn is_checked(&self, node: NodeId) -> bool;

    /// Check or uncheck a toggle. Checking a radio unchecks the other radios
    /// of its group.
    fn set_checked(&mut self, node: NodeId, checked: bool);

    fn is_selected(&self, node: NodeId) -> bool;

    /// Select or deselect an `<option>`. Selecting one in a single-select
    /// list deselects its siblings.
    fn set_selected(&mut self, node: NodeId, selected: bool);

    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    fn focus(&mut self, node: NodeId);

    /// Start delivering `kind` events targeting `node`.
    fn listen(&mut self, node: NodeId, kind: EventKind);

    /// Stop delivering `kind` events targeting `node`.
    fn unlisten(&mut self, node: NodeId, kind: EventKind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        assert_eq!(EventKind::Click.dom_name(), "click");
        assert_eq!(EventKind::KeyUp.dom_name(), "keyup");
        assert_eq!(EventKind::Change.dom_name(), "change");
    }

    #[test]
    fn node_id_raw_round_trip() {
        let id = NodeId::from_raw(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.to_string(), "#7");
    }
}
