#![forbid(unsafe_code)]

//! Arena-backed in-memory document.
//!
//! `MemoryDom` implements [`Dom`] without a browser. It keeps form-control
//! state (value, checked, selected, disabled) as properties next to the
//! attribute list, mirrors the browser's radio-group and single-select
//! exclusivity, and records which nodes are listened to so test drivers can
//! deliver only the events a real document would.
//!
//! # Invariants
//!
//! - Slots are never reused: a removed node's id stays dead.
//! - A node has at most one parent; moving a node detaches it first.
//! - Appending a node beneath itself is ignored.

use ahash::AHashSet;
use scraper::{ElementRef, Html, Node};

use crate::{Dom, EventKind, NodeId};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone)]
enum Content {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    content: Content,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    value: String,
    checked: bool,
    selected: bool,
    disabled: bool,
}

impl NodeData {
    fn new(content: Content) -> Self {
        Self {
            content,
            parent: None,
            children: Vec::new(),
            value: String::new(),
            checked: false,
            selected: false,
            disabled: false,
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.content {
            Content::Element { tag, .. } => Some(tag),
            Content::Text(_) => None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match &self.content {
            Content::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            Content::Text(_) => None,
        }
    }
}

/// In-memory [`Dom`].
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Option<NodeData>>,
    body: NodeId,
    listeners: AHashSet<(NodeId, EventKind)>,
    focused: Option<NodeId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create a document with an empty `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeData::new(Content::Element {
            tag: "body".into(),
            attrs: Vec::new(),
        });
        Self {
            nodes: vec![Some(body)],
            body: NodeId::from_raw(0),
            listeners: AHashSet::new(),
            focused: None,
        }
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.raw() as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes
            .get_mut(id.raw() as usize)
            .and_then(Option::as_mut)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let raw = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(Some(data));
        NodeId::from_raw(raw)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn can_attach(&self, parent: NodeId, child: NodeId) -> bool {
        let known =
            self.node(parent).is_some_and(|p| p.tag().is_some()) && self.node(child).is_some();
        if !known {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            #[cfg(feature = "tracing")]
            tracing::debug!(%parent, %child, "refusing to attach node beneath itself");
            return false;
        }
        true
    }

    fn top_ancestor(&self, mut node: NodeId) -> NodeId {
        while let Some(parent) = self.node(node).and_then(|n| n.parent) {
            node = parent;
        }
        node
    }

    /// Descendants of `scope` in document order, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(scope)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = self.node(id) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    fn import_element(&mut self, element: ElementRef<'_>) -> NodeId {
        let id = self.create_element(element.value().name());
        for (name, value) in element.value().attrs() {
            self.set_attribute(id, name, value);
        }
        for child in self.import_children(element) {
            self.append_child(id, child);
        }
        id
    }

    fn import_children(&mut self, parent: ElementRef<'_>) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in parent.children() {
            match child.value() {
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        out.push(self.import_element(element));
                    }
                }
                Node::Text(text) => out.push(self.create_text(text)),
                _ => {}
            }
        }
        out
    }

    // --- Inspection helpers ---

    /// The node that last received focus, if it is still alive.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.node(*id).is_some())
    }

    /// Whether `kind` events on `node` are being listened to.
    #[must_use]
    pub fn is_listening(&self, node: NodeId, kind: EventKind) -> bool {
        self.listeners.contains(&(node, kind))
    }

    /// Total number of active listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live nodes, including `<body>`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Element tag name; `None` for text or dead nodes.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(NodeData::tag)
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Element children only.
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|c| self.tag(*c).is_some())
            .collect()
    }

    /// Descendants of `scope` with the given tag, in document order.
    #[must_use]
    pub fn query_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.tag(*id) == Some(tag))
            .collect()
    }

    /// First attached element with the given `id` attribute.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.node(*node).and_then(|n| n.attr("id")) == Some(id))
    }

    #[must_use]
    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.disabled)
    }

    /// Serialize a subtree. Live properties (checked, selected, disabled)
    /// are rendered as boolean attributes after the stored attributes.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        use std::fmt::Write as _;

        let Some(node) = self.node(id) else {
            return;
        };
        match &node.content {
            Content::Text(text) => {
                let _ = write!(out, "{}", v_htmlescape::escape(text));
            }
            Content::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    let _ = write!(out, " {name}=\"{}\"", v_htmlescape::escape(value));
                }
                for (flag, name) in [
                    (node.checked, "checked"),
                    (node.selected, "selected"),
                    (node.disabled, "disabled"),
                ] {
                    if flag && node.attr(name).is_none() {
                        out.push(' ');
                        out.push_str(name);
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &node.children {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

impl Dom for MemoryDom {
    fn body(&self) -> NodeId {
        self.body
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::new(Content::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::new(Content::Text(text.to_owned())))
    }

    fn create_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        self.import_children(fragment.root_element())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(NodeData {
            content: Content::Element { attrs, .. },
            ..
        }) = self.node_mut(node)
        else {
            return;
        };
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => value.clone_into(&mut slot.1),
            None => attrs.push((name.to_owned(), value.to_owned())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(NodeData {
            content: Content::Element { attrs, .. },
            ..
        }) = self.node_mut(node)
        {
            attrs.retain(|(n, _)| n != name);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)
            .and_then(|n| n.attr(name))
            .map(str::to_owned)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if class.is_empty() || self.has_class(node, class) {
            return;
        }
        let joined = match self.attribute(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_owned(),
        };
        self.set_attribute(node, "class", &joined);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(existing) = self.attribute(node, "class") else {
            return;
        };
        let kept: Vec<&str> = existing
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        self.set_attribute(node, "class", &kept.join(" "));
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .and_then(|n| n.attr("class"))
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_attach(parent, child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_attach(parent, child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.insert(0, child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        if reference == node || !self.can_attach(parent, node) {
            return;
        }
        self.detach(node);
        if let Some(p) = self.node_mut(parent) {
            let idx = p
                .children
                .iter()
                .position(|c| *c == reference)
                .map_or(p.children.len(), |i| i + 1);
            p.children.insert(idx, node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = Some(parent);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if self.tag(node).is_none() {
            if let Some(NodeData {
                content: Content::Text(existing),
                ..
            }) = self.node_mut(node)
            {
                text.clone_into(existing);
            }
            return;
        }
        for child in self.children(node) {
            self.remove(child);
        }
        let text_node = self.create_text(text);
        self.append_child(node, text_node);
    }

    fn text(&self, node: NodeId) -> String {
        let Some(data) = self.node(node) else {
            return String::new();
        };
        if let Content::Text(text) = &data.content {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|id| match &self.node(id)?.content {
                Content::Text(text) => Some(text.as_str()),
                Content::Element { .. } => None,
            })
            .collect()
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.body || self.node(node).is_none() {
            return;
        }
        self.detach(node);
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in &doomed {
            if let Some(slot) = self.nodes.get_mut(id.raw() as usize) {
                *slot = None;
            }
        }
        self.listeners.retain(|(id, _)| !doomed.contains(id));
        if self.focused.is_some_and(|f| doomed.contains(&f)) {
            self.focused = None;
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some() && self.is_ancestor_or_self(self.body, node)
    }

    fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    fn value(&self, node: NodeId) -> String {
        let Some(data) = self.node(node) else {
            return String::new();
        };
        match data.tag() {
            Some("select") => self
                .descendants(node)
                .into_iter()
                .find(|id| self.tag(*id) == Some("option") && self.is_selected(*id))
                .map(|id| self.value(id))
                .unwrap_or_default(),
            Some("option") => data
                .attr("value")
                .map_or_else(|| self.text(node), str::to_owned),
            _ => data.value.clone(),
        }
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        match self.tag(node) {
            Some("select") => {
                let target = self
                    .descendants(node)
                    .into_iter()
                    .find(|id| self.tag(*id) == Some("option") && self.value(*id) == value);
                if let Some(option) = target {
                    self.set_selected(option, true);
                }
            }
            Some(_) => {
                if let Some(n) = self.node_mut(node) {
                    value.clone_into(&mut n.value);
                }
            }
            None => {}
        }
    }

    fn is_checked(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.checked)
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        let Some(data) = self.node(node) else {
            return;
        };
        let group = (checked && data.attr("type") == Some("radio"))
            .then(|| data.attr("name").map(str::to_owned))
            .flatten();
        if let Some(name) = group {
            let root = self.top_ancestor(node);
            for other in self.descendants(root) {
                let same_group = self.node(other).is_some_and(|n| {
                    n.attr("type") == Some("radio") && n.attr("name") == Some(name.as_str())
                });
                if same_group
                    && other != node
                    && let Some(n) = self.node_mut(other)
                {
                    n.checked = false;
                }
            }
        }
        if let Some(n) = self.node_mut(node) {
            n.checked = checked;
        }
    }

    fn is_selected(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.selected)
    }

    fn set_selected(&mut self, node: NodeId, selected: bool) {
        if selected
            && let Some(parent) = self.parent(node)
            && self.tag(parent) == Some("select")
            && self.attribute(parent, "multiple").is_none()
        {
            for sibling in self.children(parent) {
                if let Some(n) = self.node_mut(sibling) {
                    n.selected = false;
                }
            }
        }
        if let Some(n) = self.node_mut(node) {
            n.selected = selected;
        }
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(n) = self.node_mut(node) {
            n.disabled = disabled;
        }
    }

    fn focus(&mut self, node: NodeId) {
        if self.contains(node) {
            self.focused = Some(node);
        }
    }

    fn listen(&mut self, node: NodeId, kind: EventKind) {
        if self.node(node).is_some() {
            self.listeners.insert((node, kind));
        }
    }

    fn unlisten(&mut self, node: NodeId, kind: EventKind) {
        self.listeners.remove(&(node, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(dom: &mut MemoryDom, tag: &str, parent: NodeId) -> NodeId {
        let id = dom.create_element(tag);
        dom.append_child(parent, id);
        id
    }

    #[test]
    fn builds_and_serializes_tree() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let div = element(&mut dom, "div", body);
        dom.add_classes(div, "modal  fade");
        dom.set_attribute(div, "tabindex", "-1");
        let p = element(&mut dom, "p", div);
        dom.set_text(p, "a < b");
        assert_eq!(
            dom.to_html(div),
            "<div class=\"modal fade\" tabindex=\"-1\"><p>a &lt; b</p></div>"
        );
        assert_eq!(dom.text(div), "a < b");
    }

    #[test]
    fn append_markup_decodes_entities_and_keeps_tags() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let title = element(&mut dom, "h5", body);
        dom.append_markup(title, "Tom &amp; Jerry");
        assert_eq!(dom.text(title), "Tom & Jerry");
        assert_eq!(dom.to_html(title), "<h5>Tom &amp; Jerry</h5>");

        let button = element(&mut dom, "button", body);
        dom.append_markup(button, "<b>Go</b>");
        let children = dom.element_children(button);
        assert_eq!(children.len(), 1);
        assert_eq!(dom.tag(children[0]), Some("b"));
        assert_eq!(dom.text(button), "Go");
    }

    #[test]
    fn class_tokens() {
        let mut dom = MemoryDom::new();
        let n = dom.create_element("span");
        dom.add_class(n, "a");
        dom.add_class(n, "b");
        dom.add_class(n, "a");
        assert_eq!(dom.attribute(n, "class").as_deref(), Some("a b"));
        dom.remove_class(n, "a");
        assert!(!dom.has_class(n, "a"));
        assert!(dom.has_class(n, "b"));
    }

    #[test]
    fn prepend_and_insert_after_order_children() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let footer = element(&mut dom, "div", body);
        let ok = element(&mut dom, "button", footer);
        let cancel = dom.create_element("button");
        dom.prepend_child(footer, cancel);
        let badge = dom.create_element("span");
        dom.insert_after(cancel, badge);
        assert_eq!(dom.children(footer), vec![cancel, badge, ok]);
    }

    #[test]
    fn refuses_cycles() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let outer = element(&mut dom, "div", body);
        let inner = element(&mut dom, "div", outer);
        dom.append_child(inner, outer);
        assert_eq!(dom.parent(outer), Some(body));
        assert_eq!(dom.parent(inner), Some(outer));
    }

    #[test]
    fn remove_drops_subtree_listeners_and_focus() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let root = element(&mut dom, "div", body);
        let button = element(&mut dom, "button", root);
        dom.listen(button, EventKind::Click);
        dom.focus(button);
        assert_eq!(dom.focused(), Some(button));
        dom.remove(root);
        assert!(!dom.contains(root));
        assert!(!dom.contains(button));
        assert_eq!(dom.listener_count(), 0);
        assert_eq!(dom.focused(), None);
        assert_eq!(dom.node_count(), 1);
        // Second removal is a no-op.
        dom.remove(root);
        assert_eq!(dom.node_count(), 1);
    }

    #[test]
    fn fragment_import_keeps_structure() {
        let mut dom = MemoryDom::new();
        let nodes = dom.create_fragment("Hello <b class=\"x\">world</b>!");
        assert_eq!(nodes.len(), 3);
        assert_eq!(dom.tag(nodes[1]), Some("b"));
        assert!(dom.has_class(nodes[1], "x"));
        assert_eq!(dom.text(nodes[1]), "world");
        assert!(!dom.contains(nodes[1]));
    }

    #[test]
    fn radio_group_is_exclusive() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let form = element(&mut dom, "div", body);
        let radios: Vec<_> = (0..3)
            .map(|_| {
                let r = element(&mut dom, "input", form);
                dom.set_attribute(r, "type", "radio");
                dom.set_attribute(r, "name", "g");
                r
            })
            .collect();
        let outsider = element(&mut dom, "input", form);
        dom.set_attribute(outsider, "type", "radio");
        dom.set_attribute(outsider, "name", "other");
        dom.set_checked(outsider, true);

        dom.set_checked(radios[0], true);
        dom.set_checked(radios[2], true);
        assert!(!dom.is_checked(radios[0]));
        assert!(dom.is_checked(radios[2]));
        assert!(dom.is_checked(outsider));
    }

    #[test]
    fn select_value_follows_selection() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let select = element(&mut dom, "select", body);
        let x = element(&mut dom, "option", select);
        dom.set_attribute(x, "value", "x");
        let y = element(&mut dom, "option", select);
        dom.set_attribute(y, "value", "y");
        dom.set_selected(x, true);
        dom.set_value(select, "y");
        assert!(!dom.is_selected(x));
        assert_eq!(dom.value(select), "y");
    }

    #[test]
    fn control_properties_serialize_as_flags() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let option = element(&mut dom, "option", body);
        dom.set_disabled(option, true);
        dom.set_selected(option, true);
        dom.set_text(option, "Pick");
        assert_eq!(
            dom.to_html(option),
            "<option selected disabled>Pick</option>"
        );
        assert!(dom.is_disabled(option));
    }

    #[test]
    fn focus_requires_attachment() {
        let mut dom = MemoryDom::new();
        let detached = dom.create_element("input");
        dom.focus(detached);
        assert_eq!(dom.focused(), None);
        let body = dom.body();
        dom.append_child(body, detached);
        dom.focus(detached);
        assert_eq!(dom.focused(), Some(detached));
    }
}
