#![forbid(unsafe_code)]

//! [`Dom`] over the live browser document.
//!
//! Nodes are tracked in a [`NodeTable`] shared with the modal widget, so
//! both sides resolve the same [`NodeId`]s. Ids are never reused; removing a
//! subtree forgets every id inside it, so the table only holds live nodes.
//!
//! # Failure Modes
//!
//! - A failing DOM call is logged (with the `tracing` feature) and the
//!   operation becomes a no-op. A failed `create_element` yields an id that
//!   resolves to nothing.
//! - Listener closures are dropped on a later task, since `unlisten` can run
//!   from inside the very handler being removed.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;
use js_sys::{Object, WeakMap};
use popup_dom::{Dom, EventKind, NodeId};
use popup_widgets::DialogEvent;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTemplateElement, HtmlTextAreaElement, Node,
};

use crate::error::WebError;

/// Receiver of every event the backend observes.
pub type EventSink = Rc<dyn Fn(DialogEvent)>;

/// Node table shared between [`WebDom`] and the modal widget.
pub type SharedNodes = Rc<RefCell<NodeTable>>;

/// Id → node mapping for one document.
///
/// Only live nodes are kept. Identity lookups go through a `WeakMap` keyed
/// by the node object, so neither direction scans the table.
#[derive(Debug)]
pub struct NodeTable {
    document: Document,
    nodes: AHashMap<NodeId, Node>,
    ids: WeakMap,
    next: u32,
}

fn identity(node: &Node) -> &Object {
    node.unchecked_ref()
}

impl NodeTable {
    /// Table for the current window's document, with the body as the first
    /// id.
    ///
    /// # Errors
    ///
    /// When there is no window, document or body.
    pub fn from_window() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        Self::new(document)
    }

    /// Table for `document`.
    ///
    /// # Errors
    ///
    /// [`WebError::NoBody`] when the document has no body.
    pub fn new(document: Document) -> Result<Self, WebError> {
        let body: Node = document.body().ok_or(WebError::NoBody)?.into();
        let mut table = Self {
            document,
            nodes: AHashMap::new(),
            ids: WeakMap::new(),
            next: 0,
        };
        table.insert(Some(body));
        Ok(table)
    }

    #[must_use]
    pub fn into_shared(self) -> SharedNodes {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of tracked nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, node: Option<Node>) -> NodeId {
        let id = NodeId::from_raw(self.next);
        self.next = self.next.saturating_add(1);
        if let Some(node) = node {
            self.ids.set(identity(&node), &JsValue::from(id.raw()));
            self.nodes.insert(id, node);
        }
        id
    }

    /// The node behind `id`, if it is still tracked.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// The element behind `id`.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.node(id).and_then(|n| n.dyn_ref::<Element>()).cloned()
    }

    /// Id of `node`, registering it if it is not tracked yet.
    pub fn lookup_or_insert(&mut self, node: &Node) -> NodeId {
        let known = self
            .ids
            .get(identity(node))
            .as_f64()
            .map(|raw| NodeId::from_raw(raw as u32))
            .filter(|id| self.nodes.contains_key(id));
        match known {
            Some(id) => id,
            None => self.insert(Some(node.clone())),
        }
    }

    /// Forget `root` and every tracked node inside it.
    fn forget_within(&mut self, root: &Node) {
        let ids = &self.ids;
        self.nodes.retain(|_, node| {
            let inside = root.contains(Some(node));
            if inside {
                ids.delete(identity(node));
            }
            !inside
        });
    }
}

/// Log a failed DOM call and discard the error.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn checked<T>(op: &'static str, result: Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(op, error = ?err, "browser call failed");
            None
        }
    }
}

/// Drop `value` on a later task.
pub(crate) fn defer_drop<T: 'static>(value: T) {
    wasm_bindgen_futures::spawn_local(async move {
        drop(value);
    });
}

struct Listener {
    target: Node,
    callback: Closure<dyn FnMut(Event)>,
}

/// The browser document.
pub struct WebDom {
    nodes: SharedNodes,
    sink: EventSink,
    listeners: AHashMap<(NodeId, EventKind), Listener>,
    focused: Option<NodeId>,
}

impl std::fmt::Debug for WebDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDom")
            .field("listeners", &self.listeners.len())
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl WebDom {
    /// A document over `nodes` that reports bound events to `sink`.
    pub fn new(nodes: SharedNodes, sink: EventSink) -> Self {
        Self {
            nodes,
            sink,
            listeners: AHashMap::new(),
            focused: None,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &SharedNodes {
        &self.nodes
    }

    /// The node last focused through [`Dom::focus`].
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes.borrow().node(id).cloned()
    }

    fn element(&self, id: NodeId) -> Option<Element> {
        self.nodes.borrow().element(id)
    }

    fn drop_listener(&mut self, key: (NodeId, EventKind)) {
        if let Some(listener) = self.listeners.remove(&key) {
            checked(
                "removeEventListener",
                listener.target.remove_event_listener_with_callback(
                    key.1.dom_name(),
                    listener.callback.as_ref().unchecked_ref(),
                ),
            );
            defer_drop(listener.callback);
        }
    }
}

impl Dom for WebDom {
    fn body(&self) -> NodeId {
        NodeId::from_raw(0)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let created = checked("createElement", nodes.document().create_element(tag));
        nodes.insert(created.map(Node::from))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let created: Node = nodes.document().create_text_node(text).into();
        nodes.insert(Some(created))
    }

    fn create_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        let template = checked("createElement", nodes.document().create_element("template"))
            .and_then(|el| el.dyn_into::<HtmlTemplateElement>().ok());
        let Some(template) = template else {
            return Vec::new();
        };
        template.set_inner_html(markup);
        let children = template.content().child_nodes();
        let parsed: Vec<Node> = (0..children.length()).filter_map(|i| children.item(i)).collect();
        parsed.into_iter().map(|n| nodes.insert(Some(n))).collect()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            checked("setAttribute", el.set_attribute(name, value));
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node) {
            checked("removeAttribute", el.remove_attribute(name));
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            checked("classList.add", el.class_list().add_1(class));
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            checked("classList.remove", el.class_list().remove_1(class));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.node(parent), self.node(child)) {
            checked("appendChild", parent.append_child(&child));
        }
    }

    fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.node(parent), self.node(child)) {
            let first = parent.first_child();
            checked("insertBefore", parent.insert_before(&child, first.as_ref()));
        }
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let (Some(reference), Some(node)) = (self.node(reference), self.node(node)) else {
            return;
        };
        if let Some(parent) = reference.parent_node() {
            let next = reference.next_sibling();
            checked("insertBefore", parent.insert_before(&node, next.as_ref()));
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(node) = self.node(node) {
            node.set_text_content(Some(text));
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.node(node)
            .and_then(|n| n.text_content())
            .unwrap_or_default()
    }

    fn remove(&mut self, node: NodeId) {
        let Some(root) = self.node(node) else {
            return;
        };
        let doomed: Vec<(NodeId, EventKind)> = self
            .listeners
            .iter()
            .filter(|(_, listener)| root.contains(Some(&listener.target)))
            .map(|(key, _)| *key)
            .collect();
        for key in doomed {
            self.drop_listener(key);
        }
        if self
            .focused
            .and_then(|id| self.node(id))
            .is_some_and(|f| root.contains(Some(&f)))
        {
            self.focused = None;
        }
        if let Some(parent) = root.parent_node() {
            checked("removeChild", parent.remove_child(&root));
        }
        self.nodes.borrow_mut().forget_within(&root);
    }

    fn contains(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        nodes
            .node(node)
            .is_some_and(|n| nodes.document().contains(Some(n)))
    }

    fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        let Some(scope) = self.element(scope) else {
            return Vec::new();
        };
        let found = scope.get_elements_by_class_name(class);
        let mut nodes = self.nodes.borrow_mut();
        (0..found.length())
            .filter_map(|i| found.item(i))
            .map(|el| nodes.lookup_or_insert(&el.into()))
            .collect()
    }

    fn value(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        let Some(el) = self.element(node) else {
            return;
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn is_checked(&self, node: NodeId) -> bool {
        self.element(node)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .is_some_and(|input| input.checked())
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(input) = self
            .element(node)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_checked(checked);
        }
    }

    fn is_selected(&self, node: NodeId) -> bool {
        self.element(node)
            .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
            .is_some_and(|option| option.selected())
    }

    fn set_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(option) = self
            .element(node)
            .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
        {
            option.set_selected(selected);
        }
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    fn focus(&mut self, node: NodeId) {
        if let Some(el) = self
            .element(node)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            && checked("focus", el.focus()).is_some()
        {
            self.focused = Some(node);
        }
    }

    fn listen(&mut self, node: NodeId, kind: EventKind) {
        if self.listeners.contains_key(&(node, kind)) {
            return;
        }
        let Some(target) = self.node(node) else {
            return;
        };
        let sink = Rc::clone(&self.sink);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if kind == EventKind::Click {
                event.prevent_default();
            }
            sink(DialogEvent::dom(node, kind));
        });
        if checked(
            "addEventListener",
            target.add_event_listener_with_callback(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
            ),
        )
        .is_some()
        {
            self.listeners
                .insert((node, kind), Listener { target, callback });
        }
    }

    fn unlisten(&mut self, node: NodeId, kind: EventKind) {
        self.drop_listener((node, kind));
    }
}

impl Drop for WebDom {
    fn drop(&mut self) {
        let keys: Vec<_> = self.listeners.keys().copied().collect();
        for key in keys {
            self.drop_listener(key);
        }
    }
}
