#![forbid(unsafe_code)]

//! [`ModalWidget`] backed by Bootstrap 5's `bootstrap.Modal`.
//!
//! Each opened root gets a `Modal` instance created through
//! `getOrCreateInstance` plus listeners for `shown.bs.modal`,
//! `hide.bs.modal` and `hidden.bs.modal`, which are forwarded to the event
//! sink as [`ModalNotification`]s.
//!
//! # Failure Modes
//!
//! - If the widget cannot be attached or asked to hide, the failure is
//!   logged and a `Hidden` notification is queued for the root, so the
//!   dialog tears down as if dismissed instead of hanging.

use std::collections::VecDeque;
use std::rc::Rc;

use ahash::AHashMap;
use js_sys::{Function, Object, Reflect};
use popup_core::Backdrop;
use popup_dom::{ModalConfig, ModalNotification, ModalPhase, ModalWidget, NodeId};
use popup_widgets::DialogEvent;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

use crate::dom::{EventSink, SharedNodes, checked, defer_drop};
use crate::error::WebError;

/// Widget events forwarded as notifications.
const EVENTS: [(&str, ModalPhase); 3] = [
    ("shown.bs.modal", ModalPhase::Shown),
    ("hide.bs.modal", ModalPhase::Hiding),
    ("hidden.bs.modal", ModalPhase::Hidden),
];

/// The `bootstrap.Modal` class of the current window.
///
/// # Errors
///
/// [`WebError::NoWindow`] outside a browser, [`WebError::MissingBootstrap`]
/// when Bootstrap's bundle is not loaded.
pub fn locate_bootstrap() -> Result<JsValue, WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let namespace = Reflect::get(&window, &JsValue::from_str("bootstrap"))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .ok_or(WebError::MissingBootstrap)?;
    Reflect::get(&namespace, &JsValue::from_str("Modal"))
        .ok()
        .filter(JsValue::is_function)
        .ok_or(WebError::MissingBootstrap)
}

fn backdrop_value(backdrop: Backdrop) -> JsValue {
    match backdrop {
        Backdrop::Static => JsValue::from_str("static"),
        Backdrop::Dismiss => JsValue::TRUE,
        Backdrop::Off => JsValue::FALSE,
    }
}

fn call_method(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.call0(target)
}

struct Attached {
    element: Element,
    instance: Option<JsValue>,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

/// Bootstrap modal widget.
pub struct BootstrapModal {
    nodes: SharedNodes,
    class: JsValue,
    sink: EventSink,
    attached: AHashMap<NodeId, Attached>,
    queue: VecDeque<ModalNotification>,
}

impl std::fmt::Debug for BootstrapModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapModal")
            .field("attached", &self.attached.len())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl BootstrapModal {
    /// A widget over `nodes` using the `Modal` class found by
    /// [`locate_bootstrap`]; notifications go to `sink`.
    pub fn new(nodes: SharedNodes, class: JsValue, sink: EventSink) -> Self {
        Self {
            nodes,
            class,
            sink,
            attached: AHashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Number of roots with a live widget instance.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    fn attach(
        &mut self,
        root: NodeId,
        element: Element,
        config: &ModalConfig,
    ) -> Result<(), JsValue> {
        let entry = self.attached.entry(root).or_insert(Attached {
            element,
            instance: None,
            listeners: Vec::with_capacity(EVENTS.len()),
        });
        for (name, phase) in EVENTS {
            let sink = Rc::clone(&self.sink);
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                sink(DialogEvent::Modal(ModalNotification::new(root, phase)));
            });
            entry
                .element
                .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
            entry.listeners.push((name, callback));
        }

        let options = Object::new();
        let fields = [
            ("backdrop", backdrop_value(config.backdrop)),
            ("keyboard", JsValue::from_bool(config.keyboard)),
            ("focus", JsValue::from_bool(config.focus)),
        ];
        for (key, value) in fields {
            Reflect::set(&options, &JsValue::from_str(key), &value)?;
        }
        let factory: Function =
            Reflect::get(&self.class, &JsValue::from_str("getOrCreateInstance"))?.dyn_into()?;
        let instance = factory.call2(&self.class, &entry.element, &options)?;
        entry.instance = Some(instance.clone());
        if config.show {
            call_method(&instance, "show")?;
        }
        Ok(())
    }

    fn fail(&mut self, root: NodeId) {
        self.queue
            .push_back(ModalNotification::new(root, ModalPhase::Hidden));
    }
}

impl ModalWidget for BootstrapModal {
    fn open(&mut self, root: NodeId, config: &ModalConfig) {
        let element = self.nodes.borrow().element(root);
        let attached = match element {
            Some(element) => checked("bootstrap.Modal", self.attach(root, element, config)),
            None => None,
        };
        if attached.is_none() {
            self.fail(root);
        }
    }

    fn close(&mut self, root: NodeId) {
        let Some(instance) = self.attached.get(&root).and_then(|a| a.instance.clone()) else {
            self.fail(root);
            return;
        };
        if checked("Modal.hide", call_method(&instance, "hide")).is_none() {
            self.fail(root);
        }
    }

    fn poll_notification(&mut self) -> Option<ModalNotification> {
        self.queue.pop_front()
    }

    fn release(&mut self, root: NodeId) {
        self.queue.retain(|n| n.root != root);
        let Some(attached) = self.attached.remove(&root) else {
            return;
        };
        for (name, callback) in attached.listeners {
            checked(
                "removeEventListener",
                attached
                    .element
                    .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref()),
            );
            defer_drop(callback);
        }
        if let Some(instance) = attached.instance {
            checked("Modal.dispose", call_method(&instance, "dispose"));
        }
    }
}

impl Drop for BootstrapModal {
    fn drop(&mut self) {
        let roots: Vec<NodeId> = self.attached.keys().copied().collect();
        for root in roots {
            self.release(root);
        }
    }
}
