#![forbid(unsafe_code)]

//! Test harness for popup dialogs.
//!
//! - [`TestHost`]: a [`DialogHost`] over [`MemoryDom`] and [`ScriptedModal`].
//! - [`Recorder`]: ok/cancel callbacks that log every invocation.
//! - [`HostExt`]: user-level interactions (press a button, type, toggle,
//!   choose). Interactions go through the same event path a browser would
//!   use and are only delivered to nodes that are actually listened to, so
//!   a press after teardown is a no-op, as it would be on a real page.
//! - [`strategies`]: proptest strategies for options and interactions.

pub mod strategies;

use std::cell::RefCell;
use std::rc::Rc;

use popup_core::{DialogOptions, DialogValue};
use popup_dom::{Dom, EventKind, MemoryDom, NodeId, ScriptedModal};
use popup_widgets::{Control, DialogEvent, DialogHost, DialogId};

/// Headless host used throughout the tests.
pub type TestHost = DialogHost<MemoryDom, ScriptedModal>;

/// A host whose widget completes transitions immediately.
#[must_use]
pub fn test_host() -> TestHost {
    DialogHost::new(MemoryDom::new(), ScriptedModal::new())
}

/// A host whose widget waits for [`ScriptedModal::complete`].
#[must_use]
pub fn manual_host() -> TestHost {
    DialogHost::new(MemoryDom::new(), ScriptedModal::manual())
}

/// One continuation invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ok(Option<DialogValue>),
    Cancel,
}

/// Records ok/cancel invocations in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `options` with both callbacks wired to this recorder.
    #[must_use]
    pub fn wire(&self, options: DialogOptions) -> DialogOptions {
        let ok = Rc::clone(&self.calls);
        let cancel = Rc::clone(&self.calls);
        options
            .on_ok(move |value| ok.borrow_mut().push(Call::Ok(value)))
            .on_cancel(move || cancel.borrow_mut().push(Call::Cancel))
    }

    /// `options` with only the ok callback wired.
    #[must_use]
    pub fn wire_ok(&self, options: DialogOptions) -> DialogOptions {
        let ok = Rc::clone(&self.calls);
        options.on_ok(move |value| ok.borrow_mut().push(Call::Ok(value)))
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }
}

/// Scripted user interactions on a [`TestHost`].
pub trait HostExt {
    /// Deliver `kind` to `node` if something listens to it. Returns whether
    /// the event was delivered.
    fn fire_event(&mut self, node: NodeId, kind: EventKind) -> bool;

    /// Click the OK button of `id`.
    fn press_ok(&mut self, id: DialogId) -> bool;

    /// Click the cancel button of `id`.
    fn press_cancel(&mut self, id: DialogId) -> bool;

    /// Click the header close control of `id`.
    fn press_close(&mut self, id: DialogId) -> bool;

    /// Replace the text of the input of `id`, then deliver the key-up and
    /// input events a keyboard would.
    fn type_into(&mut self, id: DialogId, text: &str) -> bool;

    /// Flip the checkbox (or check the radio) whose key is `key`.
    fn toggle(&mut self, id: DialogId, key: &str) -> bool;

    /// Select the `<option>` whose key is `key`.
    fn choose(&mut self, id: DialogId, key: &str) -> bool;

    /// Text of the character counter of `id`.
    fn counter_text(&self, id: DialogId) -> Option<String>;
}

impl HostExt for TestHost {
    fn fire_event(&mut self, node: NodeId, kind: EventKind) -> bool {
        if !self.dom().is_listening(node, kind) {
            tracing::trace!(%node, event = kind.dom_name(), "no listener; event dropped");
            return false;
        }
        self.dispatch(DialogEvent::dom(node, kind));
        true
    }

    fn press_ok(&mut self, id: DialogId) -> bool {
        match self.frame(id).and_then(|f| f.ok) {
            Some(ok) => self.fire_event(ok, EventKind::Click),
            None => false,
        }
    }

    fn press_cancel(&mut self, id: DialogId) -> bool {
        match self.frame(id).and_then(|f| f.cancel) {
            Some(cancel) => self.fire_event(cancel, EventKind::Click),
            None => false,
        }
    }

    fn press_close(&mut self, id: DialogId) -> bool {
        match self.frame(id).and_then(|f| f.close) {
            Some(close) => self.fire_event(close, EventKind::Click),
            None => false,
        }
    }

    fn type_into(&mut self, id: DialogId, text: &str) -> bool {
        let Some(Control::Input { node, .. }) = self.control(id) else {
            return false;
        };
        let node = *node;
        self.dom_mut().set_value(node, text);
        self.fire_event(node, EventKind::Input);
        self.fire_event(node, EventKind::KeyUp);
        true
    }

    fn toggle(&mut self, id: DialogId, key: &str) -> bool {
        let Some(control) = self.control(id) else {
            return false;
        };
        let radio = matches!(control, Control::Radios { .. });
        let Some(row) = control.rows().iter().find(|r| r.key == key) else {
            return false;
        };
        let input = row.input;
        let next = radio || !self.dom().is_checked(input);
        self.dom_mut().set_checked(input, next);
        self.fire_event(input, EventKind::Change);
        true
    }

    fn choose(&mut self, id: DialogId, key: &str) -> bool {
        let Some(Control::Select { options, .. }) = self.control(id) else {
            return false;
        };
        let found = options
            .iter()
            .copied()
            .find(|o| self.dom().attribute(*o, "value").as_deref() == Some(key));
        let Some(option) = found else {
            return false;
        };
        self.dom_mut().set_selected(option, true);
        true
    }

    fn counter_text(&self, id: DialogId) -> Option<String> {
        let counter = self.control(id)?.counter()?;
        Some(self.dom().text(counter.node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn presses_after_close_are_dropped() {
        let mut host = test_host();
        let rec = Recorder::new();
        let id = host
            .confirm(rec.wire(DialogOptions::new().title("T").body("B")))
            .unwrap();
        assert!(host.press_ok(id));
        assert!(!host.press_ok(id));
        assert!(!host.press_cancel(id));
        assert_eq!(rec.calls(), vec![Call::Ok(None)]);
    }

    #[test]
    fn dropped_events_are_traced() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct Capture(Arc<Mutex<Vec<tracing::Level>>>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                let meta = event.metadata();
                if meta.target() == "popup_harness" {
                    self.0.lock().unwrap().push(*meta.level());
                }
            }
        }

        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Capture(Arc::clone(&levels)));
        tracing::subscriber::with_default(subscriber, || {
            let mut host = test_host();
            let id = host
                .alert(DialogOptions::new().title("T").body("B"))
                .unwrap();
            assert!(host.press_ok(id));
            assert!(!host.press_ok(id));
        });
        assert_eq!(*levels.lock().unwrap(), vec![tracing::Level::TRACE]);
    }

    #[test]
    fn toggle_and_choose_ignore_unknown_keys() {
        let mut host = test_host();
        let id = host
            .checkbox(
                DialogOptions::new()
                    .title("T")
                    .body("B")
                    .options(["a"])
                    .on_ok(|_| {}),
            )
            .unwrap();
        assert!(!host.toggle(id, "zzz"));
        assert!(!host.choose(id, "a"));
        assert!(host.toggle(id, "a"));
    }
}
