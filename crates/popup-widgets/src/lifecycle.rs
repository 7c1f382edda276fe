#![forbid(unsafe_code)]

//! Per-instance lifecycle: open → shown → resolving → closed.
//!
//! A [`DialogInstance`] owns the node handles and event bindings of one
//! dialog and the sink its outcome goes to. It reacts to two inputs:
//! user [`Action`]s (routed from DOM events through its binding table) and
//! widget notifications.
//!
//! # Invariants
//!
//! - The sink is taken exactly once, when the widget reports `Hidden`; the
//!   resulting [`Resolution`] carries it out of the instance so continuations
//!   run after the host has released its borrows.
//! - Once resolving, further button actions are ignored. The trigger that
//!   started the close decides the outcome, whatever hides the dialog.
//! - Teardown (unbind, remove subtree, release widget) runs at most once.
//!
//! # Failure Modes
//!
//! - A close requested before the widget reports `Shown` may be dropped by
//!   the widget; it is re-issued when `Shown` arrives.
//! - A `Hidden` notification the instance did not ask for (backdrop click,
//!   widget-initiated dismissal) resolves as cancel, except for the alert,
//!   whose only outcome is acknowledgement.

use ahash::AHashMap;
use futures::channel::oneshot;
use popup_core::{Callbacks, DialogOutcome, Theme};
use popup_dom::{Dom, EventKind, ModalConfig, ModalPhase, ModalWidget, NodeId};

use crate::builder::DialogFrame;
use crate::controls::Control;
use crate::host::DialogId;
use crate::kind::DialogKind;

/// What initiated a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Confirm,
    Cancel,
}

/// Instance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built and handed to the widget, not yet shown.
    Built,
    Shown,
    /// A close was requested; waiting for the widget to report `Hidden`.
    Resolving(Trigger),
    /// Torn down.
    Closed,
}

/// User actions bound to DOM events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Confirm,
    Cancel,
    /// The header close control: cancel with the confirm path disarmed.
    Close,
    /// Refresh the character counter.
    Count,
}

/// Where an outcome is delivered.
pub enum Sink {
    Callbacks(Callbacks),
    Channel(oneshot::Sender<DialogOutcome>),
}

impl Sink {
    /// Replace the confirm continuation with a no-op.
    pub fn disarm_ok(&mut self) {
        if let Self::Callbacks(callbacks) = self {
            callbacks.ok = Box::new(|_| {});
        }
    }

    /// Deliver `outcome`, consuming the sink.
    pub fn deliver(self, outcome: DialogOutcome) {
        match self {
            Self::Callbacks(callbacks) => match outcome {
                DialogOutcome::Confirmed(value) => (callbacks.ok)(value),
                DialogOutcome::Cancelled => (callbacks.cancel)(),
            },
            Self::Channel(sender) => {
                // The receiver may have been dropped; nobody is waiting then.
                let _ = sender.send(outcome);
            }
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Callbacks(_) => f.write_str("Sink::Callbacks"),
            Self::Channel(_) => f.write_str("Sink::Channel"),
        }
    }
}

/// A resolved dialog whose continuation has not run yet.
#[derive(Debug)]
#[must_use = "a resolution does nothing until fired"]
pub struct Resolution {
    pub id: DialogId,
    pub kind: DialogKind,
    pub outcome: DialogOutcome,
    sink: Sink,
}

impl Resolution {
    /// Run the continuation.
    pub fn fire(self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "dialog_resolve",
            id = self.id.raw(),
            kind = self.kind.name(),
            confirmed = self.outcome.is_confirmed()
        )
        .entered();

        self.sink.deliver(self.outcome);
    }
}

/// One live dialog.
#[derive(Debug)]
pub struct DialogInstance {
    id: DialogId,
    kind: DialogKind,
    frame: DialogFrame,
    control: Control,
    config: ModalConfig,
    phase: Phase,
    bindings: AHashMap<(NodeId, EventKind), Action>,
    sink: Option<Sink>,
}

impl DialogInstance {
    pub(crate) fn new(
        id: DialogId,
        kind: DialogKind,
        frame: DialogFrame,
        control: Control,
        config: ModalConfig,
        sink: Sink,
    ) -> Self {
        Self {
            id,
            kind,
            frame,
            control,
            config,
            phase: Phase::Built,
            bindings: AHashMap::new(),
            sink: Some(sink),
        }
    }

    #[must_use]
    pub fn id(&self) -> DialogId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn frame(&self) -> &DialogFrame {
        &self.frame
    }

    #[must_use]
    pub fn control(&self) -> &Control {
        &self.control
    }

    #[must_use]
    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Number of live event bindings.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Wire the buttons, close control and counter to their actions.
    pub(crate) fn bind_all<D: Dom>(&mut self, dom: &mut D) {
        if let Some(ok) = self.frame.ok {
            self.bind(dom, ok, EventKind::Click, Action::Confirm);
        }
        if let Some(cancel) = self.frame.cancel {
            self.bind(dom, cancel, EventKind::Click, Action::Cancel);
        }
        if let Some(close) = self.frame.close {
            self.bind(dom, close, EventKind::Click, Action::Close);
        }
        if self.control.counter().is_some()
            && let Some(input) = self.control.focus_target()
        {
            self.bind(dom, input, EventKind::KeyUp, Action::Count);
            self.bind(dom, input, EventKind::Input, Action::Count);
        }
    }

    fn bind<D: Dom>(&mut self, dom: &mut D, node: NodeId, kind: EventKind, action: Action) {
        dom.listen(node, kind);
        self.bindings.insert((node, kind), action);
    }

    fn unbind_where<D: Dom>(&mut self, dom: &mut D, keep: impl Fn(Action) -> bool) {
        self.bindings.retain(|(node, kind), action| {
            let retained = keep(*action);
            if !retained {
                dom.unlisten(*node, *kind);
            }
            retained
        });
    }

    /// The action bound to `(node, kind)`, if this instance owns it.
    #[must_use]
    pub fn action_for(&self, node: NodeId, kind: EventKind) -> Option<Action> {
        self.bindings.get(&(node, kind)).copied()
    }

    /// Handle a user action.
    pub fn on_action<D: Dom, W: ModalWidget>(
        &mut self,
        action: Action,
        dom: &mut D,
        widget: &mut W,
        theme: &Theme,
    ) {
        match (action, self.phase) {
            (Action::Count, Phase::Built | Phase::Shown) => {
                self.control.refresh_counter(dom, theme);
            }
            (Action::Count, _) => {}
            (_, Phase::Built | Phase::Shown) => {
                let trigger = match action {
                    Action::Confirm => Trigger::Confirm,
                    _ => Trigger::Cancel,
                };
                if action == Action::Close
                    && let Some(sink) = self.sink.as_mut()
                {
                    sink.disarm_ok();
                }
                self.phase = Phase::Resolving(trigger);
                widget.close(self.frame.root);
            }
            (_, _phase) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(id = self.id.raw(), ?action, phase = ?_phase, "action ignored");
            }
        }
    }

    /// Request a cancel as if the cancel button were pressed.
    pub fn request_cancel<W: ModalWidget>(&mut self, widget: &mut W) {
        if matches!(self.phase, Phase::Built | Phase::Shown) {
            self.phase = Phase::Resolving(Trigger::Cancel);
            widget.close(self.frame.root);
        }
    }

    /// Handle a widget notification. Returns the resolution once hidden.
    pub fn on_notification<D: Dom, W: ModalWidget>(
        &mut self,
        phase: ModalPhase,
        dom: &mut D,
        widget: &mut W,
    ) -> Option<Resolution> {
        match phase {
            ModalPhase::Shown => {
                match self.phase {
                    Phase::Built => {
                        self.phase = Phase::Shown;
                        if let Some(target) = self.control.focus_target() {
                            dom.focus(target);
                        }
                    }
                    Phase::Resolving(_) => widget.close(self.frame.root),
                    Phase::Shown | Phase::Closed => {}
                }
                None
            }
            ModalPhase::Hiding => {
                self.unbind_where(dom, |action| action != Action::Count);
                None
            }
            ModalPhase::Hidden => {
                let trigger = match self.phase {
                    Phase::Closed => return None,
                    Phase::Resolving(trigger) => trigger,
                    Phase::Built | Phase::Shown if self.kind.dismiss_confirms() => Trigger::Confirm,
                    Phase::Built | Phase::Shown => Trigger::Cancel,
                };
                let outcome = match trigger {
                    Trigger::Confirm => DialogOutcome::Confirmed(self.control.extract(dom)),
                    Trigger::Cancel => DialogOutcome::Cancelled,
                };
                self.teardown(dom, widget);
                let sink = self.sink.take()?;
                Some(Resolution {
                    id: self.id,
                    kind: self.kind,
                    outcome,
                    sink,
                })
            }
        }
    }

    /// Unbind every handler, remove the subtree and release the widget.
    /// Idempotent.
    pub fn teardown<D: Dom, W: ModalWidget>(&mut self, dom: &mut D, widget: &mut W) {
        if self.phase == Phase::Closed {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dialog_teardown", id = self.id.raw()).entered();

        self.unbind_where(dom, |_| false);
        dom.remove(self.frame.root);
        widget.release(self.frame.root);
        self.phase = Phase::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{PlaceSpec, place};
    use crate::controls;
    use popup_core::{DialogOptions, DialogValue, normalize};
    use popup_dom::{MemoryDom, ScriptedModal};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn instance(
        dom: &mut MemoryDom,
        kind: DialogKind,
        opts: DialogOptions,
        log: &Log,
    ) -> DialogInstance {
        let ok_log = Rc::clone(log);
        let cancel_log = Rc::clone(log);
        let opts = opts
            .title("T")
            .body("B")
            .on_ok(move |v| ok_log.borrow_mut().push(format!("ok:{v:?}")))
            .on_cancel(move || cancel_log.borrow_mut().push("cancel".into()));
        let normalized = normalize(opts, kind.required_keys(), kind.defaults()).unwrap();
        let mut settings = normalized.settings;
        kind.force(&mut settings);
        let theme = Theme::default();
        let spec = PlaceSpec::from_settings("popup-modal-t", &settings);
        let frame = place(dom, &theme, &spec);
        let control = controls::render(dom, &theme, &frame, &settings, kind);
        let mut inst = DialogInstance::new(
            DialogId::next(),
            kind,
            frame,
            control,
            ModalConfig::default(),
            Sink::Callbacks(normalized.callbacks),
        );
        inst.bind_all(dom);
        inst
    }

    fn pump(
        inst: &mut DialogInstance,
        dom: &mut MemoryDom,
        modal: &mut ScriptedModal,
    ) -> Vec<Resolution> {
        let mut out = Vec::new();
        while let Some(n) = modal.poll_notification() {
            out.extend(inst.on_notification(n.phase, dom, modal));
        }
        out
    }

    #[test]
    fn confirm_resolves_once_with_value() {
        let log = Log::default();
        let mut dom = MemoryDom::new();
        let mut modal = ScriptedModal::new();
        let theme = Theme::default();
        let kind = DialogKind::Input(crate::InputKind::Text);
        let mut inst = instance(&mut dom, kind, DialogOptions::new(), &log);
        let root = inst.frame().root;
        modal.open(root, inst.config());
        assert!(pump(&mut inst, &mut dom, &mut modal).is_empty());
        assert_eq!(inst.phase(), Phase::Shown);
        let input = inst.control().focus_target().unwrap();
        assert_eq!(dom.focused(), Some(input));

        dom.set_value(input, "hi");
        inst.on_action(Action::Confirm, &mut dom, &mut modal, &theme);
        inst.on_action(Action::Cancel, &mut dom, &mut modal, &theme);
        let resolutions = pump(&mut inst, &mut dom, &mut modal);
        assert_eq!(resolutions.len(), 1);
        assert_eq!(
            resolutions[0].outcome,
            DialogOutcome::Confirmed(Some(DialogValue::from("hi")))
        );
        for r in resolutions {
            r.fire();
        }
        assert_eq!(*log.borrow(), vec!["ok:Some(Text(\"hi\"))".to_owned()]);
        assert_eq!(inst.phase(), Phase::Closed);
        assert!(!dom.contains(root));
        assert_eq!(dom.listener_count(), 0);
        assert_eq!(modal.close_requests(root), 1);
    }

    #[test]
    fn close_control_cancels() {
        let log = Log::default();
        let mut dom = MemoryDom::new();
        let mut modal = ScriptedModal::new();
        let opts = DialogOptions::new().options(["a"]);
        let mut inst = instance(&mut dom, DialogKind::Select, opts, &log);
        modal.open(inst.frame().root, inst.config());
        let _ = pump(&mut inst, &mut dom, &mut modal);
        inst.on_action(Action::Close, &mut dom, &mut modal, &Theme::default());
        for r in pump(&mut inst, &mut dom, &mut modal) {
            assert_eq!(r.outcome, DialogOutcome::Cancelled);
            r.fire();
        }
        assert_eq!(*log.borrow(), vec!["cancel".to_owned()]);
    }

    #[test]
    fn unrequested_hide_cancels_but_alert_acknowledges() {
        for (kind, expected) in [
            (DialogKind::Confirm, "cancel"),
            (DialogKind::Alert, "ok:None"),
        ] {
            let log = Log::default();
            let mut dom = MemoryDom::new();
            let mut modal = ScriptedModal::new();
            let mut inst = instance(&mut dom, kind, DialogOptions::new(), &log);
            let root = inst.frame().root;
            let r = inst.on_notification(ModalPhase::Hidden, &mut dom, &mut modal);
            r.unwrap().fire();
            assert_eq!(*log.borrow(), vec![expected.to_owned()]);
            assert!(!dom.contains(root));
        }
    }

    #[test]
    fn close_before_shown_is_reissued() {
        let log = Log::default();
        let mut dom = MemoryDom::new();
        let mut modal = ScriptedModal::manual();
        let mut inst = instance(&mut dom, DialogKind::Confirm, DialogOptions::new(), &log);
        let root = inst.frame().root;
        modal.open(root, inst.config());
        inst.on_action(Action::Confirm, &mut dom, &mut modal, &Theme::default());
        assert_eq!(inst.phase(), Phase::Resolving(Trigger::Confirm));
        modal.complete(root);
        assert!(pump(&mut inst, &mut dom, &mut modal).is_empty());
        assert_eq!(modal.close_requests(root), 2);
        modal.complete(root);
        let resolutions = pump(&mut inst, &mut dom, &mut modal);
        assert_eq!(resolutions.len(), 1);
        assert!(resolutions[0].outcome.is_confirmed());
    }

    #[test]
    fn hiding_detaches_counter_only() {
        let log = Log::default();
        let mut dom = MemoryDom::new();
        let mut modal = ScriptedModal::manual();
        let mut inst = instance(
            &mut dom,
            DialogKind::Input(crate::InputKind::Text),
            DialogOptions::new().max_length(4),
            &log,
        );
        let input = inst.control().focus_target().unwrap();
        assert!(dom.is_listening(input, EventKind::KeyUp));
        let before = inst.binding_count();
        let _ = inst.on_notification(ModalPhase::Hiding, &mut dom, &mut modal);
        assert!(!dom.is_listening(input, EventKind::KeyUp));
        assert!(!dom.is_listening(input, EventKind::Input));
        assert_eq!(inst.binding_count(), before - 2);
    }

    #[test]
    fn teardown_is_idempotent() {
        let log = Log::default();
        let mut dom = MemoryDom::new();
        let mut modal = ScriptedModal::new();
        let mut inst = instance(&mut dom, DialogKind::Confirm, DialogOptions::new(), &log);
        inst.teardown(&mut dom, &mut modal);
        let nodes = dom.node_count();
        let history = modal.history().len();
        inst.teardown(&mut dom, &mut modal);
        assert_eq!(dom.node_count(), nodes);
        assert_eq!(modal.history().len(), history);
        assert!(
            inst.on_notification(ModalPhase::Hidden, &mut dom, &mut modal)
                .is_none()
        );
        assert!(log.borrow().is_empty());
    }
}
