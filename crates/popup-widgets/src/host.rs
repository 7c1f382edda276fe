#![forbid(unsafe_code)]

//! Dialog host: entry points and event routing.
//!
//! [`DialogHost`] owns the document, the modal widget and every live
//! [`DialogInstance`]. Entry points validate options, build the dialog, bind
//! its handlers and open it; they return immediately with a [`DialogId`].
//! Backends then feed DOM events and widget notifications to
//! [`DialogHost::handle_event`], which returns the [`Resolution`]s that
//! became due.
//!
//! Resolutions are returned rather than fired so that continuations run
//! without the host borrowed; a continuation is then free to open another
//! dialog on the same host. [`DialogHost::dispatch`] fires them in place
//! for callers that do not need that.
//!
//! # Invariants
//!
//! - Validation happens before any node is created; a rejected entry point
//!   leaves the document untouched.
//! - Every live instance has a distinct [`DialogId`] and instance class, so
//!   concurrent dialogs never observe each other's nodes.
//! - Instances are dropped from the host as soon as they close.
//!
//! # Failure Modes
//!
//! - Events for nodes no instance has bound are ignored.
//! - Notifications for roots no live instance owns are ignored.
//! - Dropping the host drops pending sinks without running them; awaiting
//!   futures resolve to
//!   [`DialogOutcome::Cancelled`](popup_core::DialogOutcome::Cancelled).

use std::sync::atomic::{AtomicU64, Ordering};

use futures::channel::oneshot;
use popup_core::{DialogOptions, DialogSettings, OptionKey, Theme, ValidationError, normalize};
use popup_dom::{Dom, EventKind, ModalConfig, ModalNotification, ModalWidget, NodeId};

use crate::builder::{DialogFrame, MODAL_MARKER, PlaceSpec, place};
use crate::controls::{self, Control};
use crate::kind::{DialogKind, InputKind};
use crate::lifecycle::{DialogInstance, Phase, Resolution, Sink};
use crate::pending::DialogFuture;

static DIALOG_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a dialog instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(u64);

impl DialogId {
    pub(crate) fn next() -> Self {
        Self(DIALOG_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The class that marks this instance's root.
    #[must_use]
    pub fn instance_class(self) -> String {
        format!("{MODAL_MARKER}-{}", self.0)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

/// Input to [`DialogHost::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// A DOM event on a bound node.
    Dom { target: NodeId, kind: EventKind },
    /// A widget lifecycle notification.
    Modal(ModalNotification),
}

impl DialogEvent {
    #[must_use]
    pub const fn dom(target: NodeId, kind: EventKind) -> Self {
        Self::Dom { target, kind }
    }
}

impl From<ModalNotification> for DialogEvent {
    fn from(notification: ModalNotification) -> Self {
        Self::Modal(notification)
    }
}

/// Owner of the document, widget and live dialogs.
#[derive(Debug)]
pub struct DialogHost<D: Dom, W: ModalWidget> {
    dom: D,
    widget: W,
    theme: Theme,
    dialogs: Vec<DialogInstance>,
    deferred: Vec<Resolution>,
}

impl<D: Dom, W: ModalWidget> DialogHost<D, W> {
    /// Create a host with the default (Bootstrap 4) theme.
    pub fn new(dom: D, widget: W) -> Self {
        Self {
            dom,
            widget,
            theme: Theme::default(),
            dialogs: Vec::new(),
            deferred: Vec::new(),
        }
    }

    /// Use `theme` for dialogs opened from now on.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    // --- Entry points ---

    /// Single-button acknowledgement. Requires `title` and `body`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn alert(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Alert, options)
    }

    /// Confirm/cancel question. Requires `title`, `body`, `ok.callback`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn confirm(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Confirm, options)
    }

    /// Single-line text prompt.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn text(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Input(InputKind::Text), options)
    }

    /// Multi-line text prompt.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn textarea(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Input(InputKind::Textarea), options)
    }

    /// Email prompt.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn email(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Input(InputKind::Email), options)
    }

    /// Numeric prompt; confirms with [`DialogValue::Number`](popup_core::DialogValue::Number).
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn number(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Input(InputKind::Number), options)
    }

    /// Drop-down choice. Requires `title`, `body`, `options`, `ok.callback`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn select(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Select, options)
    }

    /// Multiple choice. Confirms with the checked keys, or `None`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn checkbox(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Checkbox, options)
    }

    /// Single choice from a radio group.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn radio(&mut self, options: DialogOptions) -> Result<DialogId, ValidationError> {
        self.open(DialogKind::Radio, options)
    }

    /// Open a dialog of any kind with callback continuations.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn open(
        &mut self,
        kind: DialogKind,
        options: DialogOptions,
    ) -> Result<DialogId, ValidationError> {
        let normalized = normalize(options, kind.required_keys(), kind.defaults())?;
        let mut callbacks = normalized.callbacks;
        if kind == DialogKind::Alert {
            callbacks.cancel = Box::new(|| {});
        }
        Ok(self.launch(kind, normalized.settings, Sink::Callbacks(callbacks)))
    }

    /// Open a dialog whose outcome is delivered through a future instead of
    /// callbacks. `ok.callback` is not required; any callbacks supplied are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingKey`] when a required option is unset.
    pub fn open_async(
        &mut self,
        kind: DialogKind,
        options: DialogOptions,
    ) -> Result<DialogFuture, ValidationError> {
        let required: Vec<OptionKey> = kind
            .required_keys()
            .iter()
            .copied()
            .filter(|key| *key != OptionKey::OkCallback)
            .collect();
        let normalized = normalize(options, &required, kind.defaults())?;
        let (sender, receiver) = oneshot::channel();
        let id = self.launch(kind, normalized.settings, Sink::Channel(sender));
        Ok(DialogFuture::new(id, receiver))
    }

    fn launch(
        &mut self,
        kind: DialogKind,
        mut settings: DialogSettings,
        sink: Sink,
    ) -> DialogId {
        let id = DialogId::next();

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dialog_open", id = id.raw(), kind = kind.name())
            .entered();

        kind.force(&mut settings);
        let instance_class = id.instance_class();
        let frame = place(
            &mut self.dom,
            &self.theme,
            &PlaceSpec::from_settings(&instance_class, &settings),
        );
        let control = controls::render(&mut self.dom, &self.theme, &frame, &settings, kind);
        let config = ModalConfig {
            backdrop: settings.modal.backdrop,
            keyboard: settings.modal.keyboard,
            focus: settings.modal.focus,
            show: true,
        };
        let mut instance = DialogInstance::new(id, kind, frame, control, config, sink);
        instance.bind_all(&mut self.dom);
        self.widget.open(frame.root, &config);
        self.dialogs.push(instance);

        let due = self.pump();
        self.deferred.extend(due);
        id
    }

    // --- Event routing ---

    /// Route one event, then drain the widget's queued notifications.
    /// Returns every resolution that became due, oldest first.
    #[must_use = "resolutions must be fired for continuations to run"]
    pub fn handle_event(&mut self, event: DialogEvent) -> Vec<Resolution> {
        let mut due = std::mem::take(&mut self.deferred);
        match event {
            DialogEvent::Dom { target, kind } => self.route_dom(target, kind),
            DialogEvent::Modal(notification) => due.extend(self.route_notification(notification)),
        }
        due.extend(self.pump());
        due
    }

    /// Drain the widget's queued notifications.
    #[must_use = "resolutions must be fired for continuations to run"]
    pub fn pump(&mut self) -> Vec<Resolution> {
        let mut due = std::mem::take(&mut self.deferred);
        while let Some(notification) = self.widget.poll_notification() {
            due.extend(self.route_notification(notification));
        }
        due
    }

    /// [`handle_event`](Self::handle_event), then fire the resolutions.
    pub fn dispatch(&mut self, event: DialogEvent) {
        for resolution in self.handle_event(event) {
            resolution.fire();
        }
    }

    /// [`pump`](Self::pump), then fire the resolutions.
    pub fn dispatch_pending(&mut self) {
        for resolution in self.pump() {
            resolution.fire();
        }
    }

    /// Ask every live dialog to cancel, as if its cancel button were pressed.
    #[must_use = "resolutions must be fired for continuations to run"]
    pub fn dismiss_all(&mut self) -> Vec<Resolution> {
        for instance in &mut self.dialogs {
            instance.request_cancel(&mut self.widget);
        }
        self.pump()
    }

    fn route_dom(&mut self, target: NodeId, kind: EventKind) {
        let Some((instance, action)) = self
            .dialogs
            .iter_mut()
            .find_map(|d| d.action_for(target, kind).map(|a| (d, a)))
        else {
            #[cfg(feature = "tracing")]
            tracing::debug!(%target, event = kind.dom_name(), "event for unbound node ignored");
            return;
        };
        instance.on_action(action, &mut self.dom, &mut self.widget, &self.theme);
    }

    fn route_notification(&mut self, notification: ModalNotification) -> Option<Resolution> {
        let Some(idx) = self
            .dialogs
            .iter()
            .position(|d| d.frame().root == notification.root)
        else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                root = %notification.root,
                phase = ?notification.phase,
                "notification for unknown dialog ignored"
            );
            return None;
        };
        let resolution =
            self.dialogs[idx].on_notification(notification.phase, &mut self.dom, &mut self.widget);
        if self.dialogs[idx].phase() == Phase::Closed {
            self.dialogs.remove(idx);
        }
        resolution
    }

    // --- Inspection ---

    /// Number of live dialogs.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.dialogs.len()
    }

    /// Ids of live dialogs, oldest first.
    #[must_use]
    pub fn open_ids(&self) -> Vec<DialogId> {
        self.dialogs.iter().map(DialogInstance::id).collect()
    }

    #[must_use]
    pub fn is_open(&self, id: DialogId) -> bool {
        self.instance(id).is_some()
    }

    /// The live instance with `id`.
    #[must_use]
    pub fn instance(&self, id: DialogId) -> Option<&DialogInstance> {
        self.dialogs.iter().find(|d| d.id() == id)
    }

    #[must_use]
    pub fn phase(&self, id: DialogId) -> Option<Phase> {
        self.instance(id).map(DialogInstance::phase)
    }

    #[must_use]
    pub fn frame(&self, id: DialogId) -> Option<&DialogFrame> {
        self.instance(id).map(DialogInstance::frame)
    }

    #[must_use]
    pub fn control(&self, id: DialogId) -> Option<&Control> {
        self.instance(id).map(DialogInstance::control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popup_core::{Backdrop, DialogOutcome, DialogValue};
    use popup_dom::{MemoryDom, ModalPhase, ScriptedModal};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Host = DialogHost<MemoryDom, ScriptedModal>;

    fn host() -> Host {
        DialogHost::new(MemoryDom::new(), ScriptedModal::new())
    }

    fn click(host: &mut Host, node: NodeId) -> Vec<Resolution> {
        host.handle_event(DialogEvent::dom(node, EventKind::Click))
    }

    #[test]
    fn validation_failure_creates_nothing() {
        let mut host = host();
        let before = host.dom().node_count();
        let err = host
            .select(DialogOptions::new().title("T").body("B").on_ok(|_| {}))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingKey(OptionKey::Options));
        assert_eq!(host.dom().node_count(), before);
        assert!(host.widget().history().is_empty());
    }

    #[test]
    fn open_shows_and_focuses() {
        let mut host = host();
        let id = host
            .number(DialogOptions::new().title("T").body("B").on_ok(|_| {}))
            .unwrap();
        assert_eq!(host.phase(id), Some(Phase::Shown));
        let input = host.control(id).and_then(Control::focus_target);
        assert_eq!(host.dom().focused(), input);
        let root = host.frame(id).unwrap().root;
        assert!(host.dom().has_class(root, &id.instance_class()));
        let config = host.widget().config(root).unwrap();
        assert!(!config.keyboard);
        assert!(config.show);
    }

    #[test]
    fn control_is_focused_even_without_widget_focus() {
        let mut host = host();
        let id = host
            .select(
                DialogOptions::new()
                    .title("T")
                    .body("B")
                    .options(["a", "b"])
                    .focus(false)
                    .on_ok(|_| {}),
            )
            .unwrap();
        let root = host.frame(id).unwrap().root;
        assert!(!host.widget().config(root).unwrap().focus);
        let select = host.control(id).and_then(Control::focus_target);
        assert!(select.is_some());
        assert_eq!(host.dom().focused(), select);
    }

    #[test]
    fn keyboard_is_forced_off() {
        let mut host = host();
        let id = host
            .confirm(
                DialogOptions::new()
                    .title("T")
                    .body("B")
                    .keyboard(true)
                    .on_ok(|_| {}),
            )
            .unwrap();
        let root = host.frame(id).unwrap().root;
        assert!(!host.widget_mut().press_escape(root));
        assert!(host.is_open(id));
    }

    #[test]
    fn number_prompt_confirms_typed_value() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let mut host = host();
        let id = host
            .number(
                DialogOptions::new()
                    .title("Age")
                    .body("How old?")
                    .on_ok(move |v| *sink.borrow_mut() = Some(v)),
            )
            .unwrap();
        let input = host.control(id).and_then(Control::focus_target).unwrap();
        host.dom_mut().set_value(input, " 41 ");
        let ok = host.frame(id).unwrap().ok.unwrap();
        for r in click(&mut host, ok) {
            r.fire();
        }
        assert_eq!(*seen.borrow(), Some(Some(DialogValue::Number(41.0))));
        assert_eq!(host.open_count(), 0);
    }

    #[test]
    fn backdrop_dismissal_resolves_as_cancel() {
        let cancelled = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&cancelled);
        let mut host = host();
        let id = host
            .text(
                DialogOptions::new()
                    .title("T")
                    .body("B")
                    .backdrop(Backdrop::Dismiss)
                    .on_ok(|_| panic!("ok must not fire"))
                    .on_cancel(move || *flag.borrow_mut() = true),
            )
            .unwrap();
        let root = host.frame(id).unwrap().root;
        assert!(host.widget_mut().click_backdrop(root));
        host.dispatch_pending();
        assert!(*cancelled.borrow());
        assert!(!host.dom().contains(root));
    }

    #[test]
    fn continuation_can_reopen_on_same_host() {
        let mut host = host();
        let opened = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&opened);
        let id = host
            .confirm(
                DialogOptions::new()
                    .title("T")
                    .body("B")
                    .on_ok(move |_| *flag.borrow_mut() = true),
            )
            .unwrap();
        let ok = host.frame(id).unwrap().ok.unwrap();
        for r in click(&mut host, ok) {
            r.fire();
            host.alert(DialogOptions::new().title("Done").body("Saved."))
                .unwrap();
        }
        assert!(*opened.borrow());
        assert_eq!(host.open_count(), 1);
    }

    #[test]
    fn unknown_events_are_ignored() {
        let mut host = host();
        let stray = host.dom_mut().create_element("button");
        assert!(click(&mut host, stray).is_empty());
        let ghost = ModalNotification::new(stray, ModalPhase::Hidden);
        assert!(host.handle_event(ghost.into()).is_empty());
    }

    #[test]
    fn dismiss_all_cancels_every_dialog() {
        let mut host = host();
        let confirm = DialogOptions::new().title("A").body("a");
        let a = host.open_async(DialogKind::Confirm, confirm).unwrap();
        let radio = DialogOptions::new().title("B").body("b").options(["x"]);
        let b = host.open_async(DialogKind::Radio, radio).unwrap();
        assert_eq!(host.open_count(), 2);
        for r in host.dismiss_all() {
            r.fire();
        }
        assert_eq!(host.open_count(), 0);
        assert_eq!(futures::executor::block_on(a), DialogOutcome::Cancelled);
        assert_eq!(futures::executor::block_on(b), DialogOutcome::Cancelled);
    }

    #[test]
    fn dropping_host_cancels_futures() {
        let mut host = host();
        let kind = DialogKind::Input(InputKind::Email);
        let fut = host
            .open_async(kind, DialogOptions::new().title("T").body("B"))
            .unwrap();
        drop(host);
        assert_eq!(futures::executor::block_on(fut), DialogOutcome::Cancelled);
    }

    #[test]
    fn ids_and_instance_classes_are_distinct() {
        let mut host = host();
        let a = host
            .alert(DialogOptions::new().title("A").body("a"))
            .unwrap();
        let b = host
            .alert(DialogOptions::new().title("B").body("b"))
            .unwrap();
        assert_ne!(a, b);
        assert_ne!(a.instance_class(), b.instance_class());
        assert_eq!(host.open_ids(), vec![a, b]);
        assert!(a.instance_class().starts_with("popup-modal-"));
    }
}
