#![forbid(unsafe_code)]

//! Modal widget seam.
//!
//! A [`ModalWidget`] shows and hides a dialog root and reports lifecycle
//! transitions as [`ModalNotification`]s. Widgets that notify synchronously
//! queue them for [`ModalWidget::poll_notification`]; asynchronous widgets
//! deliver them through the host's event path instead.
//!
//! # Invariants
//!
//! - For every root, `Shown` precedes `Hiding`, which precedes `Hidden`.
//! - `Hidden` is reported at most once per `open`.
//! - `close` on a root that is not shown is ignored, mirroring widgets that
//!   refuse to hide mid-transition.

use std::collections::VecDeque;

use ahash::AHashMap;
use popup_core::Backdrop;

use crate::NodeId;

/// Options passed to the widget when a dialog opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalConfig {
    pub backdrop: Backdrop,
    /// Escape closes the dialog.
    pub keyboard: bool,
    /// Focus the dialog when shown.
    pub focus: bool,
    /// Show immediately on open.
    pub show: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            backdrop: Backdrop::Static,
            keyboard: false,
            focus: true,
            show: true,
        }
    }
}

/// Widget lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalPhase {
    /// Fully visible.
    Shown,
    /// A hide has started.
    Hiding,
    /// Fully hidden.
    Hidden,
}

/// A lifecycle transition for one dialog root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalNotification {
    pub root: NodeId,
    pub phase: ModalPhase,
}

impl ModalNotification {
    #[must_use]
    pub const fn new(root: NodeId, phase: ModalPhase) -> Self {
        Self { root, phase }
    }
}

/// The widget that shows and hides dialog roots.
pub trait ModalWidget {
    /// Attach the widget to `root` and (if `config.show`) start showing it.
    fn open(&mut self, root: NodeId, config: &ModalConfig);

    /// Start hiding `root`.
    fn close(&mut self, root: NodeId);

    /// Next queued notification, for widgets that notify synchronously.
    fn poll_notification(&mut self) -> Option<ModalNotification> {
        None
    }

    /// Drop any widget state held for `root`. Called once after teardown.
    fn release(&mut self, _root: NodeId) {}
}

/// A request recorded by [`ScriptedModal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCall {
    Open(NodeId, ModalConfig),
    Close(NodeId),
    Release(NodeId),
}

/// How [`ScriptedModal`] completes transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transitions {
    /// Open reports `Shown` and close reports `Hiding` + `Hidden` at once.
    #[default]
    Immediate,
    /// Transitions stay pending until [`ScriptedModal::complete`].
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootState {
    Opening,
    Open,
    Closing,
    Closed,
}

/// A scripted widget for tests and headless hosts.
#[derive(Debug, Default)]
pub struct ScriptedModal {
    transitions: Transitions,
    states: AHashMap<NodeId, (RootState, ModalConfig)>,
    queue: VecDeque<ModalNotification>,
    history: Vec<ModalCall>,
}

impl ScriptedModal {
    /// A widget whose transitions complete immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A widget whose transitions wait for [`Self::complete`].
    #[must_use]
    pub fn manual() -> Self {
        Self {
            transitions: Transitions::Manual,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn transitions(&self) -> Transitions {
        self.transitions
    }

    fn state(&self, root: NodeId) -> Option<RootState> {
        self.states.get(&root).map(|(state, _)| *state)
    }

    fn set_state(&mut self, root: NodeId, state: RootState) {
        if let Some(entry) = self.states.get_mut(&root) {
            entry.0 = state;
        }
    }

    fn push(&mut self, root: NodeId, phase: ModalPhase) {
        self.queue.push_back(ModalNotification::new(root, phase));
    }

    fn begin_hide(&mut self, root: NodeId) {
        self.push(root, ModalPhase::Hiding);
        match self.transitions {
            Transitions::Immediate => {
                self.set_state(root, RootState::Closed);
                self.push(root, ModalPhase::Hidden);
            }
            Transitions::Manual => self.set_state(root, RootState::Closing),
        }
    }

    /// Finish a pending transition on `root`. Returns whether one was
    /// pending.
    pub fn complete(&mut self, root: NodeId) -> bool {
        match self.state(root) {
            Some(RootState::Opening) => {
                self.set_state(root, RootState::Open);
                self.push(root, ModalPhase::Shown);
                true
            }
            Some(RootState::Closing) => {
                self.set_state(root, RootState::Closed);
                self.push(root, ModalPhase::Hidden);
                true
            }
            _ => false,
        }
    }

    /// Backdrop click. Hides the dialog only when its backdrop dismisses.
    pub fn click_backdrop(&mut self, root: NodeId) -> bool {
        let dismissible = self
            .states
            .get(&root)
            .is_some_and(|(state, cfg)| {
                *state == RootState::Open && cfg.backdrop == Backdrop::Dismiss
            });
        if dismissible {
            self.begin_hide(root);
        }
        dismissible
    }

    /// Escape key. Hides the dialog only when keyboard dismissal is on.
    pub fn press_escape(&mut self, root: NodeId) -> bool {
        let dismissible = self
            .states
            .get(&root)
            .is_some_and(|(state, cfg)| *state == RootState::Open && cfg.keyboard);
        if dismissible {
            self.begin_hide(root);
        }
        dismissible
    }

    /// Whether `root` is currently fully shown.
    #[must_use]
    pub fn is_open(&self, root: NodeId) -> bool {
        self.state(root) == Some(RootState::Open)
    }

    /// Whether the widget still holds state for `root`.
    #[must_use]
    pub fn is_tracking(&self, root: NodeId) -> bool {
        self.states.contains_key(&root)
    }

    /// The config `root` was opened with.
    #[must_use]
    pub fn config(&self, root: NodeId) -> Option<ModalConfig> {
        self.states.get(&root).map(|(_, cfg)| *cfg)
    }

    /// Every request received, in order.
    #[must_use]
    pub fn history(&self) -> &[ModalCall] {
        &self.history
    }

    /// Number of `close` requests received for `root`.
    #[must_use]
    pub fn close_requests(&self, root: NodeId) -> usize {
        self.history
            .iter()
            .filter(|call| **call == ModalCall::Close(root))
            .count()
    }

    /// Notifications not yet polled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl ModalWidget for ScriptedModal {
    fn open(&mut self, root: NodeId, config: &ModalConfig) {
        self.history.push(ModalCall::Open(root, *config));
        self.states.insert(root, (RootState::Opening, *config));
        if config.show && self.transitions == Transitions::Immediate {
            self.complete(root);
        }
    }

    fn close(&mut self, root: NodeId) {
        self.history.push(ModalCall::Close(root));
        if self.state(root) == Some(RootState::Open) {
            self.begin_hide(root);
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(%root, "close ignored: dialog not shown");
        }
    }

    fn poll_notification(&mut self) -> Option<ModalNotification> {
        self.queue.pop_front()
    }

    fn release(&mut self, root: NodeId) {
        self.history.push(ModalCall::Release(root));
        self.states.remove(&root);
        self.queue.retain(|n| n.root != root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain(modal: &mut ScriptedModal) -> Vec<ModalPhase> {
        std::iter::from_fn(|| modal.poll_notification())
            .map(|n| n.phase)
            .collect()
    }

    #[test]
    fn immediate_transitions() {
        let mut modal = ScriptedModal::new();
        let root = NodeId::from_raw(1);
        modal.open(root, &ModalConfig::default());
        assert_eq!(drain(&mut modal), vec![ModalPhase::Shown]);
        modal.close(root);
        assert_eq!(
            drain(&mut modal),
            vec![ModalPhase::Hiding, ModalPhase::Hidden]
        );
        modal.close(root);
        assert!(drain(&mut modal).is_empty());
        assert_eq!(modal.close_requests(root), 2);
    }

    #[test]
    fn manual_close_before_shown_is_ignored() {
        let mut modal = ScriptedModal::manual();
        let root = NodeId::from_raw(3);
        modal.open(root, &ModalConfig::default());
        modal.close(root);
        assert_eq!(modal.pending(), 0);
        assert!(modal.complete(root));
        assert_eq!(drain(&mut modal), vec![ModalPhase::Shown]);
        modal.close(root);
        assert_eq!(drain(&mut modal), vec![ModalPhase::Hiding]);
        assert!(modal.complete(root));
        assert_eq!(drain(&mut modal), vec![ModalPhase::Hidden]);
        assert!(!modal.complete(root));
    }

    #[test]
    fn backdrop_and_escape_respect_config() {
        let mut modal = ScriptedModal::new();
        let fixed = NodeId::from_raw(1);
        let loose = NodeId::from_raw(2);
        modal.open(fixed, &ModalConfig::default());
        modal.open(
            loose,
            &ModalConfig {
                backdrop: Backdrop::Dismiss,
                ..ModalConfig::default()
            },
        );
        drain(&mut modal);
        assert!(!modal.click_backdrop(fixed));
        assert!(!modal.press_escape(fixed));
        assert!(modal.click_backdrop(loose));
        assert_eq!(
            drain(&mut modal),
            vec![ModalPhase::Hiding, ModalPhase::Hidden]
        );
    }

    #[test]
    fn release_forgets_root() {
        let mut modal = ScriptedModal::new();
        let root = NodeId::from_raw(9);
        modal.open(root, &ModalConfig::default());
        modal.release(root);
        assert!(!modal.is_tracking(root));
        assert_eq!(modal.pending(), 0);
        assert_eq!(modal.history().last(), Some(&ModalCall::Release(root)));
    }

    proptest! {
        #[test]
        fn hidden_reported_at_most_once(ops in proptest::collection::vec(0u8..4, 0..24)) {
            let mut modal = ScriptedModal::manual();
            let root = NodeId::from_raw(1);
            modal.open(root, &ModalConfig::default());
            let mut seen = Vec::new();
            for op in ops {
                match op {
                    0 => { modal.complete(root); }
                    1 => modal.close(root),
                    2 => { modal.click_backdrop(root); }
                    _ => { modal.press_escape(root); }
                }
                seen.extend(drain(&mut modal));
            }
            let hidden = seen.iter().filter(|p| **p == ModalPhase::Hidden).count();
            prop_assert!(hidden <= 1);
            if let Some(pos) = seen.iter().position(|p| *p == ModalPhase::Hidden) {
                prop_assert!(seen[..pos].contains(&ModalPhase::Shown));
                prop_assert!(seen[..pos].contains(&ModalPhase::Hiding));
            }
        }
    }
}
