#![forbid(unsafe_code)]

//! Variant form controls.
//!
//! [`render`] adds the control a dialog kind needs to the body of a placed
//! [`DialogFrame`] and returns a [`Control`] describing it. The lifecycle
//! later asks the control for its focus target and, once the dialog has
//! hidden, for its value.
//!
//! # Value extraction
//!
//! | control | value |
//! |---|---|
//! | text / textarea | the raw text, `None` when empty |
//! | email | trimmed text, `None` when empty |
//! | number | trimmed text parsed as a finite `f64`, `None` otherwise |
//! | select | `value` of the selected option; the placeholder has none |
//! | checkbox | checked keys in display order, `None` when none checked |
//! | radio | key of the checked option, `None` when none checked |

pub mod attrs;
pub mod choice;
pub mod text;

pub use text::{Counter, CounterState};

use popup_core::{DialogSettings, DialogValue, Theme};
use popup_dom::{Dom, NodeId};

use crate::builder::DialogFrame;
use crate::kind::{DialogKind, InputKind};

/// Marker class on text inputs and textareas.
pub const INPUT_MARKER: &str = "popup-input";
/// Marker class on the select element.
pub const SELECT_MARKER: &str = "popup-select";
/// Marker class on checkbox inputs.
pub const CHECK_MARKER: &str = "popup-check";
/// Marker class on radio inputs.
pub const RADIO_MARKER: &str = "popup-radio";
/// Marker class on the character counter.
pub const COUNTER_MARKER: &str = "popup-counter";

/// One row of a checkbox or radio list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub key: String,
    pub row: NodeId,
    pub input: NodeId,
    pub label: NodeId,
}

/// The interactive part of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Alert and confirm carry no control.
    None,
    Input {
        kind: InputKind,
        node: NodeId,
        counter: Option<Counter>,
    },
    Select {
        node: NodeId,
        placeholder: Option<NodeId>,
        options: Vec<NodeId>,
    },
    Checks {
        rows: Vec<Toggle>,
    },
    Radios {
        group: String,
        rows: Vec<Toggle>,
    },
}

/// Render the control for `kind` into `frame.body`.
pub fn render<D: Dom>(
    dom: &mut D,
    theme: &Theme,
    frame: &DialogFrame,
    settings: &DialogSettings,
    kind: DialogKind,
) -> Control {
    match kind {
        DialogKind::Alert | DialogKind::Confirm => Control::None,
        DialogKind::Input(input) => text::render_input(dom, theme, frame.body, settings, input),
        DialogKind::Select => choice::render_select(dom, theme, frame.body, settings),
        DialogKind::Checkbox => choice::render_checks(dom, theme, frame.body, settings),
        DialogKind::Radio => choice::render_radios(dom, theme, frame.body, settings),
    }
}

impl Control {
    /// The node focused once the dialog is shown.
    #[must_use]
    pub fn focus_target(&self) -> Option<NodeId> {
        match self {
            Self::Input { node, .. } | Self::Select { node, .. } => Some(*node),
            Self::None | Self::Checks { .. } | Self::Radios { .. } => None,
        }
    }

    /// The character counter, if the control has one.
    #[must_use]
    pub fn counter(&self) -> Option<&Counter> {
        match self {
            Self::Input { counter, .. } => counter.as_ref(),
            _ => None,
        }
    }

    /// Recompute the counter badge. Returns the new state, if a counter
    /// exists.
    pub fn refresh_counter<D: Dom>(&mut self, dom: &mut D, theme: &Theme) -> Option<CounterState> {
        match self {
            Self::Input {
                node,
                counter: Some(counter),
                ..
            } => Some(counter.refresh(dom, theme, *node)),
            _ => None,
        }
    }

    /// Toggle rows for checkbox and radio controls.
    #[must_use]
    pub fn rows(&self) -> &[Toggle] {
        match self {
            Self::Checks { rows } | Self::Radios { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Read the control's current value.
    #[must_use]
    pub fn extract<D: Dom>(&self, dom: &D) -> Option<DialogValue> {
        match self {
            Self::None => None,
            Self::Input { kind, node, .. } => extract_input(*kind, &dom.value(*node)),
            Self::Select { options, .. } => options
                .iter()
                .find(|option| dom.is_selected(**option))
                .and_then(|option| dom.attribute(*option, "value"))
                .filter(|value| !value.is_empty())
                .map(DialogValue::Text),
            Self::Checks { rows } => {
                let keys: Vec<String> = rows
                    .iter()
                    .filter(|row| dom.is_checked(row.input))
                    .filter_map(|row| dom.attribute(row.input, "value"))
                    .collect();
                (!keys.is_empty()).then_some(DialogValue::Keys(keys))
            }
            Self::Radios { rows, .. } => rows
                .iter()
                .find(|row| dom.is_checked(row.input))
                .and_then(|row| dom.attribute(row.input, "value"))
                .filter(|value| !value.is_empty())
                .map(DialogValue::Text),
        }
    }
}

fn extract_input(kind: InputKind, raw: &str) -> Option<DialogValue> {
    match kind {
        InputKind::Text | InputKind::Textarea => {
            (!raw.is_empty()).then(|| DialogValue::Text(raw.to_owned()))
        }
        InputKind::Email => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| DialogValue::Text(trimmed.to_owned()))
        }
        InputKind::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(DialogValue::Number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_are_not_trimmed() {
        assert_eq!(
            extract_input(InputKind::Text, "  spaced  "),
            Some(DialogValue::Text("  spaced  ".into()))
        );
        assert_eq!(extract_input(InputKind::Textarea, ""), None);
    }

    #[test]
    fn email_is_trimmed() {
        assert_eq!(
            extract_input(InputKind::Email, " a@b.c \n"),
            Some(DialogValue::Text("a@b.c".into()))
        );
        assert_eq!(extract_input(InputKind::Email, "   "), None);
    }

    #[test]
    fn number_parses_finite_values_only() {
        assert_eq!(
            extract_input(InputKind::Number, " 42.5 "),
            Some(DialogValue::Number(42.5))
        );
        assert_eq!(
            extract_input(InputKind::Number, "-3"),
            Some(DialogValue::Number(-3.0))
        );
        assert_eq!(extract_input(InputKind::Number, ""), None);
        assert_eq!(extract_input(InputKind::Number, "abc"), None);
        assert_eq!(extract_input(InputKind::Number, "inf"), None);
        assert_eq!(extract_input(InputKind::Number, "NaN"), None);
    }

    #[test]
    fn none_control_has_no_value_or_focus() {
        let dom = popup_dom::MemoryDom::new();
        assert_eq!(Control::None.extract(&dom), None);
        assert_eq!(Control::None.focus_target(), None);
        assert!(Control::None.rows().is_empty());
    }
}
