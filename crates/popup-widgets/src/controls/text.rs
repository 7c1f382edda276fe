#![forbid(unsafe_code)]

//! Single-line and multi-line prompts, with the optional length counter.

use popup_core::{DialogSettings, Theme};
use popup_dom::{Dom, NodeId};

use super::attrs;
use super::{COUNTER_MARKER, Control, INPUT_MARKER};
use crate::kind::InputKind;

/// Counter badge coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    Below,
    At,
    Above,
}

impl CounterState {
    /// Classify a length against a limit.
    #[must_use]
    pub const fn classify(len: usize, max: u32) -> Self {
        let max = max as usize;
        if len > max {
            Self::Above
        } else if len == max {
            Self::At
        } else {
            Self::Below
        }
    }

    fn class(self, theme: &Theme) -> &str {
        match self {
            Self::Below => &theme.counter.below,
            Self::At => &theme.counter.at,
            Self::Above => &theme.counter.above,
        }
    }
}

/// The `"n / max"` badge following a length-limited input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub node: NodeId,
    pub max: u32,
    state: CounterState,
}

impl Counter {
    #[must_use]
    pub const fn state(&self) -> CounterState {
        self.state
    }

    /// Re-read the input's length and update the badge text and color.
    ///
    /// Length is counted in UTF-16 code units, as the browser counts it for
    /// `maxlength`.
    pub fn refresh<D: Dom>(&mut self, dom: &mut D, theme: &Theme, input: NodeId) -> CounterState {
        let len = dom.value(input).encode_utf16().count();
        let next = CounterState::classify(len, self.max);
        dom.set_text(self.node, &format!("{len} / {}", self.max));
        for state in [CounterState::Below, CounterState::At, CounterState::Above] {
            if state != next {
                for class in state.class(theme).split_whitespace() {
                    dom.remove_class(self.node, class);
                }
            }
        }
        dom.add_classes(self.node, next.class(theme));
        self.state = next;
        next
    }
}

/// Render an `<input>` (or `<textarea>`) into `body`.
pub fn render_input<D: Dom>(
    dom: &mut D,
    theme: &Theme,
    body: NodeId,
    settings: &DialogSettings,
    kind: InputKind,
) -> Control {
    let node = match kind.input_type() {
        Some(input_type) => {
            let node = dom.create_element("input");
            dom.set_attribute(node, "type", input_type);
            node
        }
        None => {
            let node = dom.create_element("textarea");
            dom.set_attribute(node, "rows", &settings.rows.to_string());
            node
        }
    };
    dom.add_classes(node, &theme.input);
    dom.add_class(node, INPUT_MARKER);

    if let Some(val) = &settings.val {
        dom.set_value(node, val);
    }
    if let Some(placeholder) = &settings.placeholder {
        dom.set_attribute(node, "placeholder", placeholder);
    }

    let resolved = attrs::resolve(&settings.attrs, settings.max_length);
    resolved.apply_class(dom, node);
    resolved.apply_id(dom, node);
    resolved.apply_verbatim(dom, node);
    if let Some(max) = resolved.max_length {
        dom.set_attribute(node, "maxlength", &max.to_string());
    }

    dom.append_child(body, node);

    let counter = resolved.max_length.map(|max| {
        let badge = dom.create_element("span");
        dom.add_classes(badge, &theme.counter.base);
        dom.add_class(badge, COUNTER_MARKER);
        dom.insert_after(node, badge);
        let mut counter = Counter {
            node: badge,
            max,
            state: CounterState::Below,
        };
        counter.refresh(dom, theme, node);
        counter
    });

    Control::Input {
        kind,
        node,
        counter,
    }
}
