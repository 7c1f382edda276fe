#![forbid(unsafe_code)]

//! Select, checkbox and radio controls.

use popup_core::{DialogSettings, Theme, gen_id};
use popup_dom::{Dom, NodeId};

use super::attrs::{self, ResolvedAttrs};
use super::{CHECK_MARKER, Control, RADIO_MARKER, SELECT_MARKER, Toggle};

/// Prefix for generated toggle ids.
const TOGGLE_ID_PREFIX: &str = "popupCheck";
/// Prefix for generated radio group names.
const RADIO_GROUP_PREFIX: &str = "popupRadio";

/// Render a `<select>` into `body`.
///
/// A placeholder becomes a disabled, pre-selected first option without a
/// `value`. A `val` matching a key selects that option instead. Without
/// either, the first option is selected.
pub fn render_select<D: Dom>(
    dom: &mut D,
    theme: &Theme,
    body: NodeId,
    settings: &DialogSettings,
) -> Control {
    let select = dom.create_element("select");
    dom.add_classes(select, &theme.select);
    dom.add_class(select, SELECT_MARKER);

    let resolved = attrs::resolve(&settings.attrs, None);
    resolved.apply_class(dom, select);
    resolved.apply_id(dom, select);
    resolved.apply_verbatim(dom, select);

    let placeholder = settings.placeholder.as_deref().map(|text| {
        let option = dom.create_element("option");
        dom.append_markup(option, text);
        dom.append_child(select, option);
        dom.set_disabled(option, true);
        dom.set_selected(option, true);
        option
    });

    let mut options = Vec::with_capacity(settings.choices.len());
    let mut matched = false;
    for (key, label) in settings.choices.iter() {
        let option = dom.create_element("option");
        dom.set_attribute(option, "value", key);
        dom.append_markup(option, label);
        dom.append_child(select, option);
        if !matched && settings.val.as_deref() == Some(key) {
            dom.set_selected(option, true);
            matched = true;
        }
        options.push(option);
    }
    if placeholder.is_none()
        && !matched
        && let Some(first) = options.first()
    {
        dom.set_selected(*first, true);
    }

    dom.append_child(body, select);
    Control::Select {
        node: select,
        placeholder,
        options,
    }
}

/// One checkbox or radio row to render.
#[derive(Debug, Clone, Copy)]
struct RowSpec<'a> {
    input_type: &'a str,
    marker: &'a str,
    key: &'a str,
    label: &'a str,
}

impl<'a> RowSpec<'a> {
    fn checkbox(key: &'a str, label: &'a str) -> Self {
        Self {
            input_type: "checkbox",
            marker: CHECK_MARKER,
            key,
            label,
        }
    }

    fn radio(key: &'a str, label: &'a str) -> Self {
        Self {
            input_type: "radio",
            marker: RADIO_MARKER,
            key,
            label,
        }
    }
}

fn toggle_row<D: Dom>(
    dom: &mut D,
    theme: &Theme,
    body: NodeId,
    resolved: &ResolvedAttrs<'_>,
    spec: RowSpec<'_>,
) -> Toggle {
    let id = format!("{TOGGLE_ID_PREFIX}{}", gen_id());

    let row = dom.create_element("div");
    dom.add_classes(row, &theme.check_row);

    let input = dom.create_element("input");
    dom.add_classes(input, &theme.check_input);
    dom.add_class(input, spec.marker);
    dom.set_attribute(input, "type", spec.input_type);
    dom.set_attribute(input, "value", spec.key);
    dom.set_attribute(input, "id", &id);
    resolved.apply_class(dom, input);
    resolved.apply_verbatim(dom, input);

    let label = dom.create_element("label");
    dom.add_classes(label, &theme.check_label);
    dom.set_attribute(label, "for", &id);
    dom.append_markup(label, spec.label);

    dom.append_child(row, input);
    dom.append_child(row, label);
    dom.append_child(body, row);

    Toggle {
        key: spec.key.to_owned(),
        row,
        input,
        label,
    }
}

/// Render one independent checkbox per choice into `body`. Keys listed in
/// `vals` start checked.
pub fn render_checks<D: Dom>(
    dom: &mut D,
    theme: &Theme,
    body: NodeId,
    settings: &DialogSettings,
) -> Control {
    let resolved = attrs::resolve(&settings.attrs, None);
    let rows = settings
        .choices
        .iter()
        .map(|(key, label)| {
            let toggle = toggle_row(dom, theme, body, &resolved, RowSpec::checkbox(key, label));
            if settings.vals.iter().any(|v| v == key) {
                dom.set_checked(toggle.input, true);
            }
            toggle
        })
        .collect();
    Control::Checks { rows }
}

/// Render one radio per choice into `body`, sharing a generated group name.
///
/// The first option whose key equals `val` is checked; when `val` is unset
/// the first option is.
pub fn render_radios<D: Dom>(
    dom: &mut D,
    theme: &Theme,
    body: NodeId,
    settings: &DialogSettings,
) -> Control {
    let group = format!("{RADIO_GROUP_PREFIX}{}", gen_id());
    let resolved = attrs::resolve(&settings.attrs, None);
    let mut has_default = false;
    let rows = settings
        .choices
        .iter()
        .map(|(key, label)| {
            let toggle = toggle_row(dom, theme, body, &resolved, RowSpec::radio(key, label));
            dom.set_attribute(toggle.input, "name", &group);
            let eligible = settings.val.as_deref().is_none_or(|val| val == key);
            if eligible && !has_default {
                dom.set_checked(toggle.input, true);
                has_default = true;
            }
            toggle
        })
        .collect();
    Control::Radios { group, rows }
}
