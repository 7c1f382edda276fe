#![forbid(unsafe_code)]

//! Caller-facing dialog settings.
//!
//! [`DialogOptions`] is a sparse settings bag: every field is optional until
//! [`normalize`](crate::normalize) checks the variant's required keys and
//! fills the rest from the variant's defaults. Keys are addressed by
//! [`OptionKey`], whose string form is the dotted name callers see in error
//! messages (`ok.callback`, `modal.backdrop`, ...).
//!
//! # Example
//!
//! ```
//! use popup_core::{DialogOptions, OptionKey};
//!
//! let opts = DialogOptions::new()
//!     .title("Rename")
//!     .body("New file name:")
//!     .max_length(32)
//!     .on_ok(|value| println!("{value:?}"));
//!
//! assert!(opts.is_set(OptionKey::OkCallback));
//! assert!(!opts.is_set(OptionKey::Placeholder));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::choices::Choices;
use crate::value::DialogValue;

/// Confirm continuation. Receives the extracted value (`None` when empty).
pub type OkCallback = Box<dyn FnOnce(Option<DialogValue>)>;

/// Cancel continuation.
pub type CancelCallback = Box<dyn FnOnce()>;

/// Every settable option, by its dotted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Title,
    Body,
    Ok,
    OkClass,
    OkCallback,
    Cancel,
    CancelClass,
    CancelCallback,
    ModalBackdrop,
    ModalKeyboard,
    ModalFocus,
    ModalClose,
    DialogClass,
    Attrs,
    Val,
    Vals,
    Placeholder,
    MaxLength,
    Rows,
    Options,
}

impl OptionKey {
    /// All keys, in declaration order.
    pub const ALL: [OptionKey; 20] = [
        Self::Title,
        Self::Body,
        Self::Ok,
        Self::OkClass,
        Self::OkCallback,
        Self::Cancel,
        Self::CancelClass,
        Self::CancelCallback,
        Self::ModalBackdrop,
        Self::ModalKeyboard,
        Self::ModalFocus,
        Self::ModalClose,
        Self::DialogClass,
        Self::Attrs,
        Self::Val,
        Self::Vals,
        Self::Placeholder,
        Self::MaxLength,
        Self::Rows,
        Self::Options,
    ];

    /// The dotted option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
            Self::Ok => "ok",
            Self::OkClass => "ok.class",
            Self::OkCallback => "ok.callback",
            Self::Cancel => "cancel",
            Self::CancelClass => "cancel.class",
            Self::CancelCallback => "cancel.callback",
            Self::ModalBackdrop => "modal.backdrop",
            Self::ModalKeyboard => "modal.keyboard",
            Self::ModalFocus => "modal.focus",
            Self::ModalClose => "modal.close",
            Self::DialogClass => "modal-dialog.class",
            Self::Attrs => "attrs",
            Self::Val => "val",
            Self::Vals => "vals",
            Self::Placeholder => "placeholder",
            Self::MaxLength => "maxLength",
            Self::Rows => "rows",
            Self::Options => "options",
        }
    }

    /// Look a key up by its dotted name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether clicking outside the dialog dismisses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Backdrop {
    /// Backdrop shown; clicking it does nothing.
    #[default]
    Static,
    /// Backdrop shown; clicking it dismisses the dialog.
    #[cfg_attr(feature = "config", serde(rename = "true"))]
    Dismiss,
    /// No backdrop.
    #[cfg_attr(feature = "config", serde(rename = "false"))]
    Off,
}

impl Backdrop {
    /// The widget-level spelling (`static`, `true`, `false`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dismiss => "true",
            Self::Off => "false",
        }
    }
}

impl fmt::Display for Backdrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backdrop {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "true" => Ok(Self::Dismiss),
            "false" => Ok(Self::Off),
            other => Err(format!("invalid backdrop mode: {other}")),
        }
    }
}

impl From<bool> for Backdrop {
    fn from(dismiss: bool) -> Self {
        if dismiss { Self::Dismiss } else { Self::Off }
    }
}

/// Ordered attribute map applied verbatim to a dialog's control.
///
/// Insertion order is preserved; re-inserting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
}

impl AttrMap {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Sparse dialog settings, prior to normalization.
///
/// Unset fields are `None`; there is no separate "explicitly null" state, so
/// an unset required key and a null one fail validation the same way.
#[derive(Default)]
pub struct DialogOptions {
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) ok: Option<String>,
    pub(crate) ok_class: Option<String>,
    pub(crate) ok_callback: Option<OkCallback>,
    pub(crate) cancel: Option<String>,
    pub(crate) cancel_class: Option<String>,
    pub(crate) cancel_callback: Option<CancelCallback>,
    pub(crate) backdrop: Option<Backdrop>,
    pub(crate) keyboard: Option<bool>,
    pub(crate) focus: Option<bool>,
    pub(crate) close: Option<bool>,
    pub(crate) dialog_class: Option<String>,
    pub(crate) attrs: Option<AttrMap>,
    pub(crate) val: Option<String>,
    pub(crate) vals: Option<Vec<String>>,
    pub(crate) placeholder: Option<String>,
    pub(crate) max_length: Option<u32>,
    pub(crate) rows: Option<u32>,
    pub(crate) options: Option<Choices>,
}

impl DialogOptions {
    /// Create an empty settings bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dialog title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Dialog body: plain text, or markup inserted verbatim.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Confirm button label.
    #[must_use]
    pub fn ok_label(mut self, label: impl Into<String>) -> Self {
        self.ok = Some(label.into());
        self
    }

    /// Confirm button style tag (`primary`, `danger`, ...).
    #[must_use]
    pub fn ok_class(mut self, class: impl Into<String>) -> Self {
        self.ok_class = Some(class.into());
        self
    }

    /// Confirm continuation.
    #[must_use]
    pub fn on_ok(mut self, callback: impl FnOnce(Option<DialogValue>) + 'static) -> Self {
        self.ok_callback = Some(Box::new(callback));
        self
    }

    /// Cancel button label.
    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel = Some(label.into());
        self
    }

    /// Cancel button style tag.
    #[must_use]
    pub fn cancel_class(mut self, class: impl Into<String>) -> Self {
        self.cancel_class = Some(class.into());
        self
    }

    /// Cancel continuation.
    #[must_use]
    pub fn on_cancel(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.cancel_callback = Some(Box::new(callback));
        self
    }

    /// Backdrop behavior.
    #[must_use]
    pub fn backdrop(mut self, backdrop: Backdrop) -> Self {
        self.backdrop = Some(backdrop);
        self
    }

    /// Escape-to-dismiss. Every variant forces this off; the setting is kept
    /// so that caller input round-trips through normalization.
    #[must_use]
    pub fn keyboard(mut self, keyboard: bool) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Whether the widget focuses the dialog (and the dialog its control)
    /// once shown.
    #[must_use]
    pub fn focus(mut self, focus: bool) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Whether the header carries a close ("×") control.
    #[must_use]
    pub fn close_control(mut self, close: bool) -> Self {
        self.close = Some(close);
        self
    }

    /// Extra class for the dialog frame (`modal-lg`, ...).
    #[must_use]
    pub fn dialog_class(mut self, class: impl Into<String>) -> Self {
        self.dialog_class = Some(class.into());
        self
    }

    /// Replace the extra attribute map.
    #[must_use]
    pub fn attrs(mut self, attrs: AttrMap) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Add a single extra attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .get_or_insert_with(AttrMap::new)
            .insert(name, value);
        self
    }

    /// Pre-filled / pre-selected value.
    #[must_use]
    pub fn val(mut self, val: impl Into<String>) -> Self {
        self.val = Some(val.into());
        self
    }

    /// Pre-checked keys (checkbox).
    #[must_use]
    pub fn vals<I, S>(mut self, vals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vals = Some(vals.into_iter().map(Into::into).collect());
        self
    }

    /// Placeholder text (inputs) or placeholder entry (select).
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Character limit for text inputs.
    #[must_use]
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Visible rows for the multi-line prompt.
    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Choices for select, checkbox and radio dialogs.
    #[must_use]
    pub fn options(mut self, options: impl Into<Choices>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Remove a key, returning the bag. Used to un-set defaults or to build
    /// deliberately incomplete options.
    #[must_use]
    pub fn without(mut self, key: OptionKey) -> Self {
        match key {
            OptionKey::Title => self.title = None,
            OptionKey::Body => self.body = None,
            OptionKey::Ok => self.ok = None,
            OptionKey::OkClass => self.ok_class = None,
            OptionKey::OkCallback => self.ok_callback = None,
            OptionKey::Cancel => self.cancel = None,
            OptionKey::CancelClass => self.cancel_class = None,
            OptionKey::CancelCallback => self.cancel_callback = None,
            OptionKey::ModalBackdrop => self.backdrop = None,
            OptionKey::ModalKeyboard => self.keyboard = None,
            OptionKey::ModalFocus => self.focus = None,
            OptionKey::ModalClose => self.close = None,
            OptionKey::DialogClass => self.dialog_class = None,
            OptionKey::Attrs => self.attrs = None,
            OptionKey::Val => self.val = None,
            OptionKey::Vals => self.vals = None,
            OptionKey::Placeholder => self.placeholder = None,
            OptionKey::MaxLength => self.max_length = None,
            OptionKey::Rows => self.rows = None,
            OptionKey::Options => self.options = None,
        }
        self
    }

    /// Whether a key currently holds a value.
    #[must_use]
    pub fn is_set(&self, key: OptionKey) -> bool {
        match key {
            OptionKey::Title => self.title.is_some(),
            OptionKey::Body => self.body.is_some(),
            OptionKey::Ok => self.ok.is_some(),
            OptionKey::OkClass => self.ok_class.is_some(),
            OptionKey::OkCallback => self.ok_callback.is_some(),
            OptionKey::Cancel => self.cancel.is_some(),
            OptionKey::CancelClass => self.cancel_class.is_some(),
            OptionKey::CancelCallback => self.cancel_callback.is_some(),
            OptionKey::ModalBackdrop => self.backdrop.is_some(),
            OptionKey::ModalKeyboard => self.keyboard.is_some(),
            OptionKey::ModalFocus => self.focus.is_some(),
            OptionKey::ModalClose => self.close.is_some(),
            OptionKey::DialogClass => self.dialog_class.is_some(),
            OptionKey::Attrs => self.attrs.is_some(),
            OptionKey::Val => self.val.is_some(),
            OptionKey::Vals => self.vals.is_some(),
            OptionKey::Placeholder => self.placeholder.is_some(),
            OptionKey::MaxLength => self.max_length.is_some(),
            OptionKey::Rows => self.rows.is_some(),
            OptionKey::Options => self.options.is_some(),
        }
    }

    /// Keys that currently hold a value, in [`OptionKey::ALL`] order.
    pub fn set_keys(&self) -> impl Iterator<Item = OptionKey> + '_ {
        OptionKey::ALL.into_iter().filter(|key| self.is_set(*key))
    }

    /// Copy every key of `defaults` that is unset here. Shallow: a set
    /// `attrs` map is kept whole, never merged entry by entry.
    pub fn fill_from(&mut self, defaults: DialogOptions) {
        macro_rules! fill {
            ($($field:ident),* $(,)?) => {
                $(
                    if self.$field.is_none() {
                        self.$field = defaults.$field;
                    }
                )*
            };
        }
        fill!(
            title,
            body,
            ok,
            ok_class,
            ok_callback,
            cancel,
            cancel_class,
            cancel_callback,
            backdrop,
            keyboard,
            focus,
            close,
            dialog_class,
            attrs,
            val,
            vals,
            placeholder,
            max_length,
            rows,
            options,
        );
    }

    // --- Variant defaults ---

    /// Defaults for the single-button acknowledgement dialog.
    #[must_use]
    pub fn alert_defaults() -> Self {
        Self {
            ok: Some("OK".into()),
            ok_class: Some("secondary".into()),
            ok_callback: Some(Box::new(|_| {})),
            backdrop: Some(Backdrop::Static),
            keyboard: Some(false),
            focus: Some(true),
            close: Some(false),
            dialog_class: Some(String::new()),
            ..Self::default()
        }
    }

    /// Defaults for the confirm/cancel dialog.
    #[must_use]
    pub fn confirm_defaults() -> Self {
        Self {
            ok: Some("OK".into()),
            ok_class: Some("primary".into()),
            cancel: Some("Cancel".into()),
            cancel_class: Some("light".into()),
            cancel_callback: Some(Box::new(|| {})),
            backdrop: Some(Backdrop::Static),
            keyboard: Some(false),
            focus: Some(true),
            close: Some(false),
            dialog_class: Some(String::new()),
            ..Self::default()
        }
    }

    /// Defaults for the value prompts (text, multi-line, email, number).
    #[must_use]
    pub fn input_defaults() -> Self {
        Self {
            rows: Some(4),
            ..Self::single_choice_defaults()
        }
    }

    /// Defaults for single-value choice dialogs (select, radio).
    #[must_use]
    pub fn single_choice_defaults() -> Self {
        Self {
            attrs: Some(AttrMap::new()),
            ok: Some("OK".into()),
            ok_class: Some("primary".into()),
            cancel: Some("Cancel".into()),
            cancel_class: Some("light".into()),
            cancel_callback: Some(Box::new(|| {})),
            backdrop: Some(Backdrop::Static),
            focus: Some(true),
            close: Some(true),
            dialog_class: Some(String::new()),
            ..Self::default()
        }
    }

    /// Defaults for the multi-value choice dialog (checkbox).
    #[must_use]
    pub fn multi_choice_defaults() -> Self {
        Self {
            vals: Some(Vec::new()),
            ..Self::single_choice_defaults()
        }
    }
}

impl fmt::Debug for DialogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogOptions")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("ok", &self.ok)
            .field("ok_class", &self.ok_class)
            .field("ok_callback", &self.ok_callback.as_ref().map(|_| "<fn>"))
            .field("cancel", &self.cancel)
            .field("cancel_class", &self.cancel_class)
            .field(
                "cancel_callback",
                &self.cancel_callback.as_ref().map(|_| "<fn>"),
            )
            .field("backdrop", &self.backdrop)
            .field("keyboard", &self.keyboard)
            .field("focus", &self.focus)
            .field("close", &self.close)
            .field("dialog_class", &self.dialog_class)
            .field("attrs", &self.attrs)
            .field("val", &self.val)
            .field("vals", &self.vals)
            .field("placeholder", &self.placeholder)
            .field("max_length", &self.max_length)
            .field("rows", &self.rows)
            .field("options", &self.options)
            .finish()
    }
}
