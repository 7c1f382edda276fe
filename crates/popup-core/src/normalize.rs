#![forbid(unsafe_code)]

//! Required-key validation and default filling.
//!
//! [`normalize`] turns a sparse [`DialogOptions`] bag into a fully populated
//! [`NormalizedOptions`]: settings the builder and renderers can read without
//! further fallbacks, plus the two continuations.
//!
//! # Invariants
//!
//! - Required keys are checked against the caller's options *before* any
//!   default is merged, so a default can never satisfy a required key.
//! - The first missing key (in the order of the `required` slice) is the one
//!   reported.
//! - The merge is shallow: a provided `attrs` map replaces the default map
//!   whole.
//! - Normalization is pure; it touches no document or global state.

use crate::choices::ChoiceMap;
use crate::error::ValidationError;
use crate::options::{AttrMap, Backdrop, CancelCallback, DialogOptions, OkCallback, OptionKey};

/// Required keys for the acknowledgement dialog.
pub const ALERT_REQUIRED: &[OptionKey] = &[OptionKey::Title, OptionKey::Body];

/// Required keys for confirm and the value prompts.
pub const INPUT_REQUIRED: &[OptionKey] =
    &[OptionKey::Title, OptionKey::Body, OptionKey::OkCallback];

/// Required keys for select, checkbox and radio.
pub const CHOICE_REQUIRED: &[OptionKey] = &[
    OptionKey::Title,
    OptionKey::Body,
    OptionKey::Options,
    OptionKey::OkCallback,
];

const DEFAULT_ROWS: u32 = 4;

/// Settings handed to the modal widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalSettings {
    pub backdrop: Backdrop,
    pub keyboard: bool,
    pub focus: bool,
    /// Whether the header carries a close control.
    pub close: bool,
}

/// Fully populated, callback-free dialog settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogSettings {
    pub title: String,
    pub body: String,
    pub ok_label: Option<String>,
    pub ok_class: String,
    pub cancel_label: Option<String>,
    pub cancel_class: String,
    pub modal: ModalSettings,
    pub dialog_class: String,
    pub attrs: AttrMap,
    pub val: Option<String>,
    pub vals: Vec<String>,
    pub placeholder: Option<String>,
    pub max_length: Option<u32>,
    pub rows: u32,
    pub choices: ChoiceMap,
}

/// The two continuations of a dialog. Exactly one of them is consumed.
pub struct Callbacks {
    pub ok: OkCallback,
    pub cancel: CancelCallback,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            ok: Box::new(|_| {}),
            cancel: Box::new(|| {}),
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Result of [`normalize`].
#[derive(Debug)]
pub struct NormalizedOptions {
    pub settings: DialogSettings,
    pub callbacks: Callbacks,
}

/// Validate `provided` against `required`, then fill unset keys from
/// `defaults`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingKey`] for the first required key that
/// `provided` leaves unset. Title and body are needed to build any dialog,
/// so they are reported the same way even when `required` omits them.
pub fn normalize(
    mut provided: DialogOptions,
    required: &[OptionKey],
    defaults: DialogOptions,
) -> Result<NormalizedOptions, ValidationError> {
    if let Some(missing) = required.iter().copied().find(|key| !provided.is_set(*key)) {
        #[cfg(feature = "tracing")]
        tracing::debug!(key = missing.as_str(), "dialog options rejected");
        return Err(ValidationError::MissingKey(missing));
    }

    provided.fill_from(defaults);

    let title = provided
        .title
        .ok_or(ValidationError::MissingKey(OptionKey::Title))?;
    let body = provided
        .body
        .ok_or(ValidationError::MissingKey(OptionKey::Body))?;

    let fallback = Callbacks::default();
    let callbacks = Callbacks {
        ok: provided.ok_callback.unwrap_or(fallback.ok),
        cancel: provided.cancel_callback.unwrap_or(fallback.cancel),
    };

    let settings = DialogSettings {
        title,
        body,
        ok_label: provided.ok,
        ok_class: provided.ok_class.unwrap_or_default(),
        cancel_label: provided.cancel,
        cancel_class: provided.cancel_class.unwrap_or_default(),
        modal: ModalSettings {
            backdrop: provided.backdrop.unwrap_or_default(),
            keyboard: provided.keyboard.unwrap_or(false),
            focus: provided.focus.unwrap_or(true),
            close: provided.close.unwrap_or(false),
        },
        dialog_class: provided.dialog_class.unwrap_or_default(),
        attrs: provided.attrs.unwrap_or_default(),
        val: provided.val,
        vals: provided.vals.unwrap_or_default(),
        placeholder: provided.placeholder,
        max_length: provided.max_length,
        rows: provided.rows.unwrap_or(DEFAULT_ROWS),
        choices: provided
            .options
            .map(|choices| choices.normalize())
            .unwrap_or_default(),
    };

    Ok(NormalizedOptions {
        settings,
        callbacks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::Choices;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn complete() -> DialogOptions {
        DialogOptions::new()
            .title("T")
            .body("B")
            .options(vec!["a", "b"])
            .on_ok(|_| {})
    }

    #[test]
    fn reports_first_missing_key() {
        let err = normalize(
            DialogOptions::new().body("B"),
            CHOICE_REQUIRED,
            DialogOptions::single_choice_defaults(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingKey(OptionKey::Title));
    }

    #[test]
    fn defaults_never_satisfy_required_keys() {
        // Alert defaults carry a no-op ok callback; requiring it still fails.
        let err = normalize(
            DialogOptions::new().title("T").body("B"),
            INPUT_REQUIRED,
            DialogOptions::alert_defaults(),
        )
        .unwrap_err();
        assert_eq!(err.key(), OptionKey::OkCallback);
    }

    #[test]
    fn fills_defaults() {
        let normalized = normalize(
            DialogOptions::new().title("T").body("B").on_ok(|_| {}),
            INPUT_REQUIRED,
            DialogOptions::input_defaults(),
        )
        .unwrap();
        let s = normalized.settings;
        assert_eq!(s.ok_label.as_deref(), Some("OK"));
        assert_eq!(s.ok_class, "primary");
        assert_eq!(s.cancel_label.as_deref(), Some("Cancel"));
        assert_eq!(s.cancel_class, "light");
        assert_eq!(s.modal.backdrop, Backdrop::Static);
        assert!(s.modal.focus);
        assert!(s.modal.close);
        assert_eq!(s.rows, 4);
        assert_eq!(s.val, None);
        assert!(s.attrs.is_empty());
    }

    #[test]
    fn alert_has_no_cancel_label() {
        let normalized = normalize(
            DialogOptions::new().title("T").body("B"),
            ALERT_REQUIRED,
            DialogOptions::alert_defaults(),
        )
        .unwrap();
        assert_eq!(normalized.settings.cancel_label, None);
        assert_eq!(normalized.settings.ok_class, "secondary");
        assert!(!normalized.settings.modal.close);
    }

    #[test]
    fn provided_values_win() {
        let normalized = normalize(
            complete()
                .ok_label("Pick")
                .backdrop(Backdrop::Dismiss)
                .close_control(false)
                .rows(9),
            CHOICE_REQUIRED,
            DialogOptions::single_choice_defaults(),
        )
        .unwrap();
        let s = normalized.settings;
        assert_eq!(s.ok_label.as_deref(), Some("Pick"));
        assert_eq!(s.modal.backdrop, Backdrop::Dismiss);
        assert!(!s.modal.close);
        assert_eq!(s.rows, 9);
        let keys: Vec<_> = s.choices.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn callbacks_are_carried_through() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let normalized = normalize(
            complete().on_cancel(move || h.set(h.get() + 1)),
            CHOICE_REQUIRED,
            DialogOptions::single_choice_defaults(),
        )
        .unwrap();
        (normalized.callbacks.cancel)();
        assert_eq!(hits.get(), 1);
    }

    proptest! {
        #[test]
        fn omitting_any_required_key_is_reported(idx in 0usize..4) {
            let missing = CHOICE_REQUIRED[idx];
            let err = normalize(
                complete().without(missing),
                CHOICE_REQUIRED,
                DialogOptions::single_choice_defaults(),
            )
            .unwrap_err();
            prop_assert_eq!(err.key(), missing);
        }

        #[test]
        fn list_options_match_identity_map(items in proptest::collection::vec("[a-z]{1,4}", 0..8)) {
            let from_list = normalize(
                complete().options(items.clone()),
                CHOICE_REQUIRED,
                DialogOptions::single_choice_defaults(),
            )
            .unwrap();
            let pairs = Choices::Map(items.iter().map(|s| (s.clone(), s.clone())).collect());
            let from_map = normalize(
                complete().options(pairs),
                CHOICE_REQUIRED,
                DialogOptions::single_choice_defaults(),
            )
            .unwrap();
            prop_assert_eq!(from_list.settings.choices, from_map.settings.choices);
        }
    }
}
