#![forbid(unsafe_code)]

//! Dialog variants and their option contracts.

use popup_core::{
    ALERT_REQUIRED, CHOICE_REQUIRED, DialogOptions, DialogSettings, INPUT_REQUIRED, OptionKey,
};

/// Value prompt flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Textarea,
    Email,
    Number,
}

impl InputKind {
    /// The `type` attribute of the `<input>`; `None` for the multi-line
    /// prompt, which renders a `<textarea>`.
    #[must_use]
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Email => Some("email"),
            Self::Number => Some("number"),
            Self::Textarea => None,
        }
    }
}

/// Every dialog variant exposed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Alert,
    Confirm,
    Input(InputKind),
    Select,
    Checkbox,
    Radio,
}

impl DialogKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Confirm => "confirm",
            Self::Input(InputKind::Text) => "text",
            Self::Input(InputKind::Textarea) => "textarea",
            Self::Input(InputKind::Email) => "email",
            Self::Input(InputKind::Number) => "number",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
        }
    }

    /// Keys the caller must provide.
    #[must_use]
    pub const fn required_keys(self) -> &'static [OptionKey] {
        match self {
            Self::Alert => ALERT_REQUIRED,
            Self::Confirm | Self::Input(_) => INPUT_REQUIRED,
            Self::Select | Self::Checkbox | Self::Radio => CHOICE_REQUIRED,
        }
    }

    /// Defaults merged into the caller's options.
    #[must_use]
    pub fn defaults(self) -> DialogOptions {
        match self {
            Self::Alert => DialogOptions::alert_defaults(),
            Self::Confirm => DialogOptions::confirm_defaults(),
            Self::Input(_) => DialogOptions::input_defaults(),
            Self::Select | Self::Radio => DialogOptions::single_choice_defaults(),
            Self::Checkbox => DialogOptions::multi_choice_defaults(),
        }
    }

    /// Apply the settings each variant pins regardless of caller input.
    pub fn force(self, settings: &mut DialogSettings) {
        settings.modal.keyboard = false;
        match self {
            Self::Alert => {
                settings.cancel_label = None;
                settings.modal.close = false;
            }
            Self::Confirm => settings.modal.close = false,
            _ => {}
        }
    }

    /// Whether hides the user did not initiate through a button resolve as
    /// confirm. Only the single-button acknowledgement dialog does this.
    #[must_use]
    pub const fn dismiss_confirms(self) -> bool {
        matches!(self, Self::Alert)
    }
}

impl std::fmt::Display for DialogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popup_core::{Backdrop, normalize};
    use proptest::prelude::*;

    fn any_kind() -> impl Strategy<Value = DialogKind> {
        prop_oneof![
            Just(DialogKind::Alert),
            Just(DialogKind::Confirm),
            Just(DialogKind::Input(InputKind::Text)),
            Just(DialogKind::Input(InputKind::Textarea)),
            Just(DialogKind::Input(InputKind::Email)),
            Just(DialogKind::Input(InputKind::Number)),
            Just(DialogKind::Select),
            Just(DialogKind::Checkbox),
            Just(DialogKind::Radio),
        ]
    }

    fn any_backdrop() -> impl Strategy<Value = Backdrop> {
        prop_oneof![
            Just(Backdrop::Static),
            Just(Backdrop::Dismiss),
            Just(Backdrop::Off),
        ]
    }

    /// Options carrying every key any variant requires.
    fn complete() -> DialogOptions {
        DialogOptions::new()
            .title("T")
            .body("B")
            .options(["a"])
            .on_ok(|_| {})
    }

    #[test]
    fn required_sets_per_variant() {
        assert_eq!(
            DialogKind::Alert.required_keys(),
            &[OptionKey::Title, OptionKey::Body]
        );
        assert!(
            DialogKind::Confirm
                .required_keys()
                .contains(&OptionKey::OkCallback)
        );
        assert!(
            !DialogKind::Input(InputKind::Number)
                .required_keys()
                .contains(&OptionKey::Options)
        );
        assert!(
            DialogKind::Radio
                .required_keys()
                .contains(&OptionKey::Options)
        );
    }

    #[test]
    fn forced_settings_override_caller() {
        let mut settings = normalize(
            DialogOptions::new()
                .title("T")
                .body("B")
                .keyboard(true)
                .close_control(true)
                .backdrop(Backdrop::Dismiss)
                .on_ok(|_| {}),
            INPUT_REQUIRED,
            DialogKind::Confirm.defaults(),
        )
        .unwrap()
        .settings;
        DialogKind::Confirm.force(&mut settings);
        assert!(!settings.modal.keyboard);
        assert!(!settings.modal.close);
        assert_eq!(settings.modal.backdrop, Backdrop::Dismiss);
    }

    #[test]
    fn alert_never_has_cancel() {
        let mut settings = normalize(
            DialogOptions::new().title("T").body("B").cancel_label("No"),
            ALERT_REQUIRED,
            DialogKind::Alert.defaults(),
        )
        .unwrap()
        .settings;
        DialogKind::Alert.force(&mut settings);
        assert_eq!(settings.cancel_label, None);
    }

    #[test]
    fn names() {
        assert_eq!(
            DialogKind::Input(InputKind::Textarea).to_string(),
            "textarea"
        );
        assert_eq!(InputKind::Textarea.input_type(), None);
        assert_eq!(InputKind::Email.input_type(), Some("email"));
    }

    proptest! {
        #[test]
        fn force_pins_keyboard_and_close(
            kind in any_kind(),
            keyboard in any::<bool>(),
            close in any::<bool>(),
            backdrop in any_backdrop()
        ) {
            let options = complete()
                .keyboard(keyboard)
                .close_control(close)
                .backdrop(backdrop);
            let mut settings = normalize(options, kind.required_keys(), kind.defaults())
                .unwrap()
                .settings;
            kind.force(&mut settings);

            prop_assert!(!settings.modal.keyboard);
            prop_assert_eq!(settings.modal.backdrop, backdrop);
            if matches!(kind, DialogKind::Alert | DialogKind::Confirm) {
                prop_assert!(!settings.modal.close);
            } else {
                prop_assert_eq!(settings.modal.close, close);
            }
            if kind == DialogKind::Alert {
                prop_assert_eq!(settings.cancel_label, None);
            }
        }

        #[test]
        fn each_required_key_is_enforced(
            kind in any_kind(),
            pick in any::<prop::sample::Index>()
        ) {
            let required = kind.required_keys();
            let missing = required[pick.index(required.len())];
            let err = normalize(complete().without(missing), required, kind.defaults())
                .unwrap_err();
            prop_assert_eq!(err.key(), missing);
        }
    }
}
