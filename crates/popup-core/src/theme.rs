#![forbid(unsafe_code)]

//! Class vocabulary used when building dialog trees.
//!
//! [`Theme::default`] reproduces Bootstrap 4 markup; [`Theme::bootstrap5`]
//! switches the handful of names that changed in Bootstrap 5. With the
//! `config` feature a theme can be loaded from JSON or TOML; missing fields
//! fall back to the Bootstrap 4 names.

/// Classes applied to the character counter badge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CounterClasses {
    /// Always present.
    pub base: String,
    /// Length below the limit.
    pub below: String,
    /// Length exactly at the limit.
    pub at: String,
    /// Length above the limit.
    pub above: String,
}

impl Default for CounterClasses {
    fn default() -> Self {
        Self {
            base: "badge rounded-bottom float-right mr-1 mt-1".into(),
            below: "badge-primary".into(),
            at: "badge-success".into(),
            above: "badge-danger".into(),
        }
    }
}

/// Class names and attribute spellings for every part of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Theme {
    pub root: String,
    pub frame: String,
    pub content: String,
    pub header: String,
    pub title: String,
    /// Tag used for the title element.
    pub title_tag: String,
    pub body: String,
    pub paragraph: String,
    pub footer: String,
    pub button: String,
    /// Prepended to a style tag (`primary`) to form a button class.
    pub button_prefix: String,
    pub close: String,
    /// Text inside the close control. Empty for icon-only close buttons.
    pub close_glyph: String,
    /// Attribute that asks the widget to dismiss on click.
    pub dismiss_attr: String,
    pub input: String,
    pub select: String,
    pub check_row: String,
    pub check_input: String,
    pub check_label: String,
    pub counter: CounterClasses,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            root: "modal fade".into(),
            frame: "modal-dialog".into(),
            content: "modal-content".into(),
            header: "modal-header".into(),
            title: "modal-title".into(),
            title_tag: "h5".into(),
            body: "modal-body".into(),
            paragraph: "popup-p".into(),
            footer: "modal-footer pr-2 pt-2 pb-2 pl-2".into(),
            button: "btn".into(),
            button_prefix: "btn-".into(),
            close: "close".into(),
            close_glyph: "\u{d7}".into(),
            dismiss_attr: "data-dismiss".into(),
            input: "form-control mb-0".into(),
            select: "custom-select".into(),
            check_row: "form-check".into(),
            check_input: "form-check-input".into(),
            check_label: "form-check-label".into(),
            counter: CounterClasses::default(),
        }
    }
}

impl Theme {
    /// Bootstrap 4 class names.
    #[must_use]
    pub fn bootstrap4() -> Self {
        Self::default()
    }

    /// Bootstrap 5 class names.
    #[must_use]
    pub fn bootstrap5() -> Self {
        Self {
            footer: "modal-footer px-2 py-2".into(),
            close: "btn-close".into(),
            close_glyph: String::new(),
            dismiss_attr: "data-bs-dismiss".into(),
            select: "form-select".into(),
            counter: CounterClasses {
                base: "badge rounded-bottom float-end me-1 mt-1".into(),
                below: "bg-primary".into(),
                at: "bg-success".into(),
                above: "bg-danger".into(),
            },
            ..Self::default()
        }
    }

    /// Button class for a style tag: `primary` becomes `btn-primary`; a tag
    /// that already carries the prefix is kept; an empty tag yields `None`.
    #[must_use]
    pub fn button_class_for(&self, tag: &str) -> Option<String> {
        let tag = tag.trim();
        if tag.is_empty() {
            None
        } else if tag.starts_with(&self.button_prefix) {
            Some(tag.to_owned())
        } else {
            Some(format!("{}{tag}", self.button_prefix))
        }
    }
}
