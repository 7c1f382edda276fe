#![forbid(unsafe_code)]

//! Validation errors raised while opening a dialog.
//!
//! Validation is the only checked failure in the dialog lifecycle. It is
//! returned synchronously from the entry point, before any document node is
//! created. Everything that happens after a dialog is on screen (including a
//! user confirming without making a selection) is a valid outcome, not an
//! error.

use crate::options::OptionKey;

/// A dialog could not be opened because its options were incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A required option was absent (or explicitly unset).
    MissingKey(OptionKey),
}

impl ValidationError {
    /// The option key that failed validation.
    #[must_use]
    pub const fn key(&self) -> OptionKey {
        match self {
            Self::MissingKey(key) => *key,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey(key) => {
                write!(f, "key \"{key}\" must be defined and cannot be empty")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
