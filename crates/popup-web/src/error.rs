#![forbid(unsafe_code)]

//! Errors raised by the browser backend.

use popup_core::ValidationError;

/// Why a browser dialog runtime could not be created or a dialog opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// No `window` global (not running in a browser main thread).
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// The document has no `<body>` yet.
    NoBody,
    /// `bootstrap.Modal` is not loaded.
    MissingBootstrap,
    /// The runtime is already handling an event further up the stack.
    Busy,
    /// The dialog options were rejected.
    Validation(ValidationError),
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no window global available"),
            Self::NoDocument => f.write_str("window has no document"),
            Self::NoBody => f.write_str("document has no body"),
            Self::MissingBootstrap => f.write_str("bootstrap.Modal is not loaded"),
            Self::Busy => f.write_str("dialog runtime is busy"),
            Self::Validation(err) => write!(f, "invalid dialog options: {err}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for WebError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
