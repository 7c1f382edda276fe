#![forbid(unsafe_code)]

//! Values reported by resolved dialogs.

use std::fmt;

/// The value a confirmed dialog hands to its ok continuation.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogValue {
    /// Text prompts, select and radio (the chosen key).
    Text(String),
    /// Numeric prompt.
    Number(f64),
    /// Checkbox: checked keys in display order. Never empty.
    Keys(Vec<String>),
}

impl DialogValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_keys(&self) -> Option<&[String]> {
        match self {
            Self::Keys(keys) => Some(keys),
            _ => None,
        }
    }
}

impl fmt::Display for DialogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Keys(keys) => f.write_str(&keys.join(",")),
        }
    }
}

impl From<&str> for DialogValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for DialogValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for DialogValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// How a dialog resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// Closed through the confirm button.
    Confirmed(Option<DialogValue>),
    /// Closed any other way.
    Cancelled,
}

impl DialogOutcome {
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// The confirmed value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&DialogValue> {
        match self {
            Self::Confirmed(value) => value.as_ref(),
            Self::Cancelled => None,
        }
    }

    /// Consume into the confirmed value.
    #[must_use]
    pub fn into_value(self) -> Option<DialogValue> {
        match self {
            Self::Confirmed(value) => value,
            Self::Cancelled => None,
        }
    }
}
