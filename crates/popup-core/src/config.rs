#![forbid(unsafe_code)]

//! Theme loading from JSON or TOML (`config` feature).
//!
//! Every field is optional in the source document; absent fields keep their
//! Bootstrap 4 value.
//!
//! ```
//! use popup_core::Theme;
//!
//! let theme = Theme::from_toml_str(r#"
//!     dismiss_attr = "data-bs-dismiss"
//!     [counter]
//!     above = "bg-danger"
//! "#).unwrap();
//! assert_eq!(theme.dismiss_attr, "data-bs-dismiss");
//! assert_eq!(theme.counter.below, "badge-primary");
//! ```

use crate::theme::Theme;

/// A theme document could not be parsed.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Toml(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid theme JSON: {err}"),
            Self::Toml(err) => write!(f, "invalid theme TOML: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Toml(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}

impl Theme {
    /// Parse a theme from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input or mistyped fields.
    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Parse a theme from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed input or mistyped fields.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_documents_yield_default() {
        assert_eq!(Theme::from_json_str("{}").unwrap(), Theme::default());
        assert_eq!(Theme::from_toml_str("").unwrap(), Theme::default());
    }

    #[test]
    fn json_round_trip() {
        let theme = Theme::bootstrap5();
        let json = theme.to_json_string().unwrap();
        assert_eq!(Theme::from_json_str(&json).unwrap(), theme);
    }

    #[test]
    fn toml_partial_override() {
        let theme = Theme::from_toml_str(
            r#"
            select = "form-select"
            [counter]
            at = "bg-success"
            "#,
        )
        .unwrap();
        assert_eq!(theme.select, "form-select");
        assert_eq!(theme.counter.at, "bg-success");
        assert_eq!(theme.counter.above, "badge-danger");
        assert_eq!(theme.root, "modal fade");
    }

    #[test]
    fn malformed_input_is_reported() {
        let err = Theme::from_json_str("{\"root\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid theme JSON"));

        let err = Theme::from_toml_str("root = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
