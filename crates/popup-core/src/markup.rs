#![forbid(unsafe_code)]

//! Text-versus-markup classification for dialog bodies.
//!
//! A body is markup when parsing it as an HTML fragment yields at least one
//! element node. Plain text (including text with stray `<` characters or
//! comments only) is wrapped in a paragraph by the builder; markup is
//! inserted verbatim.
//!
//! # Failure Modes
//!
//! This is a classifier, not a sanitizer. Markup bodies are inserted as-is,
//! so untrusted input must not be passed as a body.

use scraper::{Html, Node};

/// Whether `body` contains at least one element when parsed as a fragment.
#[must_use]
pub fn is_markup(body: &str) -> bool {
    if !body.contains('<') {
        return false;
    }
    let fragment = Html::parse_fragment(body);
    fragment
        .root_element()
        .children()
        .any(|child| matches!(child.value(), Node::Element(_)))
}
