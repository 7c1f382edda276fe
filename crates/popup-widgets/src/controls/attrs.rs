#![forbid(unsafe_code)]

//! Caller attribute injection.
//!
//! `class` appends a class, `id` sets the id, `maxlength` overrides the
//! `maxLength` option, and every other entry is applied verbatim.

use popup_core::AttrMap;
use popup_dom::{Dom, NodeId};

/// `attrs` split into the entries with special meaning and the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAttrs<'a> {
    pub class: Option<&'a str>,
    pub id: Option<&'a str>,
    pub max_length: Option<u32>,
    pub verbatim: Vec<(&'a str, &'a str)>,
}

/// Split `attrs`, folding `attrs.maxlength` over `max_length`.
///
/// An unparseable `maxlength` entry is ignored (the option value stands).
#[must_use]
pub fn resolve(attrs: &AttrMap, max_length: Option<u32>) -> ResolvedAttrs<'_> {
    let mut resolved = ResolvedAttrs {
        max_length,
        ..ResolvedAttrs::default()
    };
    for (name, value) in attrs.iter() {
        match name {
            "class" => resolved.class = Some(value),
            "id" => resolved.id = Some(value),
            "maxlength" => match value.trim().parse::<u32>() {
                Ok(limit) => resolved.max_length = Some(limit),
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value, "ignoring unparseable attrs.maxlength");
                }
            },
            _ => resolved.verbatim.push((name, value)),
        }
    }
    resolved
}

impl ResolvedAttrs<'_> {
    /// Append `class` (if any) to `node`.
    pub fn apply_class<D: Dom>(&self, dom: &mut D, node: NodeId) {
        if let Some(class) = self.class {
            dom.add_classes(node, class);
        }
    }

    /// Set `id` (if any) on `node`.
    pub fn apply_id<D: Dom>(&self, dom: &mut D, node: NodeId) {
        if let Some(id) = self.id {
            dom.set_attribute(node, "id", id);
        }
    }

    /// Apply every verbatim entry to `node`.
    pub fn apply_verbatim<D: Dom>(&self, dom: &mut D, node: NodeId) {
        for (name, value) in &self.verbatim {
            dom.set_attribute(node, name, value);
        }
    }
}
