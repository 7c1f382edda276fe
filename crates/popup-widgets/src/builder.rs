#![forbid(unsafe_code)]

//! Dialog skeleton construction.
//!
//! [`place`] builds the tree every variant shares and appends it to the
//! document body:
//!
//! ```text
//! div.popup-modal.<instance>.modal.fade [tabindex=-1, role=dialog]
//! └─ div.modal-dialog [role=document]
//!    └─ div.modal-content
//!       ├─ div.modal-header
//!       │  ├─ h5.modal-title
//!       │  └─ button.close            (optional)
//!       ├─ div.modal-body
//!       │  └─ p.popup-p | <markup>
//!       └─ div.modal-footer
//!          ├─ button.btn.popup-cancel  (optional, first)
//!          └─ button.btn.popup-ok      (optional, last)
//! ```
//!
//! The class names after the markers come from the [`Theme`]. Title, button
//! labels and the close glyph are parsed as markup like the body, so entities
//! decode and inline tags (icons, emphasis) render.

use popup_core::{DialogSettings, Theme, is_markup};
use popup_dom::{Dom, NodeId};

/// Shared marker class on every dialog root.
pub const MODAL_MARKER: &str = "popup-modal";
/// Marker class on confirm buttons.
pub const OK_MARKER: &str = "popup-ok";
/// Marker class on cancel buttons.
pub const CANCEL_MARKER: &str = "popup-cancel";

/// Everything [`place`] needs to know.
#[derive(Debug, Clone, Copy)]
pub struct PlaceSpec<'a> {
    /// Per-instance class added next to [`MODAL_MARKER`].
    pub instance_class: &'a str,
    pub title: &'a str,
    /// Plain text or markup.
    pub body: &'a str,
    pub ok_label: Option<&'a str>,
    pub cancel_label: Option<&'a str>,
    /// Style tag for the confirm button (`primary`).
    pub ok_class: &'a str,
    pub cancel_class: &'a str,
    pub close: bool,
    /// Extra class for the frame element.
    pub dialog_class: &'a str,
}

impl<'a> PlaceSpec<'a> {
    /// Derive a spec from normalized settings.
    #[must_use]
    pub fn from_settings(instance_class: &'a str, settings: &'a DialogSettings) -> Self {
        Self {
            instance_class,
            title: &settings.title,
            body: &settings.body,
            ok_label: settings.ok_label.as_deref(),
            cancel_label: settings.cancel_label.as_deref(),
            ok_class: &settings.ok_class,
            cancel_class: &settings.cancel_class,
            close: settings.modal.close,
            dialog_class: &settings.dialog_class,
        }
    }
}

/// Node handles of a placed dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogFrame {
    pub root: NodeId,
    pub frame: NodeId,
    pub content: NodeId,
    pub header: NodeId,
    pub title: NodeId,
    pub body: NodeId,
    pub footer: NodeId,
    pub ok: Option<NodeId>,
    pub cancel: Option<NodeId>,
    pub close: Option<NodeId>,
}

fn div<D: Dom>(dom: &mut D, classes: &str) -> NodeId {
    let node = dom.create_element("div");
    dom.add_classes(node, classes);
    node
}

fn button<D: Dom>(dom: &mut D, theme: &Theme, marker: &str, tag: &str, label: &str) -> NodeId {
    let node = dom.create_element("button");
    dom.set_attribute(node, "type", "button");
    dom.add_classes(node, &theme.button);
    dom.add_class(node, marker);
    if let Some(class) = theme.button_class_for(tag) {
        dom.add_classes(node, &class);
    }
    dom.append_markup(node, label);
    node
}

/// Build the dialog skeleton and append it to the document body.
pub fn place<D: Dom>(dom: &mut D, theme: &Theme, spec: &PlaceSpec<'_>) -> DialogFrame {
    let root = dom.create_element("div");
    dom.add_class(root, MODAL_MARKER);
    dom.add_class(root, spec.instance_class);
    dom.add_classes(root, &theme.root);
    dom.set_attribute(root, "tabindex", "-1");
    dom.set_attribute(root, "role", "dialog");

    let frame = div(dom, &theme.frame);
    dom.set_attribute(frame, "role", "document");
    dom.add_classes(frame, spec.dialog_class);

    let content = div(dom, &theme.content);
    let header = div(dom, &theme.header);

    let title = dom.create_element(&theme.title_tag);
    dom.add_classes(title, &theme.title);
    dom.append_markup(title, spec.title);
    dom.append_child(header, title);

    let close = spec.close.then(|| {
        let close = dom.create_element("button");
        dom.add_classes(close, &theme.close);
        dom.set_attribute(close, "type", "button");
        dom.set_attribute(close, &theme.dismiss_attr, "modal");
        dom.set_attribute(close, "aria-label", "Close");
        if !theme.close_glyph.is_empty() {
            let glyph = dom.create_element("span");
            dom.set_attribute(glyph, "aria-hidden", "true");
            dom.append_markup(glyph, &theme.close_glyph);
            dom.append_child(close, glyph);
        }
        dom.append_child(header, close);
        close
    });

    let body = div(dom, &theme.body);
    // Text bodies still go through the fragment parser so entities decode.
    let fragment = dom.create_fragment(spec.body);
    if is_markup(spec.body) {
        for node in fragment {
            dom.append_child(body, node);
        }
    } else {
        let paragraph = dom.create_element("p");
        dom.add_classes(paragraph, &theme.paragraph);
        for node in fragment {
            dom.append_child(paragraph, node);
        }
        dom.append_child(body, paragraph);
    }

    let footer = div(dom, &theme.footer);
    let ok = spec.ok_label.map(|label| {
        let ok = button(dom, theme, OK_MARKER, spec.ok_class, label);
        dom.append_child(footer, ok);
        ok
    });
    let cancel = spec.cancel_label.map(|label| {
        let cancel = button(dom, theme, CANCEL_MARKER, spec.cancel_class, label);
        dom.set_attribute(cancel, &theme.dismiss_attr, "modal");
        dom.prepend_child(footer, cancel);
        cancel
    });

    dom.append_child(content, header);
    dom.append_child(content, body);
    dom.append_child(content, footer);
    dom.append_child(frame, content);
    dom.append_child(root, frame);
    let document_body = dom.body();
    dom.append_child(document_body, root);

    DialogFrame {
        root,
        frame,
        content,
        header,
        title,
        body,
        footer,
        ok,
        cancel,
        close,
    }
}
