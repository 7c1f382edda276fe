#![forbid(unsafe_code)]

//! Modal dialog helpers.
//!
//! Nine dialog kinds share one pipeline: options are validated and filled
//! with per-kind defaults, a dialog tree is built into the document, a
//! variant control is rendered into its body, and a lifecycle controller
//! resolves the dialog exactly once through its callbacks (or a future).
//!
//! | Kind | Required options | Confirms with |
//! |------|------------------|---------------|
//! | alert | `title`, `body` | nothing |
//! | confirm | `title`, `body`, `ok.callback` | nothing |
//! | text / textarea / email | same as confirm | the entered text |
//! | number | same as confirm | the entered number, if valid |
//! | select / radio | also `options` | the chosen key |
//! | checkbox | also `options` | the checked keys, if any |
//!
//! Headless use goes through [`DialogHost`](prelude::DialogHost) with
//! [`MemoryDom`](prelude::MemoryDom) and
//! [`ScriptedModal`](prelude::ScriptedModal):
//!
//! ```
//! use popup::prelude::*;
//!
//! let mut host = DialogHost::new(MemoryDom::new(), ScriptedModal::new());
//! let id = host
//!     .checkbox(
//!         DialogOptions::new()
//!             .title("Toppings")
//!             .body("Pick any")
//!             .options(["cheese", "olives"])
//!             .vals(["olives"])
//!             .on_ok(|value| assert_eq!(value, Some(DialogValue::Keys(vec!["olives".into()])))),
//!     )
//!     .unwrap();
//! let ok = host.frame(id).and_then(|f| f.ok).unwrap();
//! host.dispatch(DialogEvent::dom(ok, EventKind::Click));
//! assert_eq!(host.open_count(), 0);
//! ```
//!
//! In the browser, `popup_web::WebDialogs` (re-exported as `web`) wires
//! the same pipeline to the live document and Bootstrap's modal.

pub use popup_core as core;
pub use popup_dom as dom;
pub use popup_widgets as widgets;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use popup_web as web;

/// Everything needed to open dialogs.
pub mod prelude {
    pub use popup_core::{
        AttrMap, Backdrop, ChoiceMap, Choices, DialogOptions, DialogOutcome, DialogValue,
        OptionKey, Theme, ValidationError,
    };
    pub use popup_dom::{Dom, EventKind, MemoryDom, ModalWidget, NodeId, ScriptedModal};
    pub use popup_widgets::{
        DialogEvent, DialogFuture, DialogHost, DialogId, DialogKind, InputKind, Resolution,
    };

    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    pub use popup_web::{WebDialogs, WebError};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn prelude_drives_every_continuation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut host = DialogHost::new(MemoryDom::new(), ScriptedModal::new());

        let ok = Rc::clone(&seen);
        let cancel = Rc::clone(&seen);
        let id = host
            .radio(
                DialogOptions::new()
                    .title("Size")
                    .body("Pick one")
                    .options([("s", "Small"), ("l", "Large")])
                    .val("l")
                    .on_ok(move |v| ok.borrow_mut().push(format!("ok:{v:?}")))
                    .on_cancel(move || cancel.borrow_mut().push("cancel".to_owned())),
            )
            .unwrap();
        let confirm = host.frame(id).and_then(|f| f.ok).unwrap();
        host.dispatch(DialogEvent::dom(confirm, EventKind::Click));

        let cancel = Rc::clone(&seen);
        let id = host
            .confirm(
                DialogOptions::new()
                    .title("Sure?")
                    .body("Really")
                    .on_ok(|_| {})
                    .on_cancel(move || cancel.borrow_mut().push("cancel".to_owned())),
            )
            .unwrap();
        let dismiss = host.frame(id).and_then(|f| f.cancel).unwrap();
        host.dispatch(DialogEvent::dom(dismiss, EventKind::Click));

        assert_eq!(
            *seen.borrow(),
            vec!["ok:Some(Text(\"l\"))".to_owned(), "cancel".to_owned()]
        );
        assert_eq!(host.open_count(), 0);
    }
}
