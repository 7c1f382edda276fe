#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use popup_core::{Backdrop, DialogOptions};
use popup_dom::{Dom, EventKind, MemoryDom, ScriptedModal};
use popup_widgets::{Control, DialogEvent, DialogHost, DialogKind, InputKind};

#[derive(Debug, Arbitrary)]
enum Kind {
    Alert,
    Confirm,
    Text,
    Textarea,
    Email,
    Number,
    Select,
    Checkbox,
    Radio,
}

impl Kind {
    fn dialog(&self) -> DialogKind {
        match self {
            Self::Alert => DialogKind::Alert,
            Self::Confirm => DialogKind::Confirm,
            Self::Text => DialogKind::Input(InputKind::Text),
            Self::Textarea => DialogKind::Input(InputKind::Textarea),
            Self::Email => DialogKind::Input(InputKind::Email),
            Self::Number => DialogKind::Input(InputKind::Number),
            Self::Select => DialogKind::Select,
            Self::Checkbox => DialogKind::Checkbox,
            Self::Radio => DialogKind::Radio,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Step {
    Ok,
    Cancel,
    Close,
    Backdrop,
    Type(String),
    Toggle(u8),
}

#[derive(Debug, Arbitrary)]
struct Session {
    kind: Kind,
    body: String,
    options: Vec<String>,
    val: Option<String>,
    max_length: Option<u8>,
    steps: Vec<Step>,
}

fuzz_target!(|session: Session| {
    let fired = Rc::new(Cell::new(0u32));
    let on_ok = Rc::clone(&fired);
    let on_cancel = Rc::clone(&fired);
    let mut options = DialogOptions::new()
        .title("T")
        .body(session.body)
        .options(session.options)
        .backdrop(Backdrop::Dismiss)
        .on_ok(move |_| on_ok.set(on_ok.get() + 1))
        .on_cancel(move || on_cancel.set(on_cancel.get() + 1));
    if let Some(val) = session.val {
        options = options.val(val);
    }
    if let Some(max) = session.max_length {
        options = options.max_length(u32::from(max));
    }

    let mut host = DialogHost::new(MemoryDom::new(), ScriptedModal::new());
    let Ok(id) = host.open(session.kind.dialog(), options) else {
        return;
    };
    let root = host.frame(id).map(|f| f.root);

    for step in session.steps {
        let Some(frame) = host.frame(id).copied() else {
            break;
        };
        match step {
            Step::Ok => {
                if let Some(ok) = frame.ok {
                    host.dispatch(DialogEvent::dom(ok, EventKind::Click));
                }
            }
            Step::Cancel => {
                if let Some(cancel) = frame.cancel {
                    host.dispatch(DialogEvent::dom(cancel, EventKind::Click));
                }
            }
            Step::Close => {
                if let Some(close) = frame.close {
                    host.dispatch(DialogEvent::dom(close, EventKind::Click));
                }
            }
            Step::Backdrop => {
                host.widget_mut().click_backdrop(frame.root);
                host.dispatch_pending();
            }
            Step::Type(text) => {
                if let Some(Control::Input { node, .. }) = host.control(id) {
                    let node = *node;
                    host.dom_mut().set_value(node, &text);
                    host.dispatch(DialogEvent::dom(node, EventKind::KeyUp));
                }
            }
            Step::Toggle(idx) => {
                let input = host
                    .control(id)
                    .and_then(|c| c.rows().get(usize::from(idx)).map(|r| r.input));
                if let Some(input) = input {
                    let next = !host.dom().is_checked(input);
                    host.dom_mut().set_checked(input, next);
                }
            }
        }
    }

    assert!(fired.get() <= 1);
    if host.is_open(id) {
        assert_eq!(fired.get(), 0);
    } else {
        assert_eq!(fired.get(), 1);
        assert!(root.is_some_and(|r| !host.dom().contains(r)));
        assert_eq!(host.dom().listener_count(), 0);
    }
});
