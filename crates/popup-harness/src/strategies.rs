#![forbid(unsafe_code)]

//! Proptest strategies.

use popup_widgets::{DialogKind, InputKind};
use proptest::prelude::*;

/// Every dialog kind.
pub fn dialog_kind() -> impl Strategy<Value = DialogKind> {
    prop_oneof![
        Just(DialogKind::Alert),
        Just(DialogKind::Confirm),
        Just(DialogKind::Input(InputKind::Text)),
        Just(DialogKind::Input(InputKind::Textarea)),
        Just(DialogKind::Input(InputKind::Email)),
        Just(DialogKind::Input(InputKind::Number)),
        Just(DialogKind::Select),
        Just(DialogKind::Checkbox),
        Just(DialogKind::Radio),
    ]
}

/// Short option keys, possibly repeated.
pub fn choice_keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 1..6)
}

/// What a user does to an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Ok,
    Cancel,
    Close,
    Backdrop,
    Escape,
}

pub fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        Just(Gesture::Ok),
        Just(Gesture::Cancel),
        Just(Gesture::Close),
        Just(Gesture::Backdrop),
        Just(Gesture::Escape),
    ]
}

/// A sequence of gestures, as a user mashing buttons would produce.
pub fn gestures() -> impl Strategy<Value = Vec<Gesture>> {
    prop::collection::vec(gesture(), 1..8)
}
