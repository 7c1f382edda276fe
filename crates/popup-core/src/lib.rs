#![forbid(unsafe_code)]

//! Option model and shared types for popup dialogs.
//!
//! This crate holds everything a dialog needs before it touches a document:
//!
//! - [`DialogOptions`]: the caller-facing settings, addressed by dotted
//!   [`OptionKey`]s (`ok.class`, `modal.backdrop`, ...).
//! - [`normalize`]: required-key validation followed by default filling.
//! - [`Choices`] / [`ChoiceMap`]: list-or-map option input, normalized to an
//!   ordered key → label mapping.
//! - [`DialogValue`] / [`DialogOutcome`]: what a resolved dialog reports.
//! - [`gen_id`]: 32-hex-character tokens for label association.
//! - [`is_markup`]: the text-vs-markup classification used for dialog bodies.
//! - [`Theme`]: the class vocabulary used when building dialog trees.

pub mod choices;
#[cfg(feature = "config")]
pub mod config;
pub mod error;
pub mod id;
pub mod markup;
pub mod normalize;
pub mod options;
pub mod theme;
pub mod value;

pub use choices::{ChoiceMap, Choices};
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use error::ValidationError;
pub use id::{TOKEN_LEN, gen_id};
pub use markup::is_markup;
pub use normalize::{
    ALERT_REQUIRED, CHOICE_REQUIRED, Callbacks, DialogSettings, INPUT_REQUIRED, ModalSettings,
    NormalizedOptions, normalize,
};
pub use options::{AttrMap, Backdrop, CancelCallback, DialogOptions, OkCallback, OptionKey};
pub use theme::{CounterClasses, Theme};
pub use value::{DialogOutcome, DialogValue};
