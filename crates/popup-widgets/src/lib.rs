#![forbid(unsafe_code)]

//! Dialog construction and lifecycle for popup dialogs.
//!
//! - [`builder`]: the shared dialog skeleton (title, body, buttons, close
//!   control).
//! - [`controls`]: per-variant form controls and value extraction.
//! - [`lifecycle`]: the per-instance state machine that guarantees exactly
//!   one continuation per dialog.
//! - [`host`]: [`DialogHost`], which owns the document and widget, exposes
//!   the variant entry points, and routes events to instances.
//! - [`pending`]: [`DialogFuture`], the awaitable alternative to callbacks.
//!
//! # Example
//!
//! ```
//! use popup_core::{DialogOptions, DialogValue};
//! use popup_dom::{Dom, EventKind, MemoryDom, ScriptedModal};
//! use popup_widgets::{DialogEvent, DialogHost};
//!
//! let mut host = DialogHost::new(MemoryDom::new(), ScriptedModal::new());
//! let id = host
//!     .text(
//!         DialogOptions::new()
//!             .title("Name")
//!             .body("What should we call you?")
//!             .on_ok(|value| assert_eq!(value, Some(DialogValue::from("Ada")))),
//!     )
//!     .unwrap();
//!
//! let input = host.control(id).and_then(|c| c.focus_target()).unwrap();
//! host.dom_mut().set_value(input, "Ada");
//! let ok = host.frame(id).and_then(|f| f.ok).unwrap();
//! host.dispatch(DialogEvent::dom(ok, EventKind::Click));
//! assert_eq!(host.open_count(), 0);
//! ```

pub mod builder;
pub mod controls;
pub mod host;
pub mod kind;
pub mod lifecycle;
pub mod pending;

pub use builder::{DialogFrame, PlaceSpec, place};
pub use controls::{Control, Counter, CounterState, Toggle};
pub use host::{DialogEvent, DialogHost, DialogId};
pub use kind::{DialogKind, InputKind};
pub use lifecycle::{Action, Phase, Resolution, Sink, Trigger};
pub use pending::DialogFuture;
