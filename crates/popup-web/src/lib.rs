#![forbid(unsafe_code)]

//! Browser backend for popup dialogs.
//!
//! On `wasm32` this crate provides:
//!
//! - [`WebDom`]: the [`Dom`](popup_dom::Dom) seam over the live document.
//! - [`BootstrapModal`]: the [`ModalWidget`](popup_dom::ModalWidget) seam
//!   over Bootstrap 5's `bootstrap.Modal`.
//! - [`WebDialogs`]: a ready-to-use runtime tying both to a
//!   [`DialogHost`](popup_widgets::DialogHost) and the browser event loop.
//!
//! ```ignore
//! use popup_core::DialogOptions;
//! use popup_web::WebDialogs;
//!
//! let dialogs = WebDialogs::new()?;
//! dialogs.confirm(
//!     DialogOptions::new()
//!         .title("Delete file?")
//!         .body("This cannot be undone.")
//!         .on_ok(|_| delete_file()),
//! )?;
//! ```
//!
//! On other targets only [`WebError`] is compiled.

pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod modal;
#[cfg(target_arch = "wasm32")]
pub mod runtime;

pub use error::WebError;

#[cfg(target_arch = "wasm32")]
pub use dom::{EventSink, NodeTable, SharedNodes, WebDom};
#[cfg(target_arch = "wasm32")]
pub use modal::{BootstrapModal, locate_bootstrap};
#[cfg(target_arch = "wasm32")]
pub use runtime::{WebDialogs, WebHost};
