#![forbid(unsafe_code)]

//! Browser dialog runtime.
//!
//! [`WebDialogs`] owns a [`DialogHost`] over [`WebDom`] and
//! [`BootstrapModal`]. Browser listeners push [`DialogEvent`]s into a queue
//! and drain it; resolutions fire only after the host borrow is released,
//! so continuations may open further dialogs.
//!
//! # Invariants
//!
//! - Events are handled one at a time, in arrival order. An event raised
//!   while another is being handled (a widget firing `hide.bs.modal`
//!   synchronously, say) is queued and picked up by the outer drain.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use popup_core::{DialogOptions, Theme};
use popup_widgets::{DialogEvent, DialogFuture, DialogHost, DialogId, DialogKind, InputKind};

use crate::dom::{EventSink, NodeTable, WebDom};
use crate::error::WebError;
use crate::modal::{BootstrapModal, locate_bootstrap};

/// Host type driven by [`WebDialogs`].
pub type WebHost = DialogHost<WebDom, BootstrapModal>;

#[derive(Debug)]
struct Inner {
    host: RefCell<WebHost>,
    queue: RefCell<VecDeque<DialogEvent>>,
}

impl Inner {
    fn deliver(&self, event: DialogEvent) {
        self.queue.borrow_mut().push_back(event);
        self.drain();
    }

    fn drain(&self) {
        loop {
            let due = {
                let Ok(mut host) = self.host.try_borrow_mut() else {
                    return;
                };
                let next = self.queue.borrow_mut().pop_front();
                match next {
                    Some(event) => host.handle_event(event),
                    None => {
                        let due = host.pump();
                        if due.is_empty() {
                            return;
                        }
                        due
                    }
                }
            };
            for resolution in due {
                resolution.fire();
            }
        }
    }
}

/// Handle to the page's dialog runtime. Clones share the same runtime.
#[derive(Debug, Clone)]
pub struct WebDialogs {
    inner: Rc<Inner>,
}

impl WebDialogs {
    /// Runtime on the current document with the Bootstrap 5 theme.
    ///
    /// # Errors
    ///
    /// When there is no window, document or body, or `bootstrap.Modal` is
    /// not loaded.
    pub fn new() -> Result<Self, WebError> {
        Self::with_theme(Theme::bootstrap5())
    }

    /// Runtime on the current document using `theme`.
    ///
    /// # Errors
    ///
    /// As for [`WebDialogs::new`].
    pub fn with_theme(theme: Theme) -> Result<Self, WebError> {
        let nodes = NodeTable::from_window()?.into_shared();
        let class = locate_bootstrap()?;
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let sink: EventSink = Rc::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.deliver(event);
                }
            });
            let dom = WebDom::new(Rc::clone(&nodes), Rc::clone(&sink));
            let widget = BootstrapModal::new(nodes, class, sink);
            Inner {
                host: RefCell::new(DialogHost::new(dom, widget).with_theme(theme)),
                queue: RefCell::new(VecDeque::new()),
            }
        });
        Ok(Self { inner })
    }

    /// Run `f` against the host. Resolutions that become due are fired
    /// afterwards.
    ///
    /// # Errors
    ///
    /// [`WebError::Busy`] when called from inside event handling.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut WebHost) -> R) -> Result<R, WebError> {
        let result = {
            let mut host = self
                .inner
                .host
                .try_borrow_mut()
                .map_err(|_| WebError::Busy)?;
            f(&mut host)
        };
        self.inner.drain();
        Ok(result)
    }

    /// Open a dialog with callback continuations.
    ///
    /// # Errors
    ///
    /// [`WebError::Validation`] for incomplete options, [`WebError::Busy`]
    /// when called from inside event handling.
    pub fn open(&self, kind: DialogKind, options: DialogOptions) -> Result<DialogId, WebError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("web_open", kind = kind.name()).entered();
        self.with_host(|host| host.open(kind, options))?
            .map_err(WebError::from)
    }

    /// Open a dialog whose outcome is awaited instead of passed to callbacks.
    ///
    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn open_async(
        &self,
        kind: DialogKind,
        options: DialogOptions,
    ) -> Result<DialogFuture, WebError> {
        self.with_host(|host| host.open_async(kind, options))?
            .map_err(WebError::from)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn alert(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Alert, options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn confirm(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Confirm, options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn text(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Input(InputKind::Text), options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn textarea(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Input(InputKind::Textarea), options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn email(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Input(InputKind::Email), options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn number(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Input(InputKind::Number), options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn select(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Select, options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn checkbox(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Checkbox, options)
    }

    /// # Errors
    ///
    /// As for [`WebDialogs::open`].
    pub fn radio(&self, options: DialogOptions) -> Result<DialogId, WebError> {
        self.open(DialogKind::Radio, options)
    }

    /// Cancel every open dialog.
    ///
    /// # Errors
    ///
    /// [`WebError::Busy`] when called from inside event handling.
    pub fn dismiss_all(&self) -> Result<(), WebError> {
        let due = self.with_host(WebHost::dismiss_all)?;
        for resolution in due {
            resolution.fire();
        }
        Ok(())
    }

    /// Number of dialogs currently open, or `None` while busy.
    #[must_use]
    pub fn open_count(&self) -> Option<usize> {
        self.inner
            .host
            .try_borrow()
            .ok()
            .map(|host| host.open_count())
    }
}
