#![forbid(unsafe_code)]

//! Awaitable dialog outcomes.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::FusedFuture;
use popup_core::DialogOutcome;

use crate::host::DialogId;

/// Resolves to the outcome of a dialog opened with
/// [`DialogHost::open_async`](crate::DialogHost::open_async).
///
/// If the host is dropped before the dialog resolves, the future resolves to
/// [`DialogOutcome::Cancelled`]. The outcome is handed out once, either by
/// [`try_outcome`](Self::try_outcome) or by polling.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct DialogFuture {
    id: DialogId,
    receiver: oneshot::Receiver<DialogOutcome>,
    taken: bool,
}

impl DialogFuture {
    pub(crate) fn new(id: DialogId, receiver: oneshot::Receiver<DialogOutcome>) -> Self {
        Self {
            id,
            receiver,
            taken: false,
        }
    }

    /// The dialog this future belongs to.
    #[must_use]
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// The outcome, if it has been delivered and not taken yet.
    ///
    /// Returns `None` while the dialog is open and after the outcome has
    /// been taken.
    pub fn try_outcome(&mut self) -> Option<DialogOutcome> {
        if self.taken {
            return None;
        }
        let outcome = match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(DialogOutcome::Cancelled),
        };
        self.taken = outcome.is_some();
        outcome
    }
}

impl Future for DialogFuture {
    type Output = DialogOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcome = match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(result) => result.unwrap_or(DialogOutcome::Cancelled),
            Poll::Pending => return Poll::Pending,
        };
        self.taken = true;
        Poll::Ready(outcome)
    }
}

impl FusedFuture for DialogFuture {
    fn is_terminated(&self) -> bool {
        self.taken
    }
}
