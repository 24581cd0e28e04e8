// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-fire asynchronous delivery.
//!
//! [`completion`] creates a linked [`Completer`] / [`Completion`] pair.
//! The completer is consumed by [`Completer::complete`], so an outcome is
//! delivered at most once by construction; dropping it without completing
//! delivers a [`CoreCode::Abandoned`] fault, so the waiting side always
//! receives exactly one outcome.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use fl_error::{CoreCode, Fault};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Outcome;

/// Context key carrying the operation id on abandoned faults.
pub const OPERATION_ID_KEY: &str = "operationId";

/// Create a linked completer and completion with a fresh operation id.
pub fn completion<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    let id = Uuid::new_v4();
    (
        Completer { tx: Some(tx), id },
        Completion {
            rx,
            id,
            delivered: false,
        },
    )
}

pub(crate) fn abandoned(id: Uuid) -> Fault {
    Fault::builder(CoreCode::domain(), CoreCode::Abandoned.code())
        .description("The operation ended without delivering a result.")
        .context(OPERATION_ID_KEY, id.to_string())
        .build()
}

// ---------------------------------------------------------------------------
// Completer
// ---------------------------------------------------------------------------

/// Producer half: delivers the terminal outcome.
#[must_use = "dropping a Completer delivers an Abandoned fault"]
pub struct Completer<T> {
    tx: Option<oneshot::Sender<Outcome<T>>>,
    id: Uuid,
}

impl<T> Completer<T> {
    /// Operation id shared with the matching [`Completion`].
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Deliver `outcome`. Returns `false` if the waiting side is gone.
    pub fn complete(mut self, outcome: Outcome<T>) -> bool {
        match self.tx.take() {
            Some(tx) => {
                let delivered = tx.send(outcome).is_ok();
                if !delivered {
                    debug!(op_id = %self.id, "completion receiver dropped before delivery");
                }
                delivered
            }
            None => false,
        }
    }

    /// Deliver a success value.
    pub fn succeed(self, value: T) -> bool {
        self.complete(Ok(value))
    }

    /// Deliver a fault.
    pub fn fail(self, fault: Fault) -> bool {
        self.complete(Err(fault))
    }

    /// `true` if the waiting side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.as_ref().is_none_or(|tx| tx.is_closed())
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            warn!(op_id = %self.id, "completer dropped without delivering an outcome");
            let _ = tx.send(Err(abandoned(self.id)));
        }
    }
}

impl<T> fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("id", &self.id)
            .field("delivered", &self.tx.is_none())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Consumer half: a future resolving to the single delivered outcome.
///
/// Once the outcome has been handed out, by `.await` or by
/// [`try_take`](Self::try_take), the completion is spent: `try_take`
/// returns `None` and polling stays pending.
#[must_use = "a Completion does nothing unless awaited"]
pub struct Completion<T> {
    rx: oneshot::Receiver<Outcome<T>>,
    id: Uuid,
    delivered: bool,
}

impl<T> Completion<T> {
    /// Operation id shared with the matching [`Completer`].
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// `true` once the outcome has been handed out.
    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// The outcome if it is ready and has not been taken yet.
    pub fn try_take(&mut self) -> Option<Outcome<T>> {
        if self.delivered {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(abandoned(self.id)),
        };
        self.delivered = true;
        Some(outcome)
    }
}

impl<T> Future for Completion<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.delivered {
            return Poll::Pending;
        }
        let outcome = match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => outcome,
            Poll::Ready(Err(_)) => Err(abandoned(this.id)),
            Poll::Pending => return Poll::Pending,
        };
        this.delivered = true;
        Poll::Ready(outcome)
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("id", &self.id)
            .field("delivered", &self.delivered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_success() {
        let (tx, rx) = completion::<u32>();
        assert_eq!(tx.id(), rx.id());
        assert!(tx.succeed(7));
        assert_eq!(rx.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn delivers_fault() {
        let (tx, rx) = completion::<()>();
        tx.fail(Fault::new("Net", -1001));
        assert!(rx.await.unwrap_err().is("Net", -1001));
    }

    #[tokio::test]
    async fn drop_delivers_abandoned() {
        let (tx, rx) = completion::<()>();
        let id = tx.id();
        drop(tx);
        let fault = rx.await.unwrap_err();
        assert!(CoreCode::Abandoned.matches(&fault));
        let op = fault.get(OPERATION_ID_KEY).unwrap();
        assert_eq!(op.as_str(), Some(id.to_string().as_str()));
    }

    #[test]
    fn try_take_before_and_after() {
        let (tx, mut rx) = completion::<u8>();
        assert!(rx.try_take().is_none());
        tx.succeed(1);
        assert_eq!(rx.try_take().unwrap().unwrap(), 1);
        assert!(rx.is_delivered());
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn abandoned_is_taken_once() {
        let (tx, mut rx) = completion::<u8>();
        drop(tx);
        assert!(rx.try_take().unwrap().is_err());
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn complete_reports_closed_receiver() {
        let (tx, rx) = completion::<u8>();
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.succeed(1));
    }
}
