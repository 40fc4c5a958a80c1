use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_channel::oneshot;
use futures_util::future::{FutureExt, Map, Shared};

use crate::{Error, Result};

type Outcome = core::result::Result<Result<()>, oneshot::Canceled>;
type Settled = Shared<Map<oneshot::Receiver<Result<()>>, fn(Outcome) -> Result<()>>>;

// A dropped sender means the work was abandoned without an outcome.
fn flatten(outcome: Outcome) -> Result<()> {
    outcome.unwrap_or(Err(Error::Cancelled))
}

/// A promise-like handle that settles once, when a render pass has mounted all of its rows.
///
/// Clones observe the same settlement. Synchronous callers inspect [`Self::is_settled`] /
/// [`Self::result`]; async callers can `.await` it.
#[derive(Clone)]
pub struct Completion {
    settled: Settled,
    // Output of this handle's own poll; `Shared` gives its state away on completion.
    done: Option<Result<()>>,
}

/// The engine's side of a [`Completion`]. Settling consumes it.
#[derive(Debug)]
pub(crate) struct Settle {
    tx: oneshot::Sender<Result<()>>,
}

impl Settle {
    pub(crate) fn settle(self, result: Result<()>) {
        // Fails only when every `Completion` clone is gone.
        if self.tx.send(result).is_err() {
            ltrace!("Completion dropped before it settled");
        }
    }
}

impl Completion {
    pub(crate) fn pending() -> (Self, Settle) {
        let (tx, rx) = oneshot::channel();
        let settled = rx.map(flatten as fn(Outcome) -> Result<()>).shared();
        (
            Self {
                settled,
                done: None,
            },
            Settle { tx },
        )
    }

    pub(crate) fn settled(result: Result<()>) -> Self {
        let (completion, settle) = Self::pending();
        settle.settle(result);
        completion
    }

    pub fn is_settled(&self) -> bool {
        self.result().is_some()
    }

    /// The settled result, or `None` while pending.
    pub fn result(&self) -> Option<Result<()>> {
        if let Some(done) = &self.done {
            return Some(done.clone());
        }
        if let Some(result) = self.settled.peek() {
            return Some(result.clone());
        }
        self.settled.clone().now_or_never()
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self.result(), Some(Ok(())))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.result(), Some(Err(_)))
    }

    /// Returns `true` if both handles observe the same settlement.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.settled.ptr_eq(&other.settled)
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(result) = self.result() {
            return Poll::Ready(result);
        }
        let polled = self.settled.poll_unpin(cx);
        if let Poll::Ready(result) = &polled {
            self.done = Some(result.clone());
        }
        polled
    }
}

impl core::fmt::Debug for Completion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Completion")
            .field("result", &self.result())
            .finish()
    }
}
