//! Ticket
//!
//! Handle for the result of one queued operation.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::error::{Result, StorageError};

/// Pending result of an asynchronous store operation
///
/// Backed by a one-shot channel. The result can be taken once; after a
/// `try_result`/`wait_timeout` has returned it, further waits report
/// `LaneUnavailable`.
#[must_use = "dropping a ticket discards the operation's result"]
#[derive(Debug)]
pub struct Ticket<T> {
    receiver: Receiver<Result<T>>,
}

impl<T> Ticket<T> {
    /// Sending half for the worker, receiving half for the caller
    pub(crate) fn pair() -> (Sender<Result<T>>, Ticket<T>) {
        let (sender, receiver) = channel::bounded(1);
        (sender, Ticket { receiver })
    }

    /// A ticket that already holds its result
    pub fn ready(result: Result<T>) -> Self {
        let (sender, ticket) = Self::pair();
        // Capacity 1 and the receiver is alive, so this cannot fail
        let _ = sender.send(result);
        ticket
    }

    /// Block until the operation finishes
    pub fn wait(self) -> Result<T> {
        self.receiver.recv().unwrap_or_else(|_| Err(lost()))
    }

    /// Block for at most `timeout`; `None` if still running
    ///
    /// Timing out does not cancel the operation.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(lost())),
        }
    }

    /// Non-blocking poll
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(lost())),
        }
    }
}

fn lost() -> StorageError {
    StorageError::LaneUnavailable("operation was dropped before reporting a result".to_string())
}
