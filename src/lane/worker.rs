//! Worker Lane
//!
//! One dedicated thread draining a crossbeam channel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::{Result, StorageError};

use super::{Job, Lane};

/// Dedicated single-thread lane (the default for a store)
///
/// ## Lifecycle:
/// - `spawn`/`bounded` start the thread
/// - `shutdown` (or drop) closes the queue; jobs already queued still run,
///   then the thread is joined
/// - A panicking job is logged and the worker moves on to the next one
pub struct WorkerLane {
    name: String,

    /// None once shut down
    sender: Mutex<Option<Sender<Job>>>,

    handle: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerLane {
    /// Start a lane with an unbounded queue
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        Self::start(name.into(), channel::unbounded())
    }

    /// Start a lane whose queue holds at most `capacity` jobs
    ///
    /// `submit` blocks while the queue is full.
    pub fn bounded(name: impl Into<String>, capacity: usize) -> Result<Self> {
        Self::start(name.into(), channel::bounded(capacity))
    }

    fn start(name: String, (sender, receiver): (Sender<Job>, Receiver<Job>)) -> Result<Self> {
        let worker_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(worker_name, receiver))
            .map_err(|e| {
                StorageError::LaneUnavailable(format!("failed to spawn worker '{}': {}", name, e))
            })?;

        tracing::debug!(lane = %name, "worker lane started");

        Ok(Self {
            name,
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop accepting jobs, let queued ones finish, join the thread
    ///
    /// Idempotent. When called from the worker itself the join is skipped.
    pub fn shutdown(&self) {
        drop(self.sender.lock().take());

        let Some(handle) = self.handle.lock().take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            tracing::warn!(lane = %self.name, "worker thread exited abnormally");
        }
    }
}

impl Lane for WorkerLane {
    fn submit(&self, job: Job) -> Result<()> {
        // Clone out so a blocking send on a full queue doesn't hold the lock
        let sender = self.sender.lock().clone();
        let Some(sender) = sender else {
            return Err(StorageError::LaneUnavailable(format!(
                "lane '{}' is shut down",
                self.name
            )));
        };

        sender.send(job).map_err(|_| {
            StorageError::LaneUnavailable(format!("lane '{}' worker has stopped", self.name))
        })
    }
}

impl Drop for WorkerLane {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerLane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerLane")
            .field("name", &self.name)
            .field("open", &self.sender.lock().is_some())
            .finish()
    }
}

fn run(name: String, receiver: Receiver<Job>) {
    for job in receiver.iter() {
        tracing::trace!(lane = %name, "running job");
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!(lane = %name, "job panicked: {}", panic_message(&*payload));
        }
    }
    tracing::debug!(lane = %name, "worker lane stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
