//! Lane Module
//!
//! Serial execution of a store's asynchronous work.
//!
//! ## Responsibilities
//! - Run queued jobs one at a time, in submission order
//! - Hand results back to the caller through a `Ticket`
//! - Let tests swap the worker thread for inline execution
//!
//! ## Flow
//! ```text
//!   caller ──submit(job)──► [ crossbeam channel ] ──► worker thread
//!     │                                                  │
//!     └──────── Ticket::wait() ◄──── one-shot channel ◄──┘
//! ```

mod ticket;
mod worker;

use crate::error::Result;

pub use ticket::Ticket;
pub use worker::WorkerLane;

/// A unit of queued work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes jobs for a store instance
///
/// Implementations must run jobs from one lane in the order they were
/// submitted, never two at once.
pub trait Lane: Send + Sync {
    /// Queue `job`; fails only if the lane can no longer run work
    fn submit(&self, job: Job) -> Result<()>;
}

/// Runs every job immediately on the submitting thread
///
/// Makes the async API deterministic in tests: by the time `submit`
/// returns, the job has finished and its ticket is ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineLane;

impl Lane for InlineLane {
    fn submit(&self, job: Job) -> Result<()> {
        job();
        Ok(())
    }
}
