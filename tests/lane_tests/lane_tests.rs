//! Tests for lanes and tickets
//!
//! These tests verify:
//! - WorkerLane runs jobs one at a time in submission order
//! - Bounded lanes apply backpressure
//! - A panicking job does not kill the worker
//! - Shutdown drains queued jobs, then refuses new ones
//! - InlineLane and Ticket behaviour

#[path = "../common/mod.rs"]
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel;
use larder::{ErrorKind, InlineLane, Lane, StorageError, Ticket, WorkerLane};
use parking_lot::Mutex;

// =============================================================================
// WorkerLane
// =============================================================================

#[test]
fn test_worker_runs_jobs_in_submission_order() {
    common::init_tracing();
    let lane = WorkerLane::spawn("order-test").unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for i in 0..100 {
        let seen = Arc::clone(&seen);
        lane.submit(Box::new(move || seen.lock().push(i))).unwrap();
    }
    lane.shutdown();

    assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_worker_never_overlaps_jobs() {
    let lane = WorkerLane::spawn("serial-test").unwrap();
    let running = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    for _ in 0..20 {
        let running = Arc::clone(&running);
        let max_seen = Arc::clone(&max_seen);
        lane.submit(Box::new(move || {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(1));
            running.fetch_sub(1, Ordering::SeqCst);
        }))
        .unwrap();
    }
    lane.shutdown();

    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_worker_thread_is_named() {
    let lane = WorkerLane::spawn("named-lane").unwrap();
    let (tx, rx) = channel::bounded(1);

    lane.submit(Box::new(move || {
        let _ = tx.send(thread::current().name().map(str::to_string));
    }))
    .unwrap();

    assert_eq!(rx.recv().unwrap().as_deref(), Some("named-lane"));
    assert_eq!(lane.name(), "named-lane");
}

#[test]
fn test_worker_survives_panicking_job() {
    common::init_tracing();
    let lane = WorkerLane::spawn("panic-test").unwrap();
    let (tx, rx) = channel::bounded(1);

    lane.submit(Box::new(|| panic!("boom"))).unwrap();
    lane.submit(Box::new(move || {
        let _ = tx.send("still alive");
    }))
    .unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "still alive");
}

#[test]
fn test_shutdown_drains_then_refuses() {
    let lane = WorkerLane::spawn("drain-test").unwrap();
    let count = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let count = Arc::clone(&count);
        lane.submit(Box::new(move || {
            thread::sleep(Duration::from_millis(1));
            count.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    }
    lane.shutdown();
    assert_eq!(count.load(Ordering::SeqCst), 10);

    let err = lane.submit(Box::new(|| {})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LaneUnavailable);

    // Idempotent
    lane.shutdown();
}

#[test]
fn test_bounded_lane_blocks_when_full() {
    let lane = Arc::new(WorkerLane::bounded("bounded-test", 1).unwrap());
    let (release_tx, release_rx) = channel::bounded::<()>(0);
    let (started_tx, started_rx) = channel::bounded::<()>(1);

    // Occupies the worker until released
    lane.submit(Box::new(move || {
        let _ = started_tx.send(());
        let _ = release_rx.recv();
    }))
    .unwrap();
    started_rx.recv().unwrap();

    // Fills the single queue slot
    lane.submit(Box::new(|| {})).unwrap();

    // Third submit has nowhere to go until the worker moves on
    let submitted = Arc::new(AtomicUsize::new(0));
    let submitter = {
        let lane = Arc::clone(&lane);
        let submitted = Arc::clone(&submitted);
        thread::spawn(move || {
            lane.submit(Box::new(|| {})).unwrap();
            submitted.store(1, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert_eq!(submitted.load(Ordering::SeqCst), 0);

    release_tx.send(()).unwrap();
    submitter.join().unwrap();
    assert_eq!(submitted.load(Ordering::SeqCst), 1);
}

// =============================================================================
// InlineLane
// =============================================================================

#[test]
fn test_inline_lane_runs_before_returning() {
    let lane = InlineLane;
    let flag = Arc::new(AtomicUsize::new(0));
    let job_flag = Arc::clone(&flag);

    lane.submit(Box::new(move || job_flag.store(7, Ordering::SeqCst)))
        .unwrap();

    assert_eq!(flag.load(Ordering::SeqCst), 7);
}

// =============================================================================
// Ticket
// =============================================================================

#[test]
fn test_ready_ticket() {
    let ticket = Ticket::ready(Ok(42));
    assert_eq!(ticket.wait().unwrap(), 42);

    let ticket: Ticket<u32> = Ticket::ready(Err(StorageError::NotFound("k".into())));
    assert!(ticket.wait().unwrap_err().is_not_found());
}

#[test]
fn test_ticket_polling() {
    let ticket = Ticket::ready(Ok("done"));
    assert_eq!(ticket.try_result().unwrap().unwrap(), "done");

    // Result already taken
    let err = ticket.wait().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LaneUnavailable);
}
