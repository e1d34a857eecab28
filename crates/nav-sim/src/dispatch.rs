//! Background execution of reroute tickets.
//!
//! Search requests must never block a tick, so tickets run on a dedicated
//! worker thread.  Results come back through a channel and are drained with
//! non-blocking [`BackgroundPlanner::poll`]; the stale-id guard in
//! `Simulation::complete_reroute` remains the correctness mechanism, while
//! the worker's latest-id check merely avoids wasting work on requests that
//! are already superseded before they start.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use nav_core::RequestId;
use nav_graph::GraphProvider;
use nav_route::{PathRequest, RouteMeta, RoutePlanner, RouteResult};

use crate::reroute::SearchTicket;

struct Job {
    id: RequestId,
    request: PathRequest,
}

/// A worker thread that executes [`SearchTicket`]s against a
/// [`RoutePlanner`].
pub struct BackgroundPlanner {
    jobs: Sender<Job>,
    results: Receiver<(RequestId, RouteResult<RouteMeta>)>,
    /// Newest submitted id; the worker skips jobs older than this.
    latest: Arc<AtomicU64>,
}

impl BackgroundPlanner {
    /// Spawn the worker.  It exits when the `BackgroundPlanner` is dropped.
    pub fn spawn<P: GraphProvider + 'static>(planner: RoutePlanner<P>) -> Self {
        let (job_tx, job_rx) = channel::<Job>();
        let (res_tx, res_rx) = channel();
        let latest = Arc::new(AtomicU64::new(0));
        let latest_worker = Arc::clone(&latest);

        thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                // Explicit cancellation: a newer submission makes this job
                // dead on arrival, so skip the search entirely.
                if latest_worker.load(Ordering::Acquire) > job.id.0 {
                    log::debug!("background: skipping superseded request {}", job.id);
                    continue;
                }
                let result = planner.plan_meta(&job.request).map(|p| p.meta);
                if res_tx.send((job.id, result)).is_err() {
                    break;
                }
            }
        });

        Self { jobs: job_tx, results: res_rx, latest }
    }

    /// Queue a ticket.  Supersedes every earlier submission.
    pub fn submit(&self, ticket: SearchTicket) {
        self.latest.store(ticket.id.0, Ordering::Release);
        // A send failure means the worker is gone; the sim just stays frozen,
        // same as a failed search.
        if self.jobs.send(Job { id: ticket.id, request: ticket.request }).is_err() {
            log::warn!("background: worker unavailable, request {} dropped", self.latest.load(Ordering::Acquire));
        }
    }

    /// Non-blocking: the next finished result, if any.
    pub fn poll(&self) -> Option<(RequestId, RouteResult<RouteMeta>)> {
        match self.results.try_recv() {
            Ok(r) => Some(r),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
