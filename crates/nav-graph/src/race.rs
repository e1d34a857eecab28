//! Side-by-side comparison of the baseline and alternate engines.
//!
//! Runs both algorithms on the same query concurrently and reports cost,
//! latency, and exploration size for each.  Exists for benchmarking and the
//! exploration-overlay visualizations; route planning itself always calls a
//! single engine.

use std::time::Instant;

use crate::graph::RoadGraph;
use crate::search::{SearchAlgorithm, SearchOutcome, SearchQuery};
use crate::GraphError;

/// One engine's side of a [`RaceReport`].
#[derive(Debug)]
pub struct RaceEntry {
    pub algorithm: SearchAlgorithm,
    pub outcome: Result<SearchOutcome, GraphError>,
    pub elapsed_ms: f64,
}

impl RaceEntry {
    /// Edges the engine examined (accurate even when the trace was capped),
    /// or 0 when the query disabled tracing.
    pub fn examined(&self) -> usize {
        match &self.outcome {
            Ok(o) => o.trace.as_ref().map_or(0, |t| t.examined),
            Err(_) => 0,
        }
    }
}

/// Both engines' results on one query.
#[derive(Debug)]
pub struct RaceReport {
    pub baseline: RaceEntry,
    pub alternate: RaceEntry,
}

impl RaceReport {
    /// Absolute cost difference in metres, when both engines found a path.
    ///
    /// Both engines return optimal costs, so this should never exceed float
    /// noise; the comparison harness asserts it in tests.
    pub fn cost_gap_m(&self) -> Option<f64> {
        match (&self.baseline.outcome, &self.alternate.outcome) {
            (Ok(a), Ok(b)) => Some((a.cost_m - b.cost_m).abs()),
            _ => None,
        }
    }
}

fn timed(algorithm: SearchAlgorithm, graph: &RoadGraph, query: &SearchQuery) -> RaceEntry {
    let t0 = Instant::now();
    let outcome = algorithm.engine().search(graph, query);
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1_000.0;
    RaceEntry { algorithm, outcome, elapsed_ms }
}

/// Run both engines on `query` concurrently and report the comparison.
pub fn race(graph: &RoadGraph, query: &SearchQuery) -> RaceReport {
    let (baseline, alternate) = rayon::join(
        || timed(SearchAlgorithm::Dijkstra, graph, query),
        || timed(SearchAlgorithm::AStar, graph, query),
    );
    log::debug!(
        "race {} -> {}: baseline {:.2} ms / {} examined, alternate {:.2} ms / {} examined",
        query.source,
        query.target,
        baseline.elapsed_ms,
        baseline.examined(),
        alternate.elapsed_ms,
        alternate.examined(),
    );
    RaceReport { baseline, alternate }
}
