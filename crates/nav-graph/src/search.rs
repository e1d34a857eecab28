//! Search contract and the baseline Dijkstra engine.
//!
//! # Pluggability
//!
//! Callers route through the [`PathSearch`] trait, so the baseline and
//! alternate engines are interchangeable: identical inputs, identical output
//! shape, and both return an optimal-cost path.  Only latency and the size
//! of the exploration trace may differ.
//!
//! # Cost units
//!
//! Edge costs are **integer millimetres** (u64) internally.  Integer costs
//! make the `(cost, node)` heap ordering exact, so ties break by `NodeId`
//! deterministically and repeated runs are reproducible for benchmarking.
//! [`SearchOutcome`] exposes the total as `cost_m: f64`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use nav_core::{EdgeId, NodeId};

use crate::GraphError;
use crate::graph::RoadGraph;

// ── Query & outcome ───────────────────────────────────────────────────────────

/// One shortest-path question: source, target, closed edges, and whether to
/// record the exploration trace.
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    pub source: NodeId,
    pub target: NodeId,

    /// Edges the search must never relax.  The canonical graph is immutable;
    /// a road closure is expressed here instead.
    pub excluded: FxHashSet<EdgeId>,

    /// `Some(cap)` records up to `cap` examined edges in visitation order.
    /// `None` disables tracing entirely.
    pub trace_cap: Option<usize>,
}

impl SearchQuery {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target, excluded: FxHashSet::default(), trace_cap: None }
    }

    pub fn excluding(mut self, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        self.excluded.extend(edges);
        self
    }

    pub fn with_trace(mut self, cap: usize) -> Self {
        self.trace_cap = Some(cap);
        self
    }
}

/// Edges a search examined, in visitation order.
///
/// The stored list is bounded by the query's `trace_cap` so visualization
/// payloads stay small on metro-scale graphs; `examined` keeps the accurate
/// total even after the list stops growing.
#[derive(Clone, Debug, Default)]
pub struct ExplorationTrace {
    pub edges: Vec<EdgeId>,
    pub examined: usize,
}

impl ExplorationTrace {
    pub(crate) fn with_cap(cap: usize) -> Self {
        Self { edges: Vec::with_capacity(cap.min(4096)), examined: 0 }
    }

    #[inline]
    pub(crate) fn record(&mut self, edge: EdgeId, cap: usize) {
        self.examined += 1;
        if self.edges.len() < cap {
            self.edges.push(edge);
        }
    }

    /// `true` when `edges` was truncated at the cap.
    pub fn truncated(&self) -> bool {
        self.examined > self.edges.len()
    }
}

/// The result of a search: an ordered edge sequence, its total cost, and the
/// optional exploration trace.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Edges to traverse in order, from source to target.  Empty when
    /// source == target.
    pub edges: Vec<EdgeId>,

    /// Total path cost in metres.
    pub cost_m: f64,

    /// Present iff the query asked for tracing.
    pub trace: Option<ExplorationTrace>,
}

impl SearchOutcome {
    /// The ordered node sequence `source, …, target`.
    pub fn node_path(&self, graph: &RoadGraph, source: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        nodes.push(source);
        for &e in &self.edges {
            nodes.push(graph.edge_to[e.index()]);
        }
        nodes
    }

    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── PathSearch trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must return an optimal-cost path for non-negative edge
/// weights, settle ties deterministically, and honor the query's exclusion
/// set and trace cap.  Tracing must never change the returned path.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so both engines can be raced on
/// Rayon worker threads.
pub trait PathSearch: Send + Sync {
    fn search(&self, graph: &RoadGraph, query: &SearchQuery)
    -> Result<SearchOutcome, GraphError>;
}

// ── Algorithm selector ────────────────────────────────────────────────────────

/// Which engine serves a request.  The wire tags are `"baseline"` (Dijkstra)
/// and `"alternate"` (A*).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchAlgorithm {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "baseline"))]
    Dijkstra,
    #[cfg_attr(feature = "serde", serde(rename = "alternate"))]
    AStar,
}

impl SearchAlgorithm {
    /// The engine behind this tag.
    pub fn engine(self) -> &'static dyn PathSearch {
        match self {
            SearchAlgorithm::Dijkstra => &DijkstraSearch,
            SearchAlgorithm::AStar => &crate::AStarSearch,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            SearchAlgorithm::Dijkstra => "baseline",
            SearchAlgorithm::AStar => "alternate",
        }
    }
}

impl std::fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// ── Cost helpers (shared with the A* engine) ──────────────────────────────────

/// Edge length in integer millimetres.
#[inline]
pub(crate) fn edge_cost_mm(graph: &RoadGraph, edge: EdgeId) -> u64 {
    (graph.edge_length_m[edge.index()] * 1_000.0) as u64
}

/// Walk `prev_edge` back from the target and return the forward edge order.
pub(crate) fn reconstruct_edges(
    graph: &RoadGraph,
    prev_edge: &[EdgeId],
    target: NodeId,
) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut cur = target;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    edges
}

// ── DijkstraSearch ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph — the `baseline`
/// engine.
///
/// A binary-heap frontier keyed by tentative distance; edges are relaxed on
/// frontier pop; nodes settle in non-decreasing distance order.  The
/// secondary `NodeId` heap key breaks cost ties deterministically.
pub struct DijkstraSearch;

impl PathSearch for DijkstraSearch {
    fn search(
        &self,
        graph: &RoadGraph,
        query: &SearchQuery,
    ) -> Result<SearchOutcome, GraphError> {
        let (from, to) = (query.source, query.target);
        let mut trace = query.trace_cap.map(ExplorationTrace::with_cap);

        if from == to {
            return Ok(SearchOutcome { edges: vec![], cost_m: 0.0, trace });
        }

        let n = graph.node_count();
        // dist[v] = best known cost (mm) to reach v.
        let mut dist = vec![u64::MAX; n];
        // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
        let mut prev_edge = vec![EdgeId::INVALID; n];

        dist[from.index()] = 0;

        // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                let edges = reconstruct_edges(graph, &prev_edge, to);
                return Ok(SearchOutcome {
                    edges,
                    cost_m: cost as f64 / 1_000.0,
                    trace,
                });
            }

            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }

            for edge in graph.out_edges(node) {
                if query.excluded.contains(&edge) {
                    continue;
                }
                if let (Some(t), Some(cap)) = (trace.as_mut(), query.trace_cap) {
                    t.record(edge, cap);
                }

                let neighbor = graph.edge_to[edge.index()];
                let new_cost = cost.saturating_add(edge_cost_mm(graph, edge));

                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    prev_edge[neighbor.index()] = edge;
                    heap.push(Reverse((new_cost, neighbor)));
                }
            }
        }

        log::debug!("dijkstra: target {to} unreachable from {from}");
        Err(GraphError::Unreachable { from, to })
    }
}
