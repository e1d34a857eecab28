//! A* engine — the `alternate` algorithm.
//!
//! Same contract as [`DijkstraSearch`][crate::DijkstraSearch]: optimal cost,
//! deterministic tie-breaking, exclusion set and trace cap honored.  The
//! heuristic is the haversine straight-line distance to the target, which
//! never exceeds any road path to it, so the first settle of the target is
//! optimal.  On city grids A* typically examines a fraction of the edges
//! Dijkstra does, which is the point of racing the two.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use nav_core::{EdgeId, GeoPoint, NodeId};

use crate::GraphError;
use crate::graph::RoadGraph;
use crate::search::{
    ExplorationTrace, PathSearch, SearchOutcome, SearchQuery, edge_cost_mm,
    reconstruct_edges,
};

/// Heuristic deflation factor.  Stored edge lengths are themselves haversine
/// values rounded through f64 arithmetic; shaving 1 % guarantees the
/// heuristic can never overestimate through rounding alone.
const HEURISTIC_SCALE: f64 = 0.99;

/// A* over the CSR road graph with a haversine heuristic.
pub struct AStarSearch;

#[inline]
fn heuristic_mm(pos: GeoPoint, target: GeoPoint) -> u64 {
    (pos.distance_m(target) * HEURISTIC_SCALE * 1_000.0) as u64
}

impl PathSearch for AStarSearch {
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

        let target_pos = graph.node_pos[to.index()];

        let n = graph.node_count();
        // g[v] = best known cost (mm) to reach v.
        let mut g = vec![u64::MAX; n];
        let mut prev_edge = vec![EdgeId::INVALID; n];

        g[from.index()] = 0;

        // Min-heap keyed (f, g, node): f = g + h orders the frontier, g then
        // NodeId make equal-f pops deterministic.
        let mut heap: BinaryHeap<Reverse<(u64, u64, NodeId)>> = BinaryHeap::new();
        let h0 = heuristic_mm(graph.node_pos[from.index()], target_pos);
        heap.push(Reverse((h0, 0, from)));

        while let Some(Reverse((_f, cost, node))) = heap.pop() {
            if node == to {
                let edges = reconstruct_edges(graph, &prev_edge, to);
                return Ok(SearchOutcome {
                    edges,
                    cost_m: cost as f64 / 1_000.0,
                    trace,
                });
            }

            // Skip stale heap entries.
            if cost > g[node.index()] {
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

                if new_cost < g[neighbor.index()] {
                    g[neighbor.index()] = new_cost;
                    prev_edge[neighbor.index()] = edge;
                    let h = heuristic_mm(graph.node_pos[neighbor.index()], target_pos);
                    heap.push(Reverse((new_cost.saturating_add(h), new_cost, neighbor)));
                }
            }
        }

        log::debug!("astar: target {to} unreachable from {from}");
        Err(GraphError::Unreachable { from, to })
    }
}
