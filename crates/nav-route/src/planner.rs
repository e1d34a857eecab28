//! The planning pipeline: request → graph → snap → search → synthesis.

use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashSet;

use nav_core::{GeoPoint, ScenarioProfiles};
use nav_graph::{
    BoundingBox, GraphError, GraphProvider, RoadGraph, SearchOutcome, SearchQuery,
};

use crate::meta::RouteMeta;
use crate::synth::synthesize;
use crate::wire::{PathRequest, RouteResponse, lng_lat};
use crate::{RouteError, RouteResult};

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Tunables for the planning pipeline.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum metres between a requested point and its snapped road node.
    pub max_snap_m: f64,

    /// Radius around a blocked point within which edges are closed.
    pub block_radius_m: f64,

    /// Cap on stored exploration-trace edges per search.
    pub max_trace_edges: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_snap_m: 500.0,
            block_radius_m: 100.0,
            max_trace_edges: 2_500,
        }
    }
}

// ── PlannedRoute ──────────────────────────────────────────────────────────────

/// A planned route plus the context the simulation layer needs.
pub struct PlannedRoute {
    pub meta: RouteMeta,
    pub snapped_start: GeoPoint,
    pub snapped_end: GeoPoint,
    /// Pathfinding time only, in milliseconds.
    pub execution_time_ms: f64,
    pub outcome: SearchOutcome,
    /// The region graph the route was planned against.
    pub graph: Arc<RoadGraph>,
}

impl PlannedRoute {
    /// Convert into the JSON-facing response.
    pub fn into_response(self) -> RouteResponse {
        let explored = self.outcome.trace.as_ref().map(|t| {
            t.edges
                .iter()
                .map(|&e| {
                    let a = self.graph.node_pos[self.graph.edge_from[e.index()].index()];
                    let b = self.graph.node_pos[self.graph.edge_to[e.index()].index()];
                    [lng_lat(a), lng_lat(b)]
                })
                .collect::<Vec<_>>()
        });
        let explored_count = self.outcome.trace.as_ref().map(|t| t.examined);

        RouteResponse {
            algorithm: self.meta.algorithm,
            execution_time_ms: self.execution_time_ms,
            path_coordinates: self.meta.coords.iter().map(|&p| lng_lat(p)).collect(),
            snapped_start: lng_lat(self.snapped_start),
            snapped_end: lng_lat(self.snapped_end),
            total_distance_m: self.meta.total_distance_m,
            total_time_s: self.meta.total_time_s,
            cum_distance_m: self.meta.cum_distance_m.clone(),
            cum_time_s: self.meta.cum_time_s.clone(),
            steps: self.meta.steps.clone(),
            explored_coords: explored,
            explored_count,
        }
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Plans routes against graphs served by a [`GraphProvider`].
///
/// The planner is stateless between calls and `Send + Sync`, so one instance
/// can serve foreground requests and background reroutes concurrently.
pub struct RoutePlanner<P: GraphProvider> {
    provider: P,
    profiles: ScenarioProfiles,
    config: PlannerConfig,
}

impl<P: GraphProvider> RoutePlanner<P> {
    pub fn new(provider: P, profiles: ScenarioProfiles, config: PlannerConfig) -> Self {
        Self { provider, profiles, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a route and keep the full context (for simulation hand-off).
    pub fn plan_meta(&self, req: &PathRequest) -> RouteResult<PlannedRoute> {
        let start: GeoPoint = req.start.into();
        let end: GeoPoint = req.end.into();

        // 1) Region graph for the padded corridor.
        let bbox = BoundingBox::around(start, end).rounded();
        let graph = self.provider.graph_for_bbox(&bbox)?;

        // 2) Road closures → edge exclusion set.
        let mut excluded = FxHashSet::default();
        for point in req.blocked_points() {
            excluded.extend(graph.edges_near(point, self.config.block_radius_m));
        }
        if !excluded.is_empty() {
            log::debug!("plan: {} edges excluded by road closures", excluded.len());
        }

        // 3) Snap both endpoints, failing fast when either is off-network.
        let source = self.snap(&graph, start)?;
        let target = self.snap(&graph, end)?;

        // 4) Timed search with the selected engine.
        let mut query = SearchQuery::new(source, target);
        query.excluded = excluded;
        if req.include_exploration {
            query.trace_cap = Some(self.config.max_trace_edges);
        }

        let t0 = Instant::now();
        let outcome = req.algorithm.engine().search(&graph, &query)?;
        let execution_time_ms = t0.elapsed().as_secs_f64() * 1_000.0;

        // 5) Synthesis under the scenario speed profile.
        let multiplier = self.profiles.multiplier(req.scenario);
        let meta = synthesize(&graph, source, &outcome, multiplier, req.algorithm)?;

        log::info!(
            "plan: {} {:.0} m / {:.0} s in {:.2} ms ({} steps)",
            req.algorithm,
            meta.total_distance_m,
            meta.total_time_s,
            execution_time_ms,
            meta.steps.len(),
        );

        Ok(PlannedRoute {
            snapped_start: graph.node_pos[source.index()],
            snapped_end: graph.node_pos[target.index()],
            execution_time_ms,
            meta,
            outcome,
            graph,
        })
    }

    /// Plan a route and return the JSON-facing response.
    pub fn plan(&self, req: &PathRequest) -> RouteResult<RouteResponse> {
        Ok(self.plan_meta(req)?.into_response())
    }

    fn snap(&self, graph: &RoadGraph, point: GeoPoint) -> RouteResult<nav_core::NodeId> {
        match graph.snap_with_distance(point) {
            Some((id, d)) if d <= self.config.max_snap_m => Ok(id),
            _ => Err(RouteError::Graph(GraphError::SnapFailed {
                point,
                max_m: self.config.max_snap_m,
            })),
        }
    }
}
