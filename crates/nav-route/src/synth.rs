//! Route synthesis: node path → polyline, cumulative arrays, and steps.

use nav_core::{GeoPoint, NodeId};
use nav_graph::{RoadGraph, SearchAlgorithm, SearchOutcome};

use crate::meta::RouteMeta;
use crate::step::{Maneuver, NavStep, STEP_TURN_THRESHOLD_DEG};
use crate::RouteResult;

/// Floor on effective edge speed so a zero-speed edge can't produce an
/// infinite segment time.
const MIN_SPEED_MPS: f64 = 0.1;

/// Steps shorter than this on the same street merge into their predecessor.
const STEP_MERGE_MAX_M: f64 = 30.0;

/// Per-edge attributes gathered while expanding the polyline.
struct EdgeSpan {
    /// Polyline segment index: the edge covers `coords[i] .. coords[i + 1]`.
    seg: usize,
    street: u32,
    speed_kph: f64,
    bearing_deg: f64,
}

/// Convert a search outcome into navigable route metadata.
///
/// `speed_multiplier` is the scenario profile already resolved by the caller
/// (see [`ScenarioProfiles`][nav_core::ScenarioProfiles]); edge travel time
/// is `segment distance / (edge speed × multiplier)`.
///
/// The result always passes [`RouteMeta::validate`].
pub fn synthesize(
    graph: &RoadGraph,
    source: NodeId,
    outcome: &SearchOutcome,
    speed_multiplier: f64,
    algorithm: SearchAlgorithm,
) -> RouteResult<RouteMeta> {
    // ── Polyline + per-edge spans ─────────────────────────────────────────
    let mut coords: Vec<GeoPoint> = Vec::with_capacity(outcome.edges.len() + 1);
    coords.push(graph.node_pos[source.index()]);

    let mut spans: Vec<EdgeSpan> = Vec::with_capacity(outcome.edges.len());
    for &edge in &outcome.edges {
        let e = edge.index();
        let next = graph.node_pos[graph.edge_to[e].index()];
        let prev = coords[coords.len() - 1];
        spans.push(EdgeSpan {
            seg: coords.len() - 1,
            street: graph.edge_street[e],
            speed_kph: graph.edge_speed_kph[e],
            bearing_deg: prev.bearing_deg(next),
        });
        coords.push(next);
    }

    // ── Cumulative distance: great-circle prefix sums ─────────────────────
    let mut cum_distance_m = vec![0.0; coords.len()];
    for i in 1..coords.len() {
        cum_distance_m[i] = cum_distance_m[i - 1] + coords[i - 1].distance_m(coords[i]);
    }

    // ── Cumulative time: per-edge distance over scenario-scaled speed ─────
    let mut cum_time_s = vec![0.0; coords.len()];
    for span in &spans {
        let i = span.seg;
        let seg_dist = cum_distance_m[i + 1] - cum_distance_m[i];
        let speed_mps = (span.speed_kph / 3.6 * speed_multiplier).max(MIN_SPEED_MPS);
        cum_time_s[i + 1] = cum_time_s[i] + seg_dist / speed_mps;
    }
    // Monotonicity fix-up for float noise.
    for i in 1..cum_time_s.len() {
        if cum_time_s[i] < cum_time_s[i - 1] {
            cum_time_s[i] = cum_time_s[i - 1];
        }
    }

    let total_distance_m = cum_distance_m[cum_distance_m.len() - 1];
    let total_time_s = cum_time_s[cum_time_s.len() - 1];

    // ── Steps ─────────────────────────────────────────────────────────────
    let steps = build_steps(graph, &spans, &cum_distance_m, total_distance_m);

    let meta = RouteMeta {
        coords,
        cum_distance_m,
        cum_time_s,
        steps,
        total_distance_m,
        total_time_s,
        algorithm,
    };
    meta.validate()?;
    Ok(meta)
}

/// Derive turn-by-turn steps from the edge spans.
///
/// A new step begins whenever the street name changes or the bearing delta
/// between consecutive edges reaches [`STEP_TURN_THRESHOLD_DEG`].  The first
/// step is always `Depart`.  Steps shorter than [`STEP_MERGE_MAX_M`] on the
/// same street fold into their predecessor so jittery digitization does not
/// produce stuttering instructions.
fn build_steps(
    graph: &RoadGraph,
    spans: &[EdgeSpan],
    cum_distance_m: &[f64],
    total_distance_m: f64,
) -> Vec<NavStep> {
    if spans.is_empty() {
        // Degenerate single-point route: one zero-length departure step.
        return vec![NavStep {
            id: 0,
            instruction: Maneuver::Depart.instruction(""),
            street: String::new(),
            start_distance_m: 0.0,
            end_distance_m: total_distance_m,
            maneuver: Maneuver::Depart,
        }];
    }

    let street_of = |span: &EdgeSpan| graph.street_names[span.street as usize].clone();

    let mut steps: Vec<NavStep> = Vec::new();
    let mut step_first_edge = 0usize;
    let mut step_maneuver = Maneuver::Depart;

    let finalize = |steps: &mut Vec<NavStep>, first: usize, last: usize, maneuver: Maneuver| {
        let street = street_of(&spans[first]);
        steps.push(NavStep {
            id: steps.len() as u32,
            instruction: maneuver.instruction(&street),
            street,
            start_distance_m: cum_distance_m[spans[first].seg],
            end_distance_m: cum_distance_m[spans[last].seg + 1],
            maneuver,
        });
    };

    for i in 1..spans.len() {
        let delta = nav_core::bearing_delta_deg(spans[i - 1].bearing_deg, spans[i].bearing_deg);
        let street_changed = spans[i].street != spans[i - 1].street;
        let turned = delta.abs() >= STEP_TURN_THRESHOLD_DEG;

        if street_changed || turned {
            finalize(&mut steps, step_first_edge, i - 1, step_maneuver);
            step_first_edge = i;
            step_maneuver = Maneuver::classify(delta);
        }
    }
    finalize(&mut steps, step_first_edge, spans.len() - 1, step_maneuver);

    // ── Merge stutter steps ───────────────────────────────────────────────
    let mut merged: Vec<NavStep> = Vec::with_capacity(steps.len());
    for step in steps {
        match merged.last_mut() {
            Some(prev) if step.street == prev.street && step.length_m() < STEP_MERGE_MAX_M => {
                prev.end_distance_m = step.end_distance_m;
            }
            _ => merged.push(step),
        }
    }
    for (i, step) in merged.iter_mut().enumerate() {
        step.id = i as u32;
    }
    merged
}
