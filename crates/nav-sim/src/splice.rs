//! Splice assembly: join a replacement route onto the freeze point.
//!
//! The combined route starts exactly at the freeze point, so the atomic swap
//! in `tick` moves the vehicle by zero distance.  Its time axis is rebuilt at
//! one constant implied speed across both the transition segment and the
//! replacement, so the splice introduces no speed discontinuity either.

use nav_core::GeoPoint;
use nav_route::step::Maneuver;
use nav_route::{NavStep, RouteMeta, RouteResult};

use crate::config::SimTuning;
use crate::reroute::FreezePoint;

/// Floor for the implied speed when the replacement route is degenerate
/// (zero time or zero length).
const MIN_IMPLIED_SPEED_MPS: f64 = 0.1;

/// Build the combined route: backtrack transition + replacement.
///
/// The transition is the reversed old-route sub-path from the freeze point
/// back to a junction within `splice_tolerance_m` of the replacement's first
/// coordinate, searched over at most `look_back_window_m` of the old route;
/// if no junction qualifies, the transition is a straight line.
pub fn build_spliced_route(
    old: &RouteMeta,
    freeze: &FreezePoint,
    replacement: &RouteMeta,
    tuning: &SimTuning,
) -> RouteResult<RouteMeta> {
    let new_start = replacement.coords[0];

    // ── Transition coordinates (freeze point first) ───────────────────────
    let mut coords: Vec<GeoPoint> = vec![freeze.position];

    // Last old-route vertex at or before the freeze distance.
    let last_before = old
        .cum_distance_m
        .partition_point(|&d| d <= freeze.distance_m)
        .saturating_sub(1);

    // Scan backward within the look-back window for a vertex adjacent to the
    // replacement's start.
    let mut junction: Option<usize> = None;
    for j in (0..=last_before).rev() {
        if freeze.distance_m - old.cum_distance_m[j] > tuning.look_back_window_m {
            break;
        }
        if old.coords[j].distance_m(new_start) <= tuning.splice_tolerance_m {
            junction = Some(j);
            break;
        }
    }

    match junction {
        Some(j) => {
            // Drive back over the old route's vertices to the junction.
            for k in (j..=last_before).rev() {
                if old.coords[k] != coords[coords.len() - 1] {
                    coords.push(old.coords[k]);
                }
            }
            log::debug!(
                "splice: junction at old index {j}, {} backtrack vertices",
                coords.len() - 1
            );
        }
        None => {
            // Straight-line transition directly to the replacement's start.
            if new_start != freeze.position {
                coords.push(new_start);
            }
            log::debug!("splice: no junction within window, straight-line transition");
        }
    }

    // ── Append the replacement polyline ───────────────────────────────────
    let transition_points = coords.len();
    for &p in &replacement.coords {
        if p != coords[coords.len() - 1] {
            coords.push(p);
        }
    }

    // ── Distance axis: great-circle prefix sums ───────────────────────────
    let mut cum_distance_m = vec![0.0; coords.len()];
    for i in 1..coords.len() {
        cum_distance_m[i] = cum_distance_m[i - 1] + coords[i - 1].distance_m(coords[i]);
    }
    let total_distance_m = cum_distance_m[cum_distance_m.len() - 1];
    let transition_len_m = cum_distance_m[transition_points - 1];

    // ── Time axis: one constant implied speed end to end ──────────────────
    let implied_speed_mps = if replacement.total_time_s > 0.0 {
        (replacement.total_distance_m / replacement.total_time_s).max(MIN_IMPLIED_SPEED_MPS)
    } else {
        MIN_IMPLIED_SPEED_MPS
    };
    let cum_time_s: Vec<f64> = cum_distance_m.iter().map(|&d| d / implied_speed_mps).collect();
    let total_time_s = cum_time_s[cum_time_s.len() - 1];

    // ── Steps: transition (if any length) + shifted replacement steps ─────
    let mut steps: Vec<NavStep> = Vec::with_capacity(replacement.steps.len() + 1);
    if transition_len_m > 0.0 {
        let street = old.steps[old.step_index_at(freeze.distance_m)].street.clone();
        steps.push(NavStep {
            id: 0,
            instruction: Maneuver::UTurn.instruction(&street),
            street,
            start_distance_m: 0.0,
            end_distance_m: transition_len_m,
            maneuver: Maneuver::UTurn,
        });
    }
    let mut cursor = transition_len_m;
    for step in &replacement.steps {
        // Re-anchor each step onto the combined distance axis, preserving
        // the original proportions.  The last step absorbs any rounding gap.
        let len = step.length_m();
        steps.push(NavStep {
            id: steps.len() as u32,
            instruction: step.instruction.clone(),
            street: step.street.clone(),
            start_distance_m: cursor,
            end_distance_m: cursor + len,
            maneuver: step.maneuver,
        });
        cursor += len;
    }
    if let Some(last) = steps.last_mut() {
        last.end_distance_m = total_distance_m;
    }

    let meta = RouteMeta {
        coords,
        cum_distance_m,
        cum_time_s,
        steps,
        total_distance_m,
        total_time_s,
        algorithm: replacement.algorithm,
    };
    meta.validate()?;
    Ok(meta)
}
