//! Navigable route metadata: the polyline, its cumulative distance/time
//! arrays, and the step sequence.
//!
//! # Invariants
//!
//! A valid `RouteMeta` guarantees (checked by [`RouteMeta::validate`]):
//!
//! - `coords`, `cum_distance_m`, and `cum_time_s` have the same, non-zero
//!   length;
//! - both cumulative arrays start at 0 and are non-decreasing;
//! - steps partition `[0, total_distance_m)`: `steps[0]` starts at 0, each
//!   step's end equals the next step's start, and the last step ends at the
//!   total distance.
//!
//! Everything downstream — interpolation, freezing, splicing — indexes these
//! arrays without re-checking, so the simulation validates a route once in
//! `start()` and trusts it afterwards.

use nav_core::GeoPoint;
use nav_graph::SearchAlgorithm;

use crate::step::NavStep;
use crate::{RouteError, RouteResult};

/// A fully synthesized route, ready to simulate.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RouteMeta {
    /// Route polyline.  Same length as both cumulative arrays.
    pub coords: Vec<GeoPoint>,

    /// Metres travelled from the origin to each point.  Non-decreasing.
    pub cum_distance_m: Vec<f64>,

    /// Seconds elapsed from departure to each point.  Non-decreasing.
    pub cum_time_s: Vec<f64>,

    /// Turn-by-turn steps partitioning the distance domain.
    pub steps: Vec<NavStep>,

    pub total_distance_m: f64,
    pub total_time_s: f64,

    /// Which engine produced the underlying path.
    pub algorithm: SearchAlgorithm,
}

impl RouteMeta {
    // ── Validation ────────────────────────────────────────────────────────

    /// Check every structural invariant.  Call before simulation starts;
    /// a malformed route must never reach the tick path.
    pub fn validate(&self) -> RouteResult<()> {
        let n = self.coords.len();
        if n == 0 {
            return Err(RouteError::MalformedRoute("empty coordinate sequence"));
        }
        if self.cum_distance_m.len() != n || self.cum_time_s.len() != n {
            return Err(RouteError::MalformedRoute(
                "coordinate and cumulative arrays differ in length",
            ));
        }
        if self.cum_distance_m[0] != 0.0 || self.cum_time_s[0] != 0.0 {
            return Err(RouteError::MalformedRoute("cumulative arrays must start at 0"));
        }
        for w in self.cum_distance_m.windows(2) {
            if w[1] < w[0] {
                return Err(RouteError::MalformedRoute("cum_distance_m decreases"));
            }
        }
        for w in self.cum_time_s.windows(2) {
            if w[1] < w[0] {
                return Err(RouteError::MalformedRoute("cum_time_s decreases"));
            }
        }

        if self.steps.is_empty() {
            return Err(RouteError::MalformedRoute("no steps"));
        }
        if self.steps[0].start_distance_m != 0.0 {
            return Err(RouteError::MalformedRoute("first step must start at 0"));
        }
        for pair in self.steps.windows(2) {
            if pair[0].end_distance_m != pair[1].start_distance_m {
                return Err(RouteError::MalformedRoute("steps leave a gap or overlap"));
            }
        }
        let last_end = self.steps[self.steps.len() - 1].end_distance_m;
        if (last_end - self.total_distance_m).abs() > 1e-6 {
            return Err(RouteError::MalformedRoute(
                "steps do not cover the full distance domain",
            ));
        }
        Ok(())
    }

    // ── Time-domain lookups ───────────────────────────────────────────────

    /// Smallest index `i` with `cum_time_s[i] >= t`, clamped to the last
    /// point for `t` past the end.
    pub fn index_at_time(&self, t: f64) -> usize {
        self.cum_time_s
            .partition_point(|&ct| ct < t)
            .min(self.coords.len() - 1)
    }

    /// Interpolated position and the bracketing upper index at sim-time `t`.
    pub fn position_at_time(&self, t: f64) -> (GeoPoint, usize) {
        let i = self.index_at_time(t);
        if i == 0 {
            return (self.coords[0], 0);
        }
        let (t0, t1) = (self.cum_time_s[i - 1], self.cum_time_s[i]);
        let frac = if t1 > t0 { ((t - t0) / (t1 - t0)).clamp(0.0, 1.0) } else { 1.0 };
        (self.coords[i - 1].lerp(self.coords[i], frac), i)
    }

    /// Interpolated distance travelled at sim-time `t`.
    pub fn distance_at_time(&self, t: f64) -> f64 {
        let i = self.index_at_time(t);
        if i == 0 {
            return 0.0;
        }
        let (t0, t1) = (self.cum_time_s[i - 1], self.cum_time_s[i]);
        let frac = if t1 > t0 { ((t - t0) / (t1 - t0)).clamp(0.0, 1.0) } else { 1.0 };
        let (d0, d1) = (self.cum_distance_m[i - 1], self.cum_distance_m[i]);
        d0 + (d1 - d0) * frac
    }

    // ── Distance-domain lookups ───────────────────────────────────────────

    /// Smallest index `i` with `cum_distance_m[i] >= d`, clamped to the last
    /// point.
    pub fn index_at_distance(&self, d: f64) -> usize {
        self.cum_distance_m
            .partition_point(|&cd| cd < d)
            .min(self.coords.len() - 1)
    }

    /// Interpolated position at distance `d` along the route.
    pub fn point_at_distance(&self, d: f64) -> GeoPoint {
        let i = self.index_at_distance(d);
        if i == 0 {
            return self.coords[0];
        }
        let (d0, d1) = (self.cum_distance_m[i - 1], self.cum_distance_m[i]);
        let frac = if d1 > d0 { ((d - d0) / (d1 - d0)).clamp(0.0, 1.0) } else { 1.0 };
        self.coords[i - 1].lerp(self.coords[i], frac)
    }

    /// Time at which the vehicle reaches distance `d` (interpolated).
    pub fn time_at_distance(&self, d: f64) -> f64 {
        let i = self.index_at_distance(d);
        if i == 0 {
            return 0.0;
        }
        let (d0, d1) = (self.cum_distance_m[i - 1], self.cum_distance_m[i]);
        let frac = if d1 > d0 { ((d - d0) / (d1 - d0)).clamp(0.0, 1.0) } else { 1.0 };
        let (t0, t1) = (self.cum_time_s[i - 1], self.cum_time_s[i]);
        t0 + (t1 - t0) * frac
    }

    /// Index of the step whose interval contains distance `d`.  Distances at
    /// or past the end resolve to the last step.
    pub fn step_index_at(&self, d: f64) -> usize {
        self.steps
            .partition_point(|s| s.end_distance_m <= d)
            .min(self.steps.len() - 1)
    }
}
