//! JSON-facing request/response types.
//!
//! Coordinate conventions follow the map-client contract: requests carry
//! `{lat, lng}` objects and `[lat, lng]` blocked points; responses carry
//! GeoJSON-ordered `[lng, lat]` pairs.

use nav_core::{GeoPoint, Scenario};
use nav_graph::SearchAlgorithm;

use crate::step::NavStep;

// ── Request ───────────────────────────────────────────────────────────────────

/// A `{lat, lng}` coordinate as sent by clients.
#[derive(Copy, Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for GeoPoint {
    fn from(c: LatLng) -> GeoPoint {
        GeoPoint::new(c.lat, c.lng)
    }
}

impl From<GeoPoint> for LatLng {
    fn from(p: GeoPoint) -> LatLng {
        LatLng { lat: p.lat, lng: p.lon }
    }
}

/// A route-planning request.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PathRequest {
    pub start: LatLng,
    pub end: LatLng,

    #[serde(default)]
    pub algorithm: SearchAlgorithm,

    #[serde(default)]
    pub scenario: Scenario,

    /// `[lat, lng]` points near which edges are closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_edges: Option<Vec<[f64; 2]>>,

    /// Capture the edges the search examined, for overlay rendering.
    #[serde(default)]
    pub include_exploration: bool,
}

impl PathRequest {
    pub fn new(start: LatLng, end: LatLng) -> Self {
        Self {
            start,
            end,
            algorithm: SearchAlgorithm::default(),
            scenario: Scenario::default(),
            blocked_edges: None,
            include_exploration: false,
        }
    }

    /// Blocked points as `GeoPoint`s (empty when none were supplied).
    pub fn blocked_points(&self) -> Vec<GeoPoint> {
        self.blocked_edges
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|&[lat, lng]| GeoPoint::new(lat, lng))
            .collect()
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// A planned route in wire form.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RouteResponse {
    pub algorithm: SearchAlgorithm,

    /// Pathfinding time only — graph fetch and snapping are excluded.
    pub execution_time_ms: f64,

    /// Route polyline as `[lng, lat]` pairs.
    pub path_coordinates: Vec<[f64; 2]>,
    /// `[lng, lat]` of the road node the start snapped onto.
    pub snapped_start: [f64; 2],
    /// `[lng, lat]` of the road node the end snapped onto.
    pub snapped_end: [f64; 2],

    pub total_distance_m: f64,
    pub total_time_s: f64,
    /// Same length as `path_coordinates`.
    pub cum_distance_m: Vec<f64>,
    /// Same length as `path_coordinates`.
    pub cum_time_s: Vec<f64>,
    pub steps: Vec<NavStep>,

    /// Explored edges as `[[lng, lat], [lng, lat]]` segments, in visitation
    /// order, capped by the planner's trace limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explored_coords: Option<Vec<[[f64; 2]; 2]>>,
    /// Accurate examined-edge count, even when `explored_coords` was capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explored_count: Option<usize>,
}

// ── Coordinate rounding ───────────────────────────────────────────────────────

/// Round to six decimal places (~0.1 m) — keeps payloads compact without
/// visible position error.
#[inline]
pub(crate) fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// `[lng, lat]` wire pair for a point, rounded.
#[inline]
pub(crate) fn lng_lat(p: GeoPoint) -> [f64; 2] {
    [round6(p.lon), round6(p.lat)]
}
