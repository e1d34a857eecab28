//! Simulation tuning parameters.

/// Distances governing obstacle handling and route splicing.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to [`Simulation::start`][crate::Simulation::start].
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Obstacles at or beyond this distance ahead of the vehicle are
    /// deferred: no freeze, no reroute request.
    pub look_ahead_m: f64,

    /// Stand-off: the vehicle freezes this far before an obstacle rather
    /// than driving into the blocked geometry.  Must exceed the planner's
    /// `block_radius_m` so the freeze point snaps outside the closed
    /// neighborhood when the reroute is planned.
    pub standoff_m: f64,

    /// How far back along the old route the splicer searches for a junction
    /// shared with the replacement route.
    pub look_back_window_m: f64,

    /// A junction counts as shared when an old-route vertex lies within this
    /// distance of the replacement route's first coordinate.  Also the
    /// position-continuity bound across an applied splice.
    pub splice_tolerance_m: f64,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            look_ahead_m: 1_500.0,
            standoff_m: 150.0,
            look_back_window_m: 250.0,
            splice_tolerance_m: 15.0,
        }
    }
}
