//! Per-tick outputs of the simulation.

use nav_core::GeoPoint;

/// Instruction text emitted when the route's last step is underway.
pub const ARRIVE_INSTRUCTION: &str = "Arrive at destination";

/// Live navigation state for one tick.
///
/// A pure function of wall time and simulation state: calling
/// [`Simulation::tick`][crate::Simulation::tick] twice with the same wall
/// time yields an equal (`==`) value.
#[derive(Clone, Debug, PartialEq)]
pub struct NavLiveState {
    /// Interpolated vehicle position.
    pub position: GeoPoint,

    /// Elapsed trip sim-time in seconds, monotonic across splices.
    pub sim_time_s: f64,

    /// Metres travelled along the active route.
    pub distance_m: f64,
    pub remaining_distance_m: f64,

    /// Seconds of driving left on the active route.
    pub eta_remaining_s: f64,

    /// Metres until the next maneuver (or until arrival on the last step).
    pub distance_to_next_maneuver_m: f64,
    pub next_instruction: String,
    pub current_street: String,

    /// `true` while the vehicle is held at a freeze point awaiting a reroute.
    pub frozen: bool,
}

/// Terminal report, emitted exactly once per route.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrivalSummary {
    pub position: GeoPoint,
    pub total_distance_m: f64,
    /// Total trip sim-time including any pre-splice segments.
    pub trip_time_s: f64,
}

/// What one call to `tick` produced.
#[derive(Clone, Debug, PartialEq)]
pub enum TickEvent {
    /// The vehicle is en route (possibly frozen).
    Live(NavLiveState),
    /// The vehicle just arrived; the caller should retire the route.
    Arrived(ArrivalSummary),
    /// The route was already retired by an earlier `Arrived`.
    Retired,
}
