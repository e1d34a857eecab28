//! Maneuver classification and turn-by-turn steps.

use nav_core::bearing_delta_deg;

// ── Maneuver ──────────────────────────────────────────────────────────────────

/// The kind of maneuver that begins a step.
///
/// `Depart` labels the first step of every route and `UTurn` labels the
/// doubling-back transition of a spliced reroute; the remaining variants come
/// from bucketing the bearing change between consecutive edges.  Arrival is
/// not a step — the simulation's terminal state yields it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Depart,
    Continue,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
    UTurn,
}

/// Bearing-change thresholds (degrees) between the maneuver buckets.
const CONTINUE_MAX_DEG: f64 = 20.0;
const SLIGHT_MAX_DEG: f64 = 60.0;
const TURN_MAX_DEG: f64 = 120.0;

/// A new step begins when the turn angle reaches this, even on the same street.
pub(crate) const STEP_TURN_THRESHOLD_DEG: f64 = 35.0;

impl Maneuver {
    /// Bucket a signed bearing delta (degrees, positive = right) into a
    /// maneuver kind.
    pub fn classify(delta_deg: f64) -> Maneuver {
        let ad = delta_deg.abs();
        if ad < CONTINUE_MAX_DEG {
            Maneuver::Continue
        } else if ad < SLIGHT_MAX_DEG {
            if delta_deg > 0.0 { Maneuver::SlightRight } else { Maneuver::SlightLeft }
        } else if ad < TURN_MAX_DEG {
            if delta_deg > 0.0 { Maneuver::Right } else { Maneuver::Left }
        } else if delta_deg > 0.0 {
            Maneuver::SharpRight
        } else {
            Maneuver::SharpLeft
        }
    }

    /// Classify the turn from bearing `from_deg` onto bearing `to_deg`.
    pub fn between_bearings(from_deg: f64, to_deg: f64) -> Maneuver {
        Maneuver::classify(bearing_delta_deg(from_deg, to_deg))
    }

    /// Spoken-style instruction for this maneuver onto `street`.
    pub fn instruction(self, street: &str) -> String {
        let st = if street.is_empty() { "the road" } else { street };
        match self {
            Maneuver::Depart => format!("Head out on {st}"),
            Maneuver::Continue => format!("Continue on {st}"),
            Maneuver::SlightLeft => format!("Slight left onto {st}"),
            Maneuver::SlightRight => format!("Slight right onto {st}"),
            Maneuver::Left => format!("Turn left onto {st}"),
            Maneuver::Right => format!("Turn right onto {st}"),
            Maneuver::SharpLeft => format!("Sharp left onto {st}"),
            Maneuver::SharpRight => format!("Sharp right onto {st}"),
            Maneuver::UTurn => format!("Double back along {st}"),
        }
    }
}

// ── NavStep ───────────────────────────────────────────────────────────────────

/// One labeled sub-interval of a route's distance domain.
///
/// Steps partition `[0, total_distance)`: `steps[0].start_distance_m == 0`
/// and each step's end is the next step's start, with no gap or overlap.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct NavStep {
    pub id: u32,
    pub instruction: String,
    pub street: String,
    pub start_distance_m: f64,
    pub end_distance_m: f64,
    pub maneuver: Maneuver,
}

impl NavStep {
    /// Length of the step's distance interval.
    #[inline]
    pub fn length_m(&self) -> f64 {
        self.end_distance_m - self.start_distance_m
    }

    /// `true` if `distance_m` falls inside this step's interval.
    #[inline]
    pub fn contains(&self, distance_m: f64) -> bool {
        distance_m >= self.start_distance_m && distance_m < self.end_distance_m
    }
}
