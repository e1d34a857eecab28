//! Reroute state machine types.
//!
//! The machine lives inside [`Simulation`][crate::Simulation] and moves
//! through `Active → Frozen → AwaitingSplice → Active`:
//!
//! - **Active**: driving the route, no obstacle outstanding.
//! - **Frozen**: an obstacle was injected within look-ahead range.  The
//!   vehicle will not advance past the freeze point, and a background
//!   [`SearchTicket`] is outstanding.
//! - **AwaitingSplice**: the replacement route arrived and was spliced onto
//!   the freeze point; it is applied atomically once the vehicle reaches
//!   that point — never mid-motion.
//!
//! A reroute failure leaves the machine `Frozen`: there is deliberately no
//! timeout that unfreezes the vehicle, so callers watching
//! `NavLiveState::frozen` decide when to abandon or retry.

use nav_core::{GeoPoint, RequestId};
use nav_route::{PathRequest, RouteMeta};

// ── Freeze point ──────────────────────────────────────────────────────────────

/// The point on the active route where the vehicle halts ahead of an
/// obstacle, resolved in every domain the tick path needs: polyline index,
/// distance, local sim-time, and position.
#[derive(Clone, Debug, PartialEq)]
pub struct FreezePoint {
    /// Smallest route index at or past the freeze distance.
    pub index: usize,
    /// Metres from the route origin.
    pub distance_m: f64,
    /// Local sim-time (seconds) at which the vehicle reaches the point.
    pub time_s: f64,
    pub position: GeoPoint,
}

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Current reroute phase.  See the module docs for the transition diagram.
#[derive(Clone, Debug, Default)]
pub enum ReroutePhase {
    #[default]
    Active,
    Frozen {
        freeze: FreezePoint,
        /// The outstanding request.  Results carrying any other id are stale
        /// and discarded on arrival.
        request: RequestId,
    },
    AwaitingSplice {
        freeze: FreezePoint,
        /// The spliced replacement, swapped in when the vehicle reaches the
        /// freeze point.
        pending: Box<RouteMeta>,
    },
}

impl ReroutePhase {
    /// The freeze point, in any phase that has one.
    pub fn freeze(&self) -> Option<&FreezePoint> {
        match self {
            ReroutePhase::Active => None,
            ReroutePhase::Frozen { freeze, .. }
            | ReroutePhase::AwaitingSplice { freeze, .. } => Some(freeze),
        }
    }
}

// ── Tickets & outcomes ────────────────────────────────────────────────────────

/// A background search request issued by the reroute manager.
///
/// The simulation never blocks on it: the caller executes the request on a
/// worker (see [`BackgroundPlanner`][crate::BackgroundPlanner]) and feeds the
/// result back via `Simulation::complete_reroute` with the same id.
#[derive(Clone, Debug)]
pub struct SearchTicket {
    pub id: RequestId,
    pub request: PathRequest,
}

/// What `Simulation::inject_obstacle` did.
#[derive(Debug)]
pub enum InjectOutcome {
    /// The vehicle froze (or an existing freeze tightened) and a new search
    /// ticket replaced any outstanding one.
    Frozen(SearchTicket),
    /// The obstacle is beyond the look-ahead distance (or past the route
    /// end); nothing changed.  Re-inject when closer.
    Deferred,
    /// The route is already retired.
    Retired,
}

/// What `Simulation::complete_reroute` did with a delivered result.
#[derive(Debug, PartialEq)]
pub enum RerouteOutcome {
    /// The replacement was spliced and is pending atomic application.
    SplicePending,
    /// The result's id was superseded (or nothing was outstanding); it was
    /// discarded.
    Stale,
    /// The search (or the splice assembly) failed; the vehicle stays frozen.
    Failed,
}
