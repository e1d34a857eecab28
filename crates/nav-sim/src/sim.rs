//! The `Simulation` struct and its tick function.
//!
//! # Time model
//!
//! The clock maps wall time onto the active route's cumulative-time array:
//!
//! ```text
//! local_time = (wall_now − wall_base) × speed_multiplier
//! sim_time   = time_base + local_time
//! ```
//!
//! `wall_base` is re-based and `time_base` accumulated when a splice is
//! applied, so `sim_time` stays monotonic across route swaps.  `tick` is a
//! pure function of wall time and current state apart from exactly two
//! internal transitions: the atomic splice-apply (when the vehicle reaches
//! the freeze point) and the one-shot arrival latch.  Repeating a tick with
//! the same wall time therefore returns an equal `NavLiveState`.
//!
//! # Mutation discipline
//!
//! One `Simulation` exists per active trip.  It is mutated only by `tick`,
//! `inject_obstacle`, and `complete_reroute` — callers hold it exclusively
//! (`&mut`), so ticks never race a splice.

use nav_core::RequestId;
use nav_route::{LatLng, PathRequest, RouteMeta, RouteResult};

use crate::config::SimTuning;
use crate::live::{ARRIVE_INSTRUCTION, ArrivalSummary, NavLiveState, TickEvent};
use crate::reroute::{
    FreezePoint, InjectOutcome, ReroutePhase, RerouteOutcome, SearchTicket,
};
use crate::splice::build_spliced_route;
use crate::{SimError, SimResult};

/// The authoritative per-trip simulation state.
pub struct Simulation {
    route: RouteMeta,
    tuning: SimTuning,

    /// Destination / algorithm / scenario template for reroute requests.
    request: PathRequest,

    /// Wall seconds at which the active route's local clock started.
    wall_base_s: f64,
    /// Sim seconds accumulated on route segments retired by splices.
    time_base_s: f64,
    /// Wall-to-sim time scale (1.0 = real time).
    speed_multiplier: f64,

    phase: ReroutePhase,
    /// Every obstacle coordinate injected this trip, as `[lat, lng]`.
    blocked_points: Vec<[f64; 2]>,
    /// Newest issued request id; results carrying older ids are stale.
    last_request: RequestId,

    arrived: bool,
}

impl Simulation {
    // ── Construction ──────────────────────────────────────────────────────

    /// Validate `route` and start the clock at `wall_now_s`.
    ///
    /// `request` is the planning request that produced the route; reroutes
    /// reuse its destination, algorithm, and scenario.  No partial state
    /// exists if validation fails.
    pub fn start(
        route: RouteMeta,
        request: PathRequest,
        tuning: SimTuning,
        speed_multiplier: f64,
        wall_now_s: f64,
    ) -> SimResult<Simulation> {
        route.validate()?;
        if !(speed_multiplier.is_finite() && speed_multiplier > 0.0) {
            return Err(SimError::Config(format!(
                "speed multiplier must be positive, got {speed_multiplier}"
            )));
        }
        let blocked_points = request.blocked_edges.clone().unwrap_or_default();
        Ok(Simulation {
            route,
            tuning,
            request,
            wall_base_s: wall_now_s,
            time_base_s: 0.0,
            speed_multiplier,
            phase: ReroutePhase::Active,
            blocked_points,
            last_request: RequestId(0),
            arrived: false,
        })
    }

    /// Discard the trip.  In-flight background results die on the stale-id
    /// guard of whatever simulation (if any) replaces this one.
    pub fn cancel(self) {}

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn route(&self) -> &RouteMeta {
        &self.route
    }

    pub fn phase(&self) -> &ReroutePhase {
        &self.phase
    }

    pub fn is_frozen(&self) -> bool {
        !matches!(self.phase, ReroutePhase::Active)
    }

    /// Local sim-time on the active route for a given wall time.
    fn local_time(&self, wall_now_s: f64) -> f64 {
        (wall_now_s - self.wall_base_s).max(0.0) * self.speed_multiplier
    }

    /// Local time with the freeze clamp applied.
    fn clamped_time(&self, wall_now_s: f64) -> (f64, bool) {
        let t = self.local_time(wall_now_s);
        match self.phase.freeze() {
            Some(freeze) if t >= freeze.time_s => (freeze.time_s, true),
            _ => (t, false),
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance to `wall_now_s` and report the live navigation state.
    pub fn tick(&mut self, wall_now_s: f64) -> TickEvent {
        if self.arrived {
            return TickEvent::Retired;
        }

        // ── Atomic splice application ─────────────────────────────────────
        //
        // Only once the vehicle has reached the freeze point: swapping any
        // earlier would teleport it off its interpolated position.
        let reached_freeze = match &self.phase {
            ReroutePhase::AwaitingSplice { freeze, .. } => {
                self.local_time(wall_now_s) >= freeze.time_s
            }
            _ => false,
        };
        if reached_freeze
            && let ReroutePhase::AwaitingSplice { freeze, pending } =
                std::mem::take(&mut self.phase)
        {
            self.route = *pending;
            self.time_base_s += freeze.time_s;
            self.wall_base_s = wall_now_s;
            log::info!(
                "splice applied at sim-time {:.1} s, {:.0} m route ahead",
                self.time_base_s,
                self.route.total_distance_m
            );
        }

        let (t, frozen) = self.clamped_time(wall_now_s);

        // ── One-shot arrival ──────────────────────────────────────────────
        if !frozen && t >= self.route.total_time_s {
            self.arrived = true;
            let summary = ArrivalSummary {
                position: self.route.coords[self.route.coords.len() - 1],
                total_distance_m: self.route.total_distance_m,
                trip_time_s: self.time_base_s + self.route.total_time_s,
            };
            log::info!(
                "arrived: {:.0} m in {:.1} s sim-time",
                summary.total_distance_m,
                summary.trip_time_s
            );
            return TickEvent::Arrived(summary);
        }

        TickEvent::Live(self.live_state(t, frozen))
    }

    /// Assemble the live state for clamped local time `t`.
    fn live_state(&self, t: f64, frozen: bool) -> NavLiveState {
        let route = &self.route;
        let (position, _) = route.position_at_time(t);
        let distance_m = route.distance_at_time(t);
        let step_i = route.step_index_at(distance_m);

        let (next_instruction, next_at_m) = match route.steps.get(step_i + 1) {
            Some(next) => (next.instruction.clone(), next.start_distance_m),
            None => (ARRIVE_INSTRUCTION.to_string(), route.total_distance_m),
        };

        NavLiveState {
            position,
            sim_time_s: self.time_base_s + t,
            distance_m,
            remaining_distance_m: (route.total_distance_m - distance_m).max(0.0),
            eta_remaining_s: (route.total_time_s - t).max(0.0),
            distance_to_next_maneuver_m: (next_at_m - distance_m).max(0.0),
            next_instruction,
            current_street: route.steps[step_i].street.clone(),
            frozen,
        }
    }

    // ── Obstacle injection ────────────────────────────────────────────────

    /// An obstacle appeared `distance_ahead_m` ahead of the vehicle.
    ///
    /// Within look-ahead range this freezes the simulation at a stand-off
    /// point before the obstacle and returns a [`SearchTicket`] for the
    /// replacement route (excluding every obstacle injected so far).  A
    /// ticket issued here supersedes any outstanding one: its result will be
    /// discarded by the id guard even if it arrives later.
    pub fn inject_obstacle(
        &mut self,
        wall_now_s: f64,
        distance_ahead_m: f64,
    ) -> InjectOutcome {
        if self.arrived {
            return InjectOutcome::Retired;
        }
        if distance_ahead_m >= self.tuning.look_ahead_m {
            return InjectOutcome::Deferred;
        }

        let (t, _) = self.clamped_time(wall_now_s);
        let current_m = self.route.distance_at_time(t);
        let obstacle_m = current_m + distance_ahead_m.max(0.0);
        if obstacle_m >= self.route.total_distance_m {
            return InjectOutcome::Deferred;
        }

        let obstacle = self.route.point_at_distance(obstacle_m);
        self.blocked_points.push([obstacle.lat, obstacle.lon]);

        // Freeze a stand-off short of the obstacle, never behind the vehicle,
        // and never looser than an already-established freeze.
        let mut freeze_m = (obstacle_m - self.tuning.standoff_m).max(current_m);
        if let Some(existing) = self.phase.freeze() {
            freeze_m = freeze_m.min(existing.distance_m).max(current_m);
        }

        let freeze = FreezePoint {
            index: self.route.index_at_distance(freeze_m),
            distance_m: freeze_m,
            time_s: self.route.time_at_distance(freeze_m),
            position: self.route.point_at_distance(freeze_m),
        };

        self.last_request = self.last_request.next();
        let ticket = SearchTicket {
            id: self.last_request,
            request: PathRequest {
                start: LatLng::from(freeze.position),
                end: self.request.end,
                algorithm: self.request.algorithm,
                scenario: self.request.scenario,
                blocked_edges: Some(self.blocked_points.clone()),
                include_exploration: false,
            },
        };

        log::info!(
            "obstacle at {:.0} m (vehicle at {:.0} m): frozen at {:.0} m, request {}",
            obstacle_m,
            current_m,
            freeze.distance_m,
            ticket.id
        );

        // Any pending splice is invalidated: it may run through the new
        // obstacle.  The fresh request carries the full blocked set.
        self.phase = ReroutePhase::Frozen { freeze, request: self.last_request };
        InjectOutcome::Frozen(ticket)
    }

    // ── Reroute completion ────────────────────────────────────────────────

    /// Deliver the result of a background search.
    ///
    /// Only the newest outstanding request is honored; everything else is
    /// discarded as stale.  On success, the replacement is spliced onto the
    /// freeze point and held pending atomic application by `tick`.
    pub fn complete_reroute(
        &mut self,
        id: RequestId,
        result: RouteResult<RouteMeta>,
    ) -> RerouteOutcome {
        let ReroutePhase::Frozen { freeze, request } = &self.phase else {
            log::debug!("reroute {id} discarded: no request outstanding");
            return RerouteOutcome::Stale;
        };
        if *request != id {
            log::debug!("reroute {id} discarded: superseded by {request}");
            return RerouteOutcome::Stale;
        }

        let replacement = match result {
            Ok(meta) => meta,
            Err(e) => {
                // Known gap: the vehicle stays frozen with no timeout.
                log::warn!("reroute {id} failed, vehicle remains frozen: {e}");
                return RerouteOutcome::Failed;
            }
        };

        match build_spliced_route(&self.route, freeze, &replacement, &self.tuning) {
            Ok(combined) => {
                let freeze = freeze.clone();
                self.phase =
                    ReroutePhase::AwaitingSplice { freeze, pending: Box::new(combined) };
                RerouteOutcome::SplicePending
            }
            Err(e) => {
                log::warn!("splice assembly for {id} failed, vehicle remains frozen: {e}");
                RerouteOutcome::Failed
            }
        }
    }
}
