//! Multi-leg itineraries.
//!
//! A trip is a sequence of independent route requests.  On arrival at the end
//! of each leg the current route is retired, the next leg is planned from the
//! hand-off point, and the clock restarts.  Which legs to drive (and in what
//! order) is the caller's policy; `Trip` only owns the hand-off contract.

use std::collections::VecDeque;

use nav_graph::GraphProvider;
use nav_route::{PathRequest, RoutePlanner};

use crate::config::SimTuning;
use crate::live::{ArrivalSummary, NavLiveState, TickEvent};
use crate::sim::Simulation;
use crate::{SimError, SimResult};

/// What one call to [`Trip::tick`] produced.
#[derive(Clone, Debug, PartialEq)]
pub enum TripEvent {
    /// The current leg is underway.
    Live(NavLiveState),
    /// A leg finished and the next one has started.
    LegCompleted(ArrivalSummary),
    /// The final leg finished; the trip is over.
    Finished(ArrivalSummary),
    /// The trip already finished (or was never begun).
    Idle,
}

/// Drives an ordered list of legs through one [`Simulation`] at a time.
pub struct Trip<P: GraphProvider> {
    planner: RoutePlanner<P>,
    tuning: SimTuning,
    speed_multiplier: f64,
    legs: VecDeque<PathRequest>,
    current: Option<Simulation>,
    completed: Vec<ArrivalSummary>,
}

impl<P: GraphProvider> Trip<P> {
    pub fn new(
        planner: RoutePlanner<P>,
        tuning: SimTuning,
        speed_multiplier: f64,
        legs: Vec<PathRequest>,
    ) -> Self {
        Self {
            planner,
            tuning,
            speed_multiplier,
            legs: legs.into(),
            current: None,
            completed: Vec::new(),
        }
    }

    /// Plan and start the first leg.
    pub fn begin(&mut self, wall_now_s: f64) -> SimResult<()> {
        let leg = self.legs.pop_front().ok_or(SimError::NoActiveLeg)?;
        self.start_leg(leg, wall_now_s)
    }

    fn start_leg(&mut self, leg: PathRequest, wall_now_s: f64) -> SimResult<()> {
        let planned = self.planner.plan_meta(&leg)?;
        self.current = Some(Simulation::start(
            planned.meta,
            leg,
            self.tuning.clone(),
            self.speed_multiplier,
            wall_now_s,
        )?);
        Ok(())
    }

    /// Tick the active leg, handing off to the next leg on arrival.
    pub fn tick(&mut self, wall_now_s: f64) -> SimResult<TripEvent> {
        let Some(sim) = self.current.as_mut() else {
            return Ok(TripEvent::Idle);
        };
        match sim.tick(wall_now_s) {
            TickEvent::Live(state) => Ok(TripEvent::Live(state)),
            TickEvent::Retired => Ok(TripEvent::Idle),
            TickEvent::Arrived(summary) => {
                // Retire the finished leg, then restart the clock on the next.
                self.current = None;
                self.completed.push(summary.clone());
                match self.legs.pop_front() {
                    Some(next) => {
                        self.start_leg(next, wall_now_s)?;
                        Ok(TripEvent::LegCompleted(summary))
                    }
                    None => Ok(TripEvent::Finished(summary)),
                }
            }
        }
    }

    /// The active leg's simulation, for obstacle injection and reroute
    /// completion.
    pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.current.as_mut()
    }

    /// Arrival summaries of the legs completed so far.
    pub fn completed(&self) -> &[ArrivalSummary] {
        &self.completed
    }

    /// Legs not yet started.
    pub fn remaining_legs(&self) -> usize {
        self.legs.len()
    }
}
