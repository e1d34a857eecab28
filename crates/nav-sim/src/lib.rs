//! `nav-sim` — the real-time vehicle simulation over planned routes.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`sim`]      | `Simulation` — authoritative state + pure `tick`          |
//! | [`live`]     | `NavLiveState`, `TickEvent`, `ArrivalSummary`             |
//! | [`reroute`]  | Freeze/splice state machine types, `SearchTicket`         |
//! | [`splice`]   | Transition assembly and time renormalization              |
//! | [`dispatch`] | `BackgroundPlanner` worker for asynchronous searches      |
//! | [`trip`]     | Multi-leg hand-off                                        |
//! | [`config`]   | `SimTuning`                                               |
//! | [`error`]    | `SimError`, `SimResult<T>`                                |
//!
//! # Obstacle life cycle
//!
//! 1. `inject_obstacle` freezes the vehicle a stand-off before the obstacle
//!    and returns a [`SearchTicket`] excluding all blocked geometry.
//! 2. The ticket runs off-thread (e.g. on [`BackgroundPlanner`]); ticks keep
//!    flowing and clamp at the freeze point.
//! 3. `complete_reroute` splices the replacement onto the freeze point
//!    (backtrack transition + constant implied speed).
//! 4. The next `tick` at or past the freeze point applies the pending route
//!    atomically and re-bases the clock, so position and sim-time are both
//!    continuous across the swap.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod live;
pub mod reroute;
pub mod sim;
pub mod splice;
pub mod trip;


pub use config::SimTuning;
pub use dispatch::BackgroundPlanner;
pub use error::{SimError, SimResult};
pub use live::{ARRIVE_INSTRUCTION, ArrivalSummary, NavLiveState, TickEvent};
pub use reroute::{
    FreezePoint, InjectOutcome, ReroutePhase, RerouteOutcome, SearchTicket,
};
pub use sim::Simulation;
pub use trip::{Trip, TripEvent};
