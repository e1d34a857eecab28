//! `nav-route` — route synthesis and the planning pipeline.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`step`]    | `Maneuver` buckets, instruction text, `NavStep`            |
//! | [`meta`]    | `RouteMeta` + invariant validation + interpolation lookups |
//! | [`synth`]   | Node path → polyline, cumulative arrays, steps             |
//! | [`wire`]    | `PathRequest` / `RouteResponse` JSON types                 |
//! | [`planner`] | `RoutePlanner` — the request-to-route pipeline             |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                             |

pub mod error;
pub mod meta;
pub mod planner;
pub mod step;
pub mod synth;
pub mod wire;

#[cfg(test)]
mod tests;

pub use error::{RouteError, RouteResult};
pub use meta::RouteMeta;
pub use planner::{PlannedRoute, PlannerConfig, RoutePlanner};
pub use step::{Maneuver, NavStep};
pub use synth::synthesize;
pub use wire::{LatLng, PathRequest, RouteResponse};
