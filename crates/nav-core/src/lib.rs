//! `nav-core` — foundational types for the `rust_nav` routing engine.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`ids`]      | `NodeId`, `EdgeId`, `RequestId`                     |
//! | [`geo`]      | `GeoPoint`, haversine distance, bearings            |
//! | [`scenario`] | `Scenario` tags, `ScenarioProfiles` multiplier table|
//! | [`error`]    | `CoreError`, `CoreResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.      |

pub mod error;
pub mod geo;
pub mod ids;
pub mod scenario;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, bearing_delta_deg};
pub use ids::{EdgeId, NodeId, RequestId};
pub use scenario::{Scenario, ScenarioProfiles};
