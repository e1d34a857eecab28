//! `nav-graph` — road graph, spatial indexing, and shortest-path search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`graph`]    | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`            |
//! | [`search`]   | `PathSearch` trait, `SearchQuery`, `DijkstraSearch`       |
//! | [`astar`]    | `AStarSearch` — the drop-in `alternate` engine            |
//! | [`race`]     | Two-engine comparison harness                             |
//! | [`provider`] | `GraphProvider` trait, `BoundingBox`, fixed-region impl   |
//! | [`osm`]      | `load_from_pbf` (feature = `"osm"` only)                  |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.          |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.       |

pub mod astar;
pub mod error;
pub mod graph;
pub mod provider;
pub mod race;
pub mod search;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use astar::AStarSearch;
pub use error::{GraphError, GraphResult};
pub use graph::{RoadGraph, RoadGraphBuilder, UNNAMED_STREET};
pub use provider::{BoundingBox, FixedRegionProvider, GraphProvider};
pub use race::{RaceEntry, RaceReport, race};
pub use search::{
    DijkstraSearch, ExplorationTrace, PathSearch, SearchAlgorithm, SearchOutcome,
    SearchQuery,
};
