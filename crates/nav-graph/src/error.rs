//! Graph-subsystem error type.

use thiserror::Error;

use nav_core::{GeoPoint, NodeId};

/// Errors produced by `nav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("no road node within {max_m} m of {point}")]
    SnapFailed { point: GeoPoint, max_m: f64 },

    #[error("requested box lies outside the provider's region")]
    OutsideRegion,

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
