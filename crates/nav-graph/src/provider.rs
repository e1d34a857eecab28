//! Graph provider seam — how the engine obtains a region's road graph.
//!
//! Graph construction (map-data fetch, tiling, caching) is an external
//! collaborator: the engine only consumes a ready-made [`RoadGraph`] for a
//! bounding box plus the nearest-node snap that lives on the graph itself.
//! [`FixedRegionProvider`] serves tests, demos, and any deployment that
//! preloads one region.

use std::sync::Arc;

use nav_core::GeoPoint;

use crate::GraphError;
use crate::graph::RoadGraph;

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Degrees of padding added around a route's endpoints so the search corridor
/// includes detour options.
pub const BBOX_PAD_DEG: f64 = 0.02;

/// A geographic bounding box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// The padded box around two route endpoints.
    pub fn around(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            north: a.lat.max(b.lat) + BBOX_PAD_DEG,
            south: a.lat.min(b.lat) - BBOX_PAD_DEG,
            east: a.lon.max(b.lon) + BBOX_PAD_DEG,
            west: a.lon.min(b.lon) - BBOX_PAD_DEG,
        }
    }

    /// Round all sides to three decimal places (~110 m).  Nearby requests
    /// collapse to one box, so providers that cache by box get hits instead
    /// of near-duplicate regions.
    pub fn rounded(self) -> Self {
        let r = |v: f64| (v * 1_000.0).round() / 1_000.0;
        Self { north: r(self.north), south: r(self.south), east: r(self.east), west: r(self.west) }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat <= self.north && p.lat >= self.south && p.lon <= self.east && p.lon >= self.west
    }
}

// ── GraphProvider ─────────────────────────────────────────────────────────────

/// Source of road graphs, one immutable graph per region request.
///
/// Implementations may fetch, cache, or precompute however they like; the
/// engine only requires that repeated calls for the same box are cheap and
/// that the returned graph outlives all searches against it (hence `Arc`).
pub trait GraphProvider: Send + Sync {
    fn graph_for_bbox(&self, bbox: &BoundingBox) -> Result<Arc<RoadGraph>, GraphError>;
}

// ── FixedRegionProvider ───────────────────────────────────────────────────────

/// A provider that serves one preloaded region for every request.
///
/// Requests outside the region fail with [`GraphError::OutsideRegion`] rather
/// than silently returning a graph the endpoints can't snap onto.
pub struct FixedRegionProvider {
    region: BoundingBox,
    graph: Arc<RoadGraph>,
}

impl FixedRegionProvider {
    pub fn new(region: BoundingBox, graph: RoadGraph) -> Self {
        Self { region, graph: Arc::new(graph) }
    }

    /// Derive the region box from the graph's own node extent.
    ///
    /// The extent is padded by twice the corridor padding so a request whose
    /// endpoints sit near the edge of the network (snap slack included) still
    /// lands inside the region after its own `BBOX_PAD_DEG` is applied.
    pub fn from_graph(graph: RoadGraph) -> Self {
        let mut region = BoundingBox {
            north: f64::NEG_INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            west: f64::INFINITY,
        };
        for p in &graph.node_pos {
            region.north = region.north.max(p.lat);
            region.south = region.south.min(p.lat);
            region.east = region.east.max(p.lon);
            region.west = region.west.min(p.lon);
        }
        region.north += 2.0 * BBOX_PAD_DEG;
        region.south -= 2.0 * BBOX_PAD_DEG;
        region.east += 2.0 * BBOX_PAD_DEG;
        region.west -= 2.0 * BBOX_PAD_DEG;
        Self::new(region, graph)
    }

    pub fn graph(&self) -> Arc<RoadGraph> {
        Arc::clone(&self.graph)
    }
}

impl GraphProvider for FixedRegionProvider {
    fn graph_for_bbox(&self, bbox: &BoundingBox) -> Result<Arc<RoadGraph>, GraphError> {
        let inside = bbox.north <= self.region.north
            && bbox.south >= self.region.south
            && bbox.east <= self.region.east
            && bbox.west >= self.region.west;
        if !inside {
            return Err(GraphError::OutsideRegion);
        }
        Ok(Arc::clone(&self.graph))
    }
}
