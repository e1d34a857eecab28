//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, `edge_speed_kph`,
//! `edge_street`) are sorted by source node and indexed by `EdgeId`.
//! Iteration over a node's outgoing edges is therefore a contiguous memory
//! scan — ideal for the search frontier's inner loop.
//!
//! Street names are interned: `edge_street[e]` indexes into `street_names`,
//! so a boulevard crossing forty intersections stores its name once.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to snap trip endpoints and obstacle coordinates onto the graph.
//!
//! # Immutability
//!
//! A built graph is never mutated.  Road closures are expressed as per-query
//! edge-exclusion sets (see [`SearchQuery`][crate::SearchQuery]), so
//! concurrent searches over one region share a single `Arc<RoadGraph>`.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};

use nav_core::{EdgeId, GeoPoint, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city (error < 0.1 % at ≤ 60° lat).
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Redundant with CSR but required for
    /// efficient path reconstruction (trace `prev_edge` back to source).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.  Used as the search cost.
    pub edge_length_m: Vec<f64>,

    /// Legal speed in km/h, before any scenario multiplier.
    pub edge_speed_kph: Vec<f64>,

    /// Index into `street_names` for each edge.
    pub edge_street: Vec<u32>,

    /// Interned street names.  Index 0 is always the unnamed-road label.
    pub street_names: Vec<String>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

/// Label used for edges whose source data carries no street name.
pub const UNNAMED_STREET: &str = "Unnamed Road";

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any search against an empty graph returns
    /// [`GraphError::Unreachable`][crate::GraphError::Unreachable].
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The shortest directed edge from `from` to `to`, if one exists.
    ///
    /// Parallel edges (dual carriageways digitized twice) resolve to the
    /// shortest, matching the cost the search engines would have used.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from)
            .filter(|&e| self.edge_to[e.index()] == to)
            .min_by(|&a, &b| {
                self.edge_length_m[a.index()]
                    .total_cmp(&self.edge_length_m[b.index()])
            })
    }

    /// Street name of `edge`.
    #[inline]
    pub fn street_name(&self, edge: EdgeId) -> &str {
        &self.street_names[self.edge_street[edge.index()] as usize]
    }

    /// Midpoint of `edge` (straight-line).
    #[inline]
    pub fn edge_midpoint(&self, edge: EdgeId) -> GeoPoint {
        let a = self.node_pos[self.edge_from[edge.index()].index()];
        let b = self.node_pos[self.edge_to[edge.index()].index()];
        a.lerp(b, 0.5)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Nearest node together with its great-circle distance from `pos`.
    pub fn snap_with_distance(&self, pos: GeoPoint) -> Option<(NodeId, f64)> {
        let id = self.snap_to_node(pos)?;
        Some((id, pos.distance_m(self.node_pos[id.index()])))
    }

    /// All edges "near" `pos`: those with an endpoint or midpoint within
    /// `radius_m`.
    ///
    /// Candidate edges are limited to those incident to a node within the
    /// radius, so most of the graph is never distance-tested.  Used to
    /// translate an obstacle coordinate into a search exclusion set.
    pub fn edges_near(&self, pos: GeoPoint, radius_m: f64) -> Vec<EdgeId> {
        // Degrees of latitude per metre; padded so the box never clips the
        // radius circle at city latitudes.
        let pad_deg = radius_m / 111_000.0 * 1.5;
        let envelope = AABB::from_corners(
            [pos.lat - pad_deg, pos.lon - pad_deg],
            [pos.lat + pad_deg, pos.lon + pad_deg],
        );

        let nearby: FxHashSet<NodeId> = self
            .spatial_idx
            .locate_in_envelope(&envelope)
            .filter(|e| {
                pos.distance_m(GeoPoint::new(e.point[0], e.point[1])) <= radius_m
            })
            .map(|e| e.id)
            .collect();

        if nearby.is_empty() {
            return Vec::new();
        }

        (0..self.edge_count())
            .map(|i| EdgeId(i as u32))
            .filter(|&e| {
                let u = self.edge_from[e.index()];
                let v = self.edge_to[e.index()];
                if !nearby.contains(&u) && !nearby.contains(&v) {
                    return false;
                }
                pos.distance_m(self.node_pos[u.index()]) <= radius_m
                    || pos.distance_m(self.node_pos[v.index()]) <= radius_m
                    || pos.distance_m(self.edge_midpoint(e)) <= radius_m
            })
            .collect()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node, constructs the CSR arrays, and bulk-loads the
/// R-tree.
///
/// # Example
///
/// ```
/// use nav_core::GeoPoint;
/// use nav_graph::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(38.91, -77.04));
/// let c = b.add_node(GeoPoint::new(38.92, -77.03));
/// b.add_road(a, c, 1_200.0, 50.0, "K Street");
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes: Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
    street_names: Vec<String>,
    street_idx: FxHashMap<String, u32>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    length_m: f64,
    speed_kph: f64,
    street: u32,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        let mut street_idx = FxHashMap::default();
        street_idx.insert(UNNAMED_STREET.to_string(), 0);
        Self {
            nodes: Vec::new(),
            raw_edges: Vec::new(),
            street_names: vec![UNNAMED_STREET.to_string()],
            street_idx,
        }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading from OSM.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        let mut b = Self::new();
        b.nodes.reserve(nodes);
        b.raw_edges.reserve(edges);
        b
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Intern `street` and return its table index.  Empty names map to the
    /// unnamed-road label.
    fn intern_street(&mut self, street: &str) -> u32 {
        let name = street.trim();
        if name.is_empty() {
            return 0;
        }
        if let Some(&idx) = self.street_idx.get(name) {
            return idx;
        }
        let idx = self.street_names.len() as u32;
        self.street_names.push(name.to_string());
        self.street_idx.insert(name.to_string(), idx);
        idx
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// - `length_m`: physical length in metres (the search cost).
    /// - `speed_kph`: legal speed, before any scenario multiplier.
    /// - `street`: street name; empty = unnamed.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        speed_kph: f64,
        street: &str,
    ) {
        let street = self.intern_street(street);
        self.raw_edges.push(RawEdge { from, to, length_m, speed_kph, street });
    }

    /// Convenience: add edges in **both directions** for a two-way street
    /// (the common case for most road types).
    pub fn add_road(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f64,
        speed_kph: f64,
        street: &str,
    ) {
        self.add_directed_edge(a, b, length_m, speed_kph, street);
        self.add_directed_edge(b, a, length_m, speed_kph, street);
    }

    /// Look up the position of a node added earlier (used by the OSM loader
    /// to compute edge lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Sort edges by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.from.0);

        // Build edge arrays from sorted raw edges.
        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64> = raw.iter().map(|e| e.length_m).collect();
        let edge_speed_kph: Vec<f64> = raw.iter().map(|e| e.speed_kph).collect();
        let edge_street: Vec<u32> = raw.iter().map(|e| e.street).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_speed_kph,
            edge_street,
            street_names: self.street_names,
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
