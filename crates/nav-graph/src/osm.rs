//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use nav_graph::osm::load_from_pbf;
//!
//! let graph = load_from_pbf(Path::new("district.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`default_speed_kph`]).
//! All other features (footways, buildings, POIs, relations) are ignored.
//! One-way roads add a single directed edge; two-way roads add both
//! directions.  Street names come from the `name` tag; legal speeds from a
//! numeric `maxspeed` tag (km/h, or mph with conversion) and fall back to a
//! per-class default.
//!
//! # Memory note
//!
//! The loader buffers all OSM nodes in a `HashMap<i64, GeoPoint>` for the
//! first pass (needed because ways reference node IDs by OSM integer ID).
//! The map is freed before the R-tree is built.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use osmpbf::{Element, ElementReader};

use nav_core::{GeoPoint, NodeId};

use crate::GraphError;
use crate::graph::{RoadGraph, RoadGraphBuilder};

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a road graph from an OSM PBF file.
///
/// Only car-drivable roads are included.  Use [`RoadGraphBuilder`] directly
/// for non-OSM sources.
///
/// # Errors
///
/// Returns [`GraphError::Osm`] on parse errors, [`GraphError::Io`] on file
/// errors.
pub fn load_from_pbf(path: &Path) -> Result<RoadGraph, GraphError> {
    // ── Phase 1: collect all OSM nodes + road ways in one sequential pass ──
    let reader = ElementReader::from_path(path)?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let highway = tags
                    .iter()
                    .find(|(k, _)| *k == "highway")
                    .map(|(_, v)| *v);

                if let Some(default_kph) = highway.and_then(default_speed_kph) {
                    let speed_kph = tags
                        .iter()
                        .find(|(k, _)| *k == "maxspeed")
                        .and_then(|(_, v)| parse_maxspeed_kph(v))
                        .unwrap_or(default_kph);
                    let name = tags
                        .iter()
                        .find(|(k, _)| *k == "name")
                        .map(|(_, v)| v.to_string())
                        .unwrap_or_default();
                    let oneway = is_oneway(highway.unwrap_or(""), &tags);
                    let refs: Vec<i64> = w.refs().collect();
                    road_ways.push(OsmWay { refs, speed_kph, name, oneway });
                }
            }
            _ => {}
        })
        .map_err(|e| GraphError::Osm(e.to_string()))?;

    log::info!(
        "osm: {} nodes, {} drivable ways in {}",
        all_nodes.len(),
        road_ways.len(),
        path.display()
    );

    // ── Phase 2: identify road-referenced node IDs ────────────────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    // ── Phase 3: build graph ──────────────────────────────────────────────
    // Pre-allocate: ~2× road nodes for edges (rough estimate).
    let mut builder =
        RoadGraphBuilder::with_capacity(road_node_ids.len(), road_node_ids.len() * 2);

    // Map OSM node IDs → our NodeIds, adding only road-relevant nodes.
    let mut osm_to_nav: HashMap<i64, NodeId> = HashMap::with_capacity(road_node_ids.len());

    for osm_id in &road_node_ids {
        if let Some(&pos) = all_nodes.get(osm_id) {
            let nav_id = builder.add_node(pos);
            osm_to_nav.insert(*osm_id, nav_id);
        }
    }

    // Free the full node map — no longer needed.
    drop(all_nodes);
    drop(road_node_ids);

    // Add directed edges from way node sequences.
    for way in &road_ways {
        for window in way.refs.windows(2) {
            let (osm_a, osm_b) = (window[0], window[1]);
            if let (Some(&from), Some(&to)) = (osm_to_nav.get(&osm_a), osm_to_nav.get(&osm_b)) {
                let len_m = builder.node_pos(from).distance_m(builder.node_pos(to));

                builder.add_directed_edge(from, to, len_m, way.speed_kph, &way.name);
                if !way.oneway {
                    builder.add_directed_edge(to, from, len_m, way.speed_kph, &way.name);
                }
            }
        }
    }

    Ok(builder.build())
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs: Vec<i64>,
    speed_kph: f64,
    name: String,
    oneway: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Return the assumed legal speed (km/h) for a road class, or `None` if this
/// `highway` value is not drivable by car.
fn default_speed_kph(highway: &str) -> Option<f64> {
    match highway {
        "motorway" | "motorway_link" => Some(100.0),
        "trunk" | "trunk_link" => Some(80.0),
        "primary" | "primary_link" => Some(70.0),
        "secondary" | "secondary_link" => Some(60.0),
        "tertiary" | "tertiary_link" => Some(55.0),
        "residential" | "living_street" => Some(50.0),
        "service" | "unclassified" => Some(35.0),
        // Explicitly non-car:
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track" => None,
        // Unknown road type — assign a cautious default rather than dropping.
        _ => Some(50.0),
    }
}

/// Parse an OSM `maxspeed` value into km/h.
///
/// Handles the common forms: "50", "50 km/h", "30 mph".  Non-numeric values
/// ("signals", "none") return `None` and the class default applies.
fn parse_maxspeed_kph(value: &str) -> Option<f64> {
    let s = value.trim().to_ascii_lowercase();
    let digits: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let v: f64 = digits.parse().ok()?;
    if s.contains("mph") {
        Some(v * 1.60934)
    } else {
        Some(v)
    }
}

/// Determine whether a way should be treated as one-way for car traffic.
///
/// Motorways and motorway links are implicitly one-way in OSM convention.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags
        .iter()
        .any(|(k, v)| *k == "oneway" && matches!(*v, "yes" | "1" | "true"));
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}
