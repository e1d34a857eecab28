//! Synthetic street grid for the demo.

use nav_core::{GeoPoint, NodeId};
use nav_graph::{RoadGraph, RoadGraphBuilder};

/// Grid dimensions (nodes per side) and block length in metres.
pub const GRID: usize = 7;
pub const BLOCK_M: f64 = 300.0;

/// Metres per degree of arc on the haversine sphere.
const M_PER_DEG: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

const AVENUES: [&str; GRID] = [
    "1st Ave", "2nd Ave", "3rd Ave", "4th Ave", "5th Ave", "6th Ave", "7th Ave",
];
const STREETS: [&str; GRID] = [
    "Apple St", "Birch St", "Cedar St", "Dogwood St", "Elm St", "Fir St", "Grove St",
];

/// Build a GRID×GRID block grid anchored near downtown Washington, DC.
///
/// East–west streets run at 40 km/h; north–south avenues at 50 km/h.
/// Returns the graph and the node matrix (`nodes[row][col]`, row 0 south).
pub fn build_network() -> (RoadGraph, Vec<Vec<NodeId>>) {
    let origin = GeoPoint::new(38.90, -77.04);
    let step_deg = BLOCK_M / M_PER_DEG;

    let mut b = RoadGraphBuilder::with_capacity(GRID * GRID, 4 * GRID * (GRID - 1));

    let nodes: Vec<Vec<NodeId>> = (0..GRID)
        .map(|row| {
            (0..GRID)
                .map(|col| {
                    b.add_node(GeoPoint::new(
                        origin.lat + row as f64 * step_deg,
                        origin.lon + col as f64 * step_deg,
                    ))
                })
                .collect()
        })
        .collect();

    for row in 0..GRID {
        for col in 0..GRID {
            if col + 1 < GRID {
                let len = b.node_pos(nodes[row][col]).distance_m(b.node_pos(nodes[row][col + 1]));
                b.add_road(nodes[row][col], nodes[row][col + 1], len, 40.0, STREETS[row]);
            }
            if row + 1 < GRID {
                let len = b.node_pos(nodes[row][col]).distance_m(b.node_pos(nodes[row + 1][col]));
                b.add_road(nodes[row][col], nodes[row + 1][col], len, 50.0, AVENUES[col]);
            }
        }
    }

    (b.build(), nodes)
}
