//! Unit tests for nav-graph.
//!
//! All tests use hand-crafted graphs with coordinates and lengths that are
//! physically consistent (lengths never shorter than the straight line), so
//! the A* heuristic assumptions hold exactly as they do on real map data.

#[cfg(test)]
mod helpers {
    use nav_core::{GeoPoint, NodeId};

    use crate::{RoadGraph, RoadGraphBuilder};

    /// Small grid near the equator.  0.001° ≈ 111 m.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)      1:(0,0.001)   2:(0,0.002)
    ///   3:(0.001,0)                4:(0.001,0.002)
    ///
    /// Two-way streets:
    ///   0-1 Main St 120 m, 1-2 Main St 120 m, 2-4 Oak Ave 120 m,
    ///   0-3 Canal Rd 500 m (long detour), 3-4 Oak Ave 230 m
    ///
    /// Shortest 0→4 by length: 0→1→2→4 = 360 m (vs 730 m via 3).
    pub fn grid() -> (RoadGraph, [NodeId; 5]) {
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.001));
        let n2 = b.add_node(GeoPoint::new(0.0, 0.002));
        let n3 = b.add_node(GeoPoint::new(0.001, 0.0));
        let n4 = b.add_node(GeoPoint::new(0.001, 0.002));

        b.add_road(n0, n1, 120.0, 50.0, "Main St");
        b.add_road(n1, n2, 120.0, 50.0, "Main St");
        b.add_road(n2, n4, 120.0, 40.0, "Oak Ave");
        b.add_road(n0, n3, 500.0, 30.0, "Canal Rd");
        b.add_road(n3, n4, 230.0, 40.0, "Oak Ave");

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// Diamond with two equal-cost paths 0→1→3 and 0→2→3, for tie-break
    /// determinism checks.
    pub fn diamond() -> (RoadGraph, [NodeId; 4]) {
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.001, 0.001));
        let n2 = b.add_node(GeoPoint::new(-0.001, 0.001));
        let n3 = b.add_node(GeoPoint::new(0.0, 0.002));

        b.add_road(n0, n1, 200.0, 50.0, "North Loop");
        b.add_road(n1, n3, 200.0, 50.0, "North Loop");
        b.add_road(n0, n2, 200.0, 50.0, "South Loop");
        b.add_road(n2, n3, 200.0, 50.0, "South Loop");

        (b.build(), [n0, n1, n2, n3])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use nav_core::GeoPoint;

    use crate::{RoadGraphBuilder, UNNAMED_STREET};

    #[test]
    fn empty_build() {
        let g = RoadGraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn single_road_is_bidirectional() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(38.90, -77.04));
        let c = b.add_node(GeoPoint::new(38.91, -77.04));
        b.add_road(a, c, 1_000.0, 50.0, "7th St NW");
        let g = b.build();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn csr_out_edges() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        assert_eq!(g.out_degree(n0), 2); // n0→n1, n0→n3
        assert_eq!(g.out_degree(n1), 2);
        assert_eq!(g.out_degree(n2), 2);
        assert_eq!(g.out_degree(n3), 2);
        assert_eq!(g.out_degree(n4), 2);
        for e in g.out_edges(n0) {
            assert_eq!(g.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(a, c, 120.0, 50.0, "One Way Pl");
        let g = b.build();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.out_degree(c), 0);
    }

    #[test]
    fn street_names_interned() {
        let (g, _) = super::helpers::grid();
        // Unnamed + Main St + Oak Ave + Canal Rd.
        assert_eq!(g.street_names.len(), 4);
        assert_eq!(g.street_names[0], UNNAMED_STREET);
    }

    #[test]
    fn empty_street_maps_to_unnamed() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(a, c, 120.0, 50.0, "");
        let g = b.build();
        let e = g.out_edges(a).next().unwrap();
        assert_eq!(g.street_name(e), UNNAMED_STREET);
    }

    #[test]
    fn edge_between_picks_shortest_parallel() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(a, c, 200.0, 50.0, "Upper Deck");
        b.add_directed_edge(a, c, 120.0, 50.0, "Lower Deck");
        let g = b.build();
        let e = g.edge_between(a, c).unwrap();
        assert_eq!(g.edge_length_m[e.index()], 120.0);
        assert!(g.edge_between(c, a).is_none());
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use nav_core::GeoPoint;

    use crate::RoadGraphBuilder;

    #[test]
    fn snap_exact_and_nearest() {
        let (g, [n0, n1, ..]) = super::helpers::grid();
        assert_eq!(g.snap_to_node(GeoPoint::new(0.0, 0.0)).unwrap(), n0);
        assert_eq!(g.snap_to_node(GeoPoint::new(0.0, 0.0004)).unwrap(), n0);
        assert_eq!(g.snap_to_node(GeoPoint::new(0.0, 0.0006)).unwrap(), n1);
    }

    #[test]
    fn snap_reports_distance() {
        let (g, [n0, ..]) = super::helpers::grid();
        let (id, d) = g.snap_with_distance(GeoPoint::new(0.0, 0.0001)).unwrap();
        assert_eq!(id, n0);
        assert!((d - 11.1).abs() < 0.5, "got {d}");
    }

    #[test]
    fn empty_graph_returns_none() {
        let g = RoadGraphBuilder::new().build();
        assert!(g.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn edges_near_obstacle_point() {
        let (g, [_, n1, ..]) = super::helpers::grid();
        // Right on top of n1: both Main St segments (4 directed edges) touch it.
        let near = g.edges_near(GeoPoint::new(0.0, 0.001), 50.0);
        assert_eq!(near.len(), 4);
        for e in &near {
            assert!(g.edge_from[e.index()] == n1 || g.edge_to[e.index()] == n1);
        }
    }

    #[test]
    fn edges_near_far_point_is_empty() {
        let (g, _) = super::helpers::grid();
        assert!(g.edges_near(GeoPoint::new(0.5, 0.5), 100.0).is_empty());
    }
}

// ── Search engines ────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use nav_core::GeoPoint;

    use crate::{
        DijkstraSearch, GraphError, PathSearch, RoadGraphBuilder, SearchAlgorithm,
        SearchQuery,
    };

    #[test]
    fn trivial_same_node() {
        let (g, [n0, ..]) = super::helpers::grid();
        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n0)).unwrap();
        assert!(out.is_trivial());
        assert_eq!(out.cost_m, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (g, [n0, n1, n2, _, n4]) = super::helpers::grid();
        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n4)).unwrap();
        assert_eq!(out.cost_m, 360.0);
        assert_eq!(out.node_path(&g, n0), vec![n0, n1, n2, n4]);
    }

    #[test]
    fn unreachable_when_disconnected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.001, 0.0));
        let g = b.build();
        let result = DijkstraSearch.search(&g, &SearchQuery::new(a, c));
        assert!(matches!(result, Err(GraphError::Unreachable { .. })));
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(a, c, 120.0, 50.0, "One Way Pl");
        let g = b.build();
        assert!(DijkstraSearch.search(&g, &SearchQuery::new(a, c)).is_ok());
        assert!(DijkstraSearch.search(&g, &SearchQuery::new(c, a)).is_err());
    }

    #[test]
    fn exclusion_forces_detour() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        let blocked = g.edge_between(n1, n2).unwrap();
        let query = SearchQuery::new(n0, n4).excluding([blocked]);
        let out = DijkstraSearch.search(&g, &query).unwrap();
        assert_eq!(out.cost_m, 730.0);
        assert_eq!(out.node_path(&g, n0), vec![n0, n3, n4]);
    }

    #[test]
    fn all_outgoing_excluded_is_unreachable() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let query = SearchQuery::new(n0, n4).excluding(g.out_edges(n0));
        let result = DijkstraSearch.search(&g, &query);
        assert!(matches!(result, Err(GraphError::Unreachable { .. })));
    }

    #[test]
    fn tie_break_is_deterministic() {
        let (g, [n0, _, _, n3]) = super::helpers::diamond();
        let first = DijkstraSearch.search(&g, &SearchQuery::new(n0, n3)).unwrap();
        for _ in 0..5 {
            let again = DijkstraSearch.search(&g, &SearchQuery::new(n0, n3)).unwrap();
            assert_eq!(again.edges, first.edges);
            assert_eq!(again.cost_m, first.cost_m);
        }
    }

    #[test]
    fn astar_matches_dijkstra_cost() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        for (source, target) in [(n0, n4), (n4, n0)] {
            let query = SearchQuery::new(source, target);
            let base = SearchAlgorithm::Dijkstra.engine().search(&g, &query).unwrap();
            let alt = SearchAlgorithm::AStar.engine().search(&g, &query).unwrap();
            assert!(
                (base.cost_m - alt.cost_m).abs() < 1e-6,
                "baseline {} vs alternate {}",
                base.cost_m,
                alt.cost_m
            );
        }
    }

    #[test]
    fn astar_detour_with_exclusion() {
        let (g, [n0, n1, n2, _, n4]) = super::helpers::grid();
        let blocked = g.edge_between(n1, n2).unwrap();
        let query = SearchQuery::new(n0, n4).excluding([blocked]);
        let out = SearchAlgorithm::AStar.engine().search(&g, &query).unwrap();
        assert_eq!(out.cost_m, 730.0);
    }
}

// ── Exploration trace ─────────────────────────────────────────────────────────

#[cfg(test)]
mod trace {
    use crate::{DijkstraSearch, PathSearch, SearchQuery};

    #[test]
    fn trace_absent_unless_requested() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n4)).unwrap();
        assert!(out.trace.is_none());
    }

    #[test]
    fn trace_records_visitation_order() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let out = DijkstraSearch
            .search(&g, &SearchQuery::new(n0, n4).with_trace(1_000))
            .unwrap();
        let trace = out.trace.unwrap();
        assert!(trace.examined >= out.edges.len());
        assert_eq!(trace.edges.len(), trace.examined);
        assert!(!trace.truncated());
        // First relaxations come from the source node.
        assert_eq!(g.edge_from[trace.edges[0].index()], n0);
    }

    #[test]
    fn trace_cap_bounds_memory_not_count() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let out = DijkstraSearch
            .search(&g, &SearchQuery::new(n0, n4).with_trace(2))
            .unwrap();
        let trace = out.trace.unwrap();
        assert_eq!(trace.edges.len(), 2);
        assert!(trace.examined > 2);
        assert!(trace.truncated());
    }

    #[test]
    fn tracing_does_not_change_the_path() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let plain = DijkstraSearch.search(&g, &SearchQuery::new(n0, n4)).unwrap();
        let traced = DijkstraSearch
            .search(&g, &SearchQuery::new(n0, n4).with_trace(8))
            .unwrap();
        assert_eq!(plain.edges, traced.edges);
        assert_eq!(plain.cost_m, traced.cost_m);
    }
}

// ── Race harness ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod race {
    use crate::{SearchQuery, race};

    #[test]
    fn both_engines_agree_on_cost() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let report = race(&g, &SearchQuery::new(n0, n4).with_trace(10_000));
        assert!(report.cost_gap_m().unwrap() < 1e-6);
        assert!(report.baseline.examined() > 0);
        assert!(report.alternate.examined() > 0);
    }
}

// ── Provider ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod provider {
    use nav_core::GeoPoint;

    use crate::{BoundingBox, FixedRegionProvider, GraphError, GraphProvider};

    #[test]
    fn bbox_around_pads_endpoints() {
        let a = GeoPoint::new(38.90, -77.04);
        let b = GeoPoint::new(38.92, -77.00);
        let bbox = BoundingBox::around(a, b);
        assert!(bbox.north > 38.92 && bbox.south < 38.90);
        assert!(bbox.contains(a) && bbox.contains(b));
    }

    #[test]
    fn bbox_rounding_collapses_near_duplicates() {
        let a = BoundingBox { north: 38.92013, south: 38.89987, east: -76.99991, west: -77.04008 };
        let b = BoundingBox { north: 38.92049, south: 38.90012, east: -77.00027, west: -77.03969 };
        assert_eq!(a.rounded(), b.rounded());
    }

    #[test]
    fn fixed_region_serves_inside_rejects_outside() {
        let (graph, _) = super::helpers::grid();
        let provider = FixedRegionProvider::from_graph(graph);

        let inside = BoundingBox::around(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.002));
        assert!(provider.graph_for_bbox(&inside).is_ok());

        let outside = BoundingBox::around(GeoPoint::new(1.0, 1.0), GeoPoint::new(1.1, 1.1));
        assert!(matches!(
            provider.graph_for_bbox(&outside),
            Err(GraphError::OutsideRegion)
        ));
    }
}
