//! Unit tests for nav-route.

#[cfg(test)]
mod helpers {
    use nav_core::NodeId;
    use nav_graph::{RoadGraph, RoadGraphBuilder};

    /// Metres per degree of arc on the haversine sphere (R = 6 371 000 m).
    /// Placing nodes at the equator with longitude offsets of `m / M_PER_DEG`
    /// makes great-circle segment distances come out to `m` exactly (up to
    /// f64 rounding).
    pub const M_PER_DEG: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

    /// Straight west→east road along the equator with the given segment
    /// lengths, one street, one speed.
    pub fn line_graph(lengths_m: &[f64], speed_kph: f64, street: &str) -> (RoadGraph, Vec<NodeId>) {
        let mut b = RoadGraphBuilder::new();
        let mut lon = 0.0;
        let mut nodes = vec![b.add_node(nav_core::GeoPoint::new(0.0, 0.0))];
        for &len in lengths_m {
            lon += len / M_PER_DEG;
            nodes.push(b.add_node(nav_core::GeoPoint::new(0.0, lon)));
        }
        for (i, &len) in lengths_m.iter().enumerate() {
            b.add_road(nodes[i], nodes[i + 1], len, speed_kph, street);
        }
        (b.build(), nodes)
    }

    /// Two straight blocks of Main St, then a right turn south onto Oak Ave.
    ///
    ///   n0 ──100──> n1 ──100──> n2
    ///                            │ 80
    ///                            v
    ///                            n3
    pub fn elbow_graph() -> (RoadGraph, [NodeId; 4]) {
        let step = 100.0 / M_PER_DEG;
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(nav_core::GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(nav_core::GeoPoint::new(0.0, step));
        let n2 = b.add_node(nav_core::GeoPoint::new(0.0, 2.0 * step));
        let n3 = b.add_node(nav_core::GeoPoint::new(-80.0 / M_PER_DEG, 2.0 * step));
        b.add_road(n0, n1, 100.0, 36.0, "Main St");
        b.add_road(n1, n2, 100.0, 36.0, "Main St");
        b.add_road(n2, n3, 80.0, 36.0, "Oak Ave");
        (b.build(), [n0, n1, n2, n3])
    }
}

// ── Maneuver classification ───────────────────────────────────────────────────

#[cfg(test)]
mod maneuver {
    use crate::Maneuver;

    #[test]
    fn buckets_by_angle() {
        assert_eq!(Maneuver::classify(0.0), Maneuver::Continue);
        assert_eq!(Maneuver::classify(19.9), Maneuver::Continue);
        assert_eq!(Maneuver::classify(-19.9), Maneuver::Continue);
        assert_eq!(Maneuver::classify(40.0), Maneuver::SlightRight);
        assert_eq!(Maneuver::classify(-40.0), Maneuver::SlightLeft);
        assert_eq!(Maneuver::classify(90.0), Maneuver::Right);
        assert_eq!(Maneuver::classify(-90.0), Maneuver::Left);
        assert_eq!(Maneuver::classify(150.0), Maneuver::SharpRight);
        assert_eq!(Maneuver::classify(-150.0), Maneuver::SharpLeft);
    }

    #[test]
    fn between_bearings_wraps() {
        // 350° → 80° is a 90° right turn across north.
        assert_eq!(Maneuver::between_bearings(350.0, 80.0), Maneuver::Right);
    }

    #[test]
    fn instruction_wording() {
        assert_eq!(Maneuver::Right.instruction("Oak Ave"), "Turn right onto Oak Ave");
        assert_eq!(Maneuver::Depart.instruction("Main St"), "Head out on Main St");
        assert_eq!(Maneuver::Continue.instruction(""), "Continue on the road");
    }
}

// ── Synthesis ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod synth {
    use nav_graph::{DijkstraSearch, PathSearch, SearchAlgorithm, SearchQuery};

    use crate::synthesize;

    /// Segment lengths [100, 200, 150] m at a constant 10 m/s (36 km/h)
    /// must give cum_distance [0, 100, 300, 450] and cum_time [0, 10, 30, 45].
    #[test]
    fn constant_speed_timeline() {
        let (g, nodes) = super::helpers::line_graph(&[100.0, 200.0, 150.0], 36.0, "Main St");
        let out = DijkstraSearch
            .search(&g, &SearchQuery::new(nodes[0], nodes[3]))
            .unwrap();
        let meta = synthesize(&g, nodes[0], &out, 1.0, SearchAlgorithm::Dijkstra).unwrap();

        let expect_d = [0.0, 100.0, 300.0, 450.0];
        let expect_t = [0.0, 10.0, 30.0, 45.0];
        assert_eq!(meta.coords.len(), 4);
        for i in 0..4 {
            assert!((meta.cum_distance_m[i] - expect_d[i]).abs() < 1e-6);
            assert!((meta.cum_time_s[i] - expect_t[i]).abs() < 1e-6);
        }
        assert!((meta.total_distance_m - 450.0).abs() < 1e-6);
        assert!((meta.total_time_s - 45.0).abs() < 1e-6);
    }

    #[test]
    fn scenario_multiplier_scales_time_not_distance() {
        let (g, nodes) = super::helpers::line_graph(&[100.0, 200.0, 150.0], 36.0, "Main St");
        let out = DijkstraSearch
            .search(&g, &SearchQuery::new(nodes[0], nodes[3]))
            .unwrap();
        let meta = synthesize(&g, nodes[0], &out, 1.1, SearchAlgorithm::Dijkstra).unwrap();
        assert!((meta.total_distance_m - 450.0).abs() < 1e-6);
        assert!((meta.total_time_s - 45.0 / 1.1).abs() < 1e-6);
    }

    #[test]
    fn arrays_share_length_and_never_decrease() {
        let (g, [n0, _, _, n3]) = super::helpers::elbow_graph();
        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n3)).unwrap();
        let meta = synthesize(&g, n0, &out, 1.0, SearchAlgorithm::Dijkstra).unwrap();

        assert_eq!(meta.coords.len(), meta.cum_distance_m.len());
        assert_eq!(meta.coords.len(), meta.cum_time_s.len());
        for w in meta.cum_distance_m.windows(2) {
            assert!(w[1] >= w[0]);
        }
        for w in meta.cum_time_s.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn steps_partition_distance_domain() {
        let (g, [n0, _, _, n3]) = super::helpers::elbow_graph();
        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n3)).unwrap();
        let meta = synthesize(&g, n0, &out, 1.0, SearchAlgorithm::Dijkstra).unwrap();

        assert_eq!(meta.steps[0].start_distance_m, 0.0);
        for pair in meta.steps.windows(2) {
            assert_eq!(pair[0].end_distance_m, pair[1].start_distance_m);
        }
        let last = meta.steps.last().unwrap();
        assert!((last.end_distance_m - meta.total_distance_m).abs() < 1e-6);
    }

    #[test]
    fn turn_onto_new_street_starts_a_step() {
        use crate::Maneuver;

        let (g, [n0, _, _, n3]) = super::helpers::elbow_graph();
        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n3)).unwrap();
        let meta = synthesize(&g, n0, &out, 1.0, SearchAlgorithm::Dijkstra).unwrap();

        assert_eq!(meta.steps.len(), 2);
        assert_eq!(meta.steps[0].maneuver, Maneuver::Depart);
        assert_eq!(meta.steps[0].street, "Main St");
        assert!((meta.steps[0].end_distance_m - 200.0).abs() < 1e-6);
        // Heading east, then south: a right turn.
        assert_eq!(meta.steps[1].maneuver, Maneuver::Right);
        assert_eq!(meta.steps[1].street, "Oak Ave");
        assert_eq!(meta.steps[1].id, 1);
    }

    /// A 10 m jog in the middle of Main St should not surface as its own step.
    #[test]
    fn stutter_steps_merge() {
        use nav_core::GeoPoint;
        use nav_graph::RoadGraphBuilder;

        let m = super::helpers::M_PER_DEG;
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 100.0 / m));
        let n2 = b.add_node(GeoPoint::new(10.0 / m, 100.0 / m)); // 10 m north
        let n3 = b.add_node(GeoPoint::new(10.0 / m, 200.0 / m));
        b.add_road(n0, n1, 100.0, 36.0, "Main St");
        b.add_road(n1, n2, 10.0, 36.0, "Main St");
        b.add_road(n2, n3, 100.0, 36.0, "Main St");
        let g = b.build();

        let out = DijkstraSearch.search(&g, &SearchQuery::new(n0, n3)).unwrap();
        let meta = synthesize(&g, n0, &out, 1.0, SearchAlgorithm::Dijkstra).unwrap();

        // Jog step merged into the departure; the final eastbound stretch
        // still begins its own (turn) step, and the partition stays tight.
        assert!(meta.steps.len() <= 2);
        assert_eq!(meta.steps[0].start_distance_m, 0.0);
        for pair in meta.steps.windows(2) {
            assert_eq!(pair[0].end_distance_m, pair[1].start_distance_m);
        }
        assert!(
            (meta.steps.last().unwrap().end_distance_m - meta.total_distance_m).abs() < 1e-6
        );
    }
}

// ── RouteMeta validation & lookups ────────────────────────────────────────────

#[cfg(test)]
mod meta {
    use nav_core::GeoPoint;
    use nav_graph::SearchAlgorithm;

    use crate::step::{Maneuver, NavStep};
    use crate::{RouteError, RouteMeta};

    fn step(id: u32, start: f64, end: f64) -> NavStep {
        NavStep {
            id,
            instruction: "Continue on Main St".into(),
            street: "Main St".into(),
            start_distance_m: start,
            end_distance_m: end,
            maneuver: if id == 0 { Maneuver::Depart } else { Maneuver::Continue },
        }
    }

    fn valid_meta() -> RouteMeta {
        RouteMeta {
            coords: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 0.001),
                GeoPoint::new(0.0, 0.002),
            ],
            cum_distance_m: vec![0.0, 100.0, 200.0],
            cum_time_s: vec![0.0, 10.0, 20.0],
            steps: vec![step(0, 0.0, 150.0), step(1, 150.0, 200.0)],
            total_distance_m: 200.0,
            total_time_s: 20.0,
            algorithm: SearchAlgorithm::Dijkstra,
        }
    }

    #[test]
    fn valid_route_passes() {
        assert!(valid_meta().validate().is_ok());
    }

    #[test]
    fn empty_route_rejected() {
        let mut m = valid_meta();
        m.coords.clear();
        assert!(matches!(m.validate(), Err(RouteError::MalformedRoute(_))));
    }

    #[test]
    fn length_mismatch_rejected() {
        let mut m = valid_meta();
        m.cum_time_s.pop();
        assert!(matches!(m.validate(), Err(RouteError::MalformedRoute(_))));
    }

    #[test]
    fn decreasing_time_rejected() {
        let mut m = valid_meta();
        m.cum_time_s[2] = 5.0;
        assert!(matches!(m.validate(), Err(RouteError::MalformedRoute(_))));
    }

    #[test]
    fn step_gap_rejected() {
        let mut m = valid_meta();
        m.steps[1].start_distance_m = 160.0;
        assert!(matches!(m.validate(), Err(RouteError::MalformedRoute(_))));
    }

    #[test]
    fn position_interpolates_between_points() {
        let m = valid_meta();
        // t = 15 s is halfway along the second segment.
        let (pos, i) = m.position_at_time(15.0);
        assert_eq!(i, 2);
        assert!((pos.lon - 0.0015).abs() < 1e-12);
        // Exactly at a sample point.
        let (pos, _) = m.position_at_time(10.0);
        assert!((pos.lon - 0.001).abs() < 1e-12);
        // Before the start and past the end clamp.
        assert_eq!(m.position_at_time(0.0).0, m.coords[0]);
        assert_eq!(m.position_at_time(99.0).0, m.coords[2]);
    }

    #[test]
    fn distance_time_lookups_agree() {
        let m = valid_meta();
        assert!((m.distance_at_time(15.0) - 150.0).abs() < 1e-9);
        assert!((m.time_at_distance(150.0) - 15.0).abs() < 1e-9);
        assert_eq!(m.index_at_distance(100.0), 1);
        assert_eq!(m.step_index_at(0.0), 0);
        assert_eq!(m.step_index_at(149.9), 0);
        assert_eq!(m.step_index_at(150.0), 1);
        assert_eq!(m.step_index_at(999.0), 1);
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wire {
    use nav_graph::SearchAlgorithm;

    use crate::{LatLng, PathRequest};

    #[test]
    fn request_parses_wire_tags() {
        let json = r#"{
            "start": {"lat": 38.90, "lng": -77.04},
            "end":   {"lat": 38.92, "lng": -77.00},
            "algorithm": "alternate",
            "scenario": "cardiac_arrest",
            "blocked_edges": [[38.91, -77.02]],
            "include_exploration": true
        }"#;
        let req: PathRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.algorithm, SearchAlgorithm::AStar);
        assert_eq!(req.scenario, nav_core::Scenario::CardiacArrest);
        assert_eq!(req.blocked_points().len(), 1);
        assert!(req.include_exploration);
    }

    #[test]
    fn request_defaults() {
        let json = r#"{
            "start": {"lat": 38.90, "lng": -77.04},
            "end":   {"lat": 38.92, "lng": -77.00}
        }"#;
        let req: PathRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.algorithm, SearchAlgorithm::Dijkstra);
        assert_eq!(req.scenario, nav_core::Scenario::Routine);
        assert!(req.blocked_edges.is_none());
        assert!(!req.include_exploration);
    }

    #[test]
    fn unknown_scenario_rejected_at_boundary() {
        let json = r#"{
            "start": {"lat": 38.90, "lng": -77.04},
            "end":   {"lat": 38.92, "lng": -77.00},
            "scenario": "warp_drive"
        }"#;
        assert!(serde_json::from_str::<PathRequest>(json).is_err());
    }

    #[test]
    fn latlng_geopoint_roundtrip() {
        let c = LatLng { lat: 38.9185, lng: -77.0195 };
        let p: nav_core::GeoPoint = c.into();
        assert_eq!(p.lat, 38.9185);
        assert_eq!(p.lon, -77.0195);
        assert_eq!(LatLng::from(p), c);
    }
}

// ── Planner pipeline ──────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use nav_core::ScenarioProfiles;
    use nav_graph::{FixedRegionProvider, GraphError};

    use crate::{LatLng, PathRequest, PlannerConfig, RouteError, RoutePlanner};

    fn planner_for_line() -> (RoutePlanner<FixedRegionProvider>, Vec<LatLng>) {
        let (g, nodes) = super::helpers::line_graph(&[100.0, 200.0, 150.0], 36.0, "Main St");
        let endpoints = nodes
            .iter()
            .map(|&n| LatLng::from(g.node_pos[n.index()]))
            .collect();
        let planner = RoutePlanner::new(
            FixedRegionProvider::from_graph(g),
            ScenarioProfiles::default(),
            PlannerConfig::default(),
        );
        (planner, endpoints)
    }

    #[test]
    fn plan_produces_consistent_response() {
        let (planner, pts) = planner_for_line();
        let req = PathRequest::new(pts[0], pts[3]);
        let resp = planner.plan(&req).unwrap();

        assert_eq!(resp.path_coordinates.len(), resp.cum_distance_m.len());
        assert_eq!(resp.path_coordinates.len(), resp.cum_time_s.len());
        assert!((resp.total_distance_m - 450.0).abs() < 0.5);
        assert!((resp.total_time_s - 45.0).abs() < 0.1);
        assert!(resp.execution_time_ms >= 0.0);
        // Response coordinates are [lng, lat]: the line runs east along the
        // equator, so lat (second element) stays 0.
        assert_eq!(resp.path_coordinates[0][1], 0.0);
        assert!(resp.explored_coords.is_none());
    }

    #[test]
    fn exploration_included_on_request() {
        let (planner, pts) = planner_for_line();
        let mut req = PathRequest::new(pts[0], pts[3]);
        req.include_exploration = true;
        let resp = planner.plan(&req).unwrap();
        let coords = resp.explored_coords.unwrap();
        assert!(!coords.is_empty());
        assert!(resp.explored_count.unwrap() >= coords.len());
    }

    #[test]
    fn snap_failure_propagates() {
        let (planner, pts) = planner_for_line();
        // ~890 m north of the road with a 500 m snap ceiling.
        let off_road = LatLng { lat: 0.008, lng: 0.0 };
        let req = PathRequest::new(off_road, pts[3]);
        match planner.plan(&req) {
            Err(RouteError::Graph(GraphError::SnapFailed { .. })) => {}
            other => panic!("expected SnapFailed, got {other:?}"),
        }
    }

    #[test]
    fn closures_around_start_make_target_unreachable() {
        let (planner, pts) = planner_for_line();
        let mut req = PathRequest::new(pts[0], pts[3]);
        // Block everything near the first midblock: with only one road out,
        // the far end becomes unreachable.
        req.blocked_edges = Some(vec![[pts[0].lat, pts[0].lng]]);
        match planner.plan(&req) {
            Err(RouteError::Graph(GraphError::Unreachable { .. })) => {}
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[test]
    fn closure_with_detour_reroutes() {
        use nav_core::GeoPoint;
        use nav_graph::RoadGraphBuilder;

        // Direct run 0→1→3 along the equator, with a longer bypass through
        // node 2 north of the midpoint.  Edge lengths match the straight-line
        // geometry, as they do on loaded map data.
        let m = super::helpers::M_PER_DEG;
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1_000.0 / m));
        let n2 = b.add_node(GeoPoint::new(800.0 / m, 1_000.0 / m));
        let n3 = b.add_node(GeoPoint::new(0.0, 2_000.0 / m));
        let d02 = b.node_pos(n0).distance_m(b.node_pos(n2));
        let d23 = b.node_pos(n2).distance_m(b.node_pos(n3));
        b.add_road(n0, n1, 1_000.0, 50.0, "Riverside Dr");
        b.add_road(n1, n3, 1_000.0, 50.0, "Riverside Dr");
        b.add_road(n0, n2, d02, 50.0, "Hillcrest Way");
        b.add_road(n2, n3, d23, 50.0, "Hillcrest Way");
        let g = b.build();
        let p0 = LatLng::from(g.node_pos[n0.index()]);
        let p1 = LatLng::from(g.node_pos[n1.index()]);
        let p3 = LatLng::from(g.node_pos[n3.index()]);

        let planner = RoutePlanner::new(
            FixedRegionProvider::from_graph(g),
            ScenarioProfiles::default(),
            PlannerConfig::default(),
        );

        let open = planner.plan(&PathRequest::new(p0, p3)).unwrap();
        assert!((open.total_distance_m - 2_000.0).abs() < 1.0);

        let mut blocked = PathRequest::new(p0, p3);
        blocked.blocked_edges = Some(vec![[p1.lat, p1.lng]]);
        let detour = planner.plan(&blocked).unwrap();
        assert!((detour.total_distance_m - (d02 + d23)).abs() < 1.0);
        assert!(detour.total_distance_m > open.total_distance_m);
    }
}
