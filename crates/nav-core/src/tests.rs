//! Unit tests for nav-core.

// ── IDs ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ids {
    use crate::{NodeId, RequestId};

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn request_id_monotone() {
        let r = RequestId(7);
        assert_eq!(r.next(), RequestId(8));
        assert!(r.next() > r);
    }
}

// ── Geo ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geo {
    use crate::{GeoPoint, bearing_delta_deg};

    #[test]
    fn haversine_one_degree_latitude() {
        // One degree of latitude ≈ 111.19 km everywhere.
        let a = GeoPoint::new(38.0, -77.0);
        let b = GeoPoint::new(39.0, -77.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let p = GeoPoint::new(38.9185, -77.0195);
        assert_eq!(p.distance_m(p), 0.0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((origin.bearing_deg(GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9); // north
        assert!((origin.bearing_deg(GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9); // east
        assert!((origin.bearing_deg(GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9); // south
        assert!((origin.bearing_deg(GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9); // west
    }

    #[test]
    fn bearing_delta_wraps() {
        assert!((bearing_delta_deg(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((bearing_delta_deg(10.0, 350.0) + 20.0).abs() < 1e-9);
        // A dead reversal sits on the range boundary.
        assert!((bearing_delta_deg(0.0, 180.0).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, GeoPoint::new(1.0, 2.0));
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use crate::{CoreError, Scenario, ScenarioProfiles};

    #[test]
    fn tags_roundtrip() {
        for s in [Scenario::Routine, Scenario::Trauma, Scenario::CardiacArrest] {
            assert_eq!(Scenario::from_tag(s.tag()).unwrap(), s);
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = Scenario::from_tag("LID_BREACH").unwrap_err();
        assert!(matches!(err, CoreError::UnknownScenario(_)));
    }

    #[test]
    fn default_multipliers() {
        let p = ScenarioProfiles::default();
        assert_eq!(p.multiplier(Scenario::Routine), 1.00);
        assert_eq!(p.multiplier(Scenario::Trauma), 1.05);
        assert_eq!(p.multiplier(Scenario::CardiacArrest), 1.10);
    }

    #[test]
    fn non_positive_multiplier_rejected() {
        let p = ScenarioProfiles { trauma: 0.0, ..Default::default() };
        assert!(p.validate().is_err());
        assert!(ScenarioProfiles::default().validate().is_ok());
    }
}
