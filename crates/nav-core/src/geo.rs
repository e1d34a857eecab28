//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Routes accumulate per-segment
//! distances into metre-denominated prefix sums over tens of kilometres, and
//! splice continuity is checked against metre-scale tolerances — both want
//! the full double-precision mantissa.

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Flat-earth bearing from `self` to `other` in degrees, normalized to
    /// `[0, 360)`.  0 = north, 90 = east.  Accurate enough for classifying
    /// turns between adjacent road segments; not for long-haul navigation.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let d_lon = other.lon - self.lon;
        let d_lat = other.lat - self.lat;
        let ang = d_lon.atan2(d_lat).to_degrees();
        (ang + 360.0) % 360.0
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    ///
    /// Adjacent route points are at most a city block apart, so chord
    /// interpolation is indistinguishable from the great-circle arc.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Signed smallest difference `b − a` between two bearings, in `[-180, 180]`.
///
/// Positive = clockwise (a right turn), negative = counter-clockwise.
#[inline]
pub fn bearing_delta_deg(a: f64, b: f64) -> f64 {
    (b - a + 540.0) % 360.0 - 180.0
}
