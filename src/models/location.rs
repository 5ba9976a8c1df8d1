//! Geographic locations.
//!
//! Resources start from a location and every plan item happens at one.
//! Distances feed the location policy and travel-time checks.
//!
//! # Reference
//! Sinnott (1984), "Virtues of the Haversine", Sky and Telescope 68(2)

use serde::{Deserialize, Serialize};

/// Mean Earth radius (km), IUGG value.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A named point on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name (e.g., "Haarlem").
    pub name: String,
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,
}

impl Location {
    /// Creates a location.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another location (km).
    pub fn distance_km(&self, other: &Location) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }

    /// Whether the coordinates are within their valid ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn haarlem() -> Location {
        Location::new("Haarlem", 52.377639, 4.642735)
    }

    fn amsterdam() -> Location {
        Location::new("Amsterdam", 52.372776, 4.892222)
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert!(haarlem().distance_km(&haarlem()) < 1e-9);
    }

    #[test]
    fn test_distance_haarlem_amsterdam() {
        let d = haarlem().distance_km(&amsterdam());
        // ~17 km as the crow flies
        assert!((16.0..18.0).contains(&d), "got {d}");
        assert!((d - amsterdam().distance_km(&haarlem())).abs() < 1e-9);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(haarlem().has_valid_coordinates());
        assert!(!Location::new("bad", 91.0, 0.0).has_valid_coordinates());
        assert!(!Location::new("bad", 0.0, -180.5).has_valid_coordinates());
        assert!(!Location::new("bad", f64::NAN, 0.0).has_valid_coordinates());
    }
}
