//! Geographic primitives: coordinate value type and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, matching the haversine convention used
/// throughout the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance to `other`, in kilometres.
    pub fn distance_km(&self, other: &LatLng) -> f64 {
        let (lat1, lng1) = (self.lat.to_radians(), self.lng.to_radians());
        let (lat2, lng2) = (other.lat.to_radians(), other.lng.to_radians());
        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;
        let sin_dlat = (dlat * 0.5).sin();
        let sin_dlng = (dlng * 0.5).sin();
        let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = LatLng::new(37.7749, -122.4194);
        assert_eq!(p.distance_km(&p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LatLng::new(37.7749, -122.4194);
        let b = LatLng::new(37.8044, -122.2712);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-12);
    }

    #[test]
    fn known_distance_sf_to_oakland() {
        // SF downtown to Oakland downtown is roughly 13.4 km great-circle.
        let sf = LatLng::new(37.7749, -122.4194);
        let oakland = LatLng::new(37.8044, -122.2712);
        let d = sf.distance_km(&oakland);
        assert!(d > 12.5 && d < 14.5, "got {d}");
    }

    #[test]
    fn one_degree_latitude_is_about_111_km() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let d = a.distance_km(&b);
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }
}
