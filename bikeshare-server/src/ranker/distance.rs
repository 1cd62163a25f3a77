//! Distance metrics between coordinates.

use geo::GeodesicDistance;

use crate::domain::Coord;

/// A distance between two coordinates, in kilometres.
pub trait DistanceMetric {
    fn distance_km(&self, a: Coord, b: Coord) -> f64;
}

/// Shortest path on the WGS-84 ellipsoid (Karney's algorithm).
#[derive(Debug, Clone, Copy, Default)]
pub struct Geodesic;

impl DistanceMetric for Geodesic {
    fn distance_km(&self, a: Coord, b: Coord) -> f64 {
        a.to_point().geodesic_distance(&b.to_point()) / 1000.0
    }
}

impl<M: DistanceMetric + ?Sized> DistanceMetric for &M {
    fn distance_km(&self, a: Coord, b: Coord) -> f64 {
        (**self).distance_km(a, b)
    }
}
