//! Geographic coordinate type.

use std::fmt;

use serde::Serialize;

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoord {
    reason: &'static str,
}

/// A WGS-84 position in degrees, latitude first.
///
/// Every `Coord` is finite and within range by construction, so distance
/// computations never see NaN.
///
/// # Examples
///
/// ```
/// use bikeshare_server::domain::Coord;
///
/// let chicago = Coord::new(41.85, -87.65).unwrap();
/// assert_eq!(chicago.lat(), 41.85);
///
/// assert!(Coord::new(91.0, 0.0).is_err());
/// assert!(Coord::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
    lat: f64,
    lon: f64,
}

impl Coord {
    /// Build a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoord> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoord {
                reason: "latitude and longitude must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoord {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoord {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Build a coordinate from a longitude-first pair, as GeoJSON and OSRM
    /// encode positions.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Result<Self, InvalidCoord> {
        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_ranges() {
        assert!(Coord::new(0.0, 0.0).is_ok());
        assert!(Coord::new(90.0, 180.0).is_ok());
        assert!(Coord::new(-90.0, -180.0).is_ok());
        assert!(Coord::new(41.85003, -87.65005).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coord::new(90.1, 0.0).is_err());
        assert!(Coord::new(-90.1, 0.0).is_err());
        assert!(Coord::new(0.0, 180.5).is_err());
        assert!(Coord::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coord::new(f64::NAN, 0.0).is_err());
        assert!(Coord::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn lon_lat_order_is_swapped() {
        let c = Coord::from_lon_lat(-87.65, 41.85).unwrap();
        assert_eq!(c.lat(), 41.85);
        assert_eq!(c.lon(), -87.65);
    }

    #[test]
    fn point_is_lon_first() {
        let p = Coord::new(41.85, -87.65).unwrap().to_point();
        assert_eq!(p.x(), -87.65);
        assert_eq!(p.y(), 41.85);
    }

    #[test]
    fn display_and_debug() {
        let c = Coord::new(41.5, -87.25).unwrap();
        assert_eq!(c.to_string(), "41.5,-87.25");
        assert_eq!(format!("{:?}", c), "Coord(41.5, -87.25)");
    }
}
