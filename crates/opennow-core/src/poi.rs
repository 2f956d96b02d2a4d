//! Domain types shared by the hours evaluator, the Overpass client and the
//! proximity search.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` when both components are finite and inside the valid
    /// latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}

/// Whether a POI is open at the evaluated instant.
///
/// `Unknown` means the opening hours could not be interpreted at all. It is a
/// valid result in its own right and must never be treated as `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenStatus {
    Open,
    Closed,
    Unknown,
}

impl OpenStatus {
    /// Sort rank for result lists: open first, then unknown, then closed.
    #[must_use]
    pub const fn display_rank(self) -> u8 {
        match self {
            OpenStatus::Open => 0,
            OpenStatus::Unknown => 1,
            OpenStatus::Closed => 2,
        }
    }
}

impl std::fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenStatus::Open => write!(f, "open"),
            OpenStatus::Closed => write!(f, "closed"),
            OpenStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// The kind of facility being searched for, as tagged in OpenStreetMap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    #[default]
    Pharmacy,
    Hospital,
}

impl Amenity {
    /// Value of the OSM `amenity=*` tag.
    #[must_use]
    pub const fn osm_tag(self) -> &'static str {
        match self {
            Amenity::Pharmacy => "pharmacy",
            Amenity::Hospital => "hospital",
        }
    }
}

impl std::fmt::Display for Amenity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.osm_tag())
    }
}

impl std::str::FromStr for Amenity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pharmacy" => Ok(Amenity::Pharmacy),
            "hospital" => Ok(Amenity::Hospital),
            other => Err(format!("unsupported amenity \"{other}\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rank_orders_open_unknown_closed() {
        assert!(OpenStatus::Open.display_rank() < OpenStatus::Unknown.display_rank());
        assert!(OpenStatus::Unknown.display_rank() < OpenStatus::Closed.display_rank());
    }

    #[test]
    fn open_status_serializes_snake_case() {
        let json = serde_json::to_string(&OpenStatus::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }

    #[test]
    fn amenity_parses_case_insensitively() {
        assert_eq!("Hospital".parse::<Amenity>().unwrap(), Amenity::Hospital);
        assert_eq!(" pharmacy ".parse::<Amenity>().unwrap(), Amenity::Pharmacy);
        assert!("clinic".parse::<Amenity>().is_err());
    }

    #[test]
    fn coordinate_validity_checks_ranges() {
        assert!(Coordinate::new(37.5663, 126.9779).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }
}
