use std::str::FromStr;

use crate::error::LocationError;

/// A single point as (longitude, latitude) in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lng: f64,
    lat: f64,
}

impl Coordinate {
    /// Builds a coordinate from a numeric pair.
    ///
    /// # Errors
    /// Returns error if either value is not finite or out of range.
    pub fn new(lng: f64, lat: f64) -> Result<Self, LocationError> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(LocationError::NotFinite);
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::Latitude(lat));
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(LocationError::Longitude(lng));
        }

        Ok(Self { lng, lat })
    }

    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// JSON array text `[lng,lat]` stored by the contract.
    #[must_use]
    pub fn to_contract_string(&self) -> String {
        format!("[{},{}]", self.lng, self.lat)
    }
}

impl FromStr for Coordinate {
    type Err = LocationError;

    /// Parses `lng,lat`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((lng, lat)) = raw.split_once(',') else {
            return Err(LocationError::Format {
                input: raw.to_owned(),
                expected: "'lng,lat'",
            });
        };

        Self::new(parse_degrees(lng)?, parse_degrees(lat)?)
    }
}

fn parse_degrees(raw: &str) -> Result<f64, LocationError> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .map_err(|_| LocationError::NotANumber(raw.to_owned()))
}

/// Rough bounding rectangle given as two corners. The `from` corner comes first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRect {
    pub from: Coordinate,
    pub to: Coordinate,
}

impl LocationRect {
    #[must_use]
    pub const fn new(from: Coordinate, to: Coordinate) -> Self {
        Self { from, to }
    }

    /// JSON array text `[[lng,lat],[lng,lat]]` stored by the contract.
    #[must_use]
    pub fn to_contract_string(&self) -> String {
        format!(
            "[{},{}]",
            self.from.to_contract_string(),
            self.to.to_contract_string()
        )
    }
}

impl FromStr for LocationRect {
    type Err = LocationError;

    /// Parses `lng,lat|lng,lat`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut corners = raw.split('|');

        let (Some(from), Some(to), None) = (corners.next(), corners.next(), corners.next()) else {
            return Err(LocationError::Format {
                input: raw.to_owned(),
                expected: "'lng,lat|lng,lat'",
            });
        };

        Ok(Self::new(from.parse()?, to.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_point() {
        let point: Coordinate = "12.5,-7.25".parse().expect("valid point");
        assert_eq!((point.lng(), point.lat()), (12.5, -7.25));
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            "200,45".parse::<Coordinate>(),
            Err(LocationError::Longitude(200.0))
        );
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            "45,100".parse::<Coordinate>(),
            Err(LocationError::Latitude(100.0))
        );
    }

    #[test]
    fn rejects_non_finite_and_non_numeric() {
        assert_eq!("inf,0".parse::<Coordinate>(), Err(LocationError::NotFinite));
        assert!(matches!(
            "a,b".parse::<Coordinate>(),
            Err(LocationError::NotANumber(_))
        ));
        assert!(matches!(
            "12.5".parse::<Coordinate>(),
            Err(LocationError::Format { .. })
        ));
    }

    #[test]
    fn boundaries_are_inclusive() {
        for (lng, lat) in [(-180.0, -90.0), (180.0, 90.0), (0.0, 0.0)] {
            let point = Coordinate::new(lng, lat).expect("inside range");
            assert_eq!((point.lng(), point.lat()), (lng, lat));
        }
    }

    #[test]
    fn text_round_trips_inside_range() {
        let mut lng = -180.0;
        while lng <= 180.0 {
            let mut lat = -90.0;
            while lat <= 90.0 {
                let parsed: Coordinate = format!("{lng},{lat}").parse().expect("inside range");
                assert_eq!((parsed.lng(), parsed.lat()), (lng, lat));
                lat += 22.5;
            }
            lng += 45.0;
        }
    }

    #[test]
    fn parses_rectangle_in_order() {
        let rect: LocationRect = "1,1|2,2".parse().expect("valid rect");
        assert_eq!(rect.from, Coordinate::new(1.0, 1.0).expect("point"));
        assert_eq!(rect.to, Coordinate::new(2.0, 2.0).expect("point"));
    }

    #[test]
    fn rejects_malformed_rectangle() {
        for raw in ["1,1;2,2", "1,1", "1,1|2,2|3,3", "1,1|200,2"] {
            assert!(raw.parse::<LocationRect>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn contract_strings_match_json_arrays() {
        let rect: LocationRect = "1,1|2.5,-2".parse().expect("valid rect");
        assert_eq!(rect.to_contract_string(), "[[1,1],[2.5,-2]]");

        let value: serde_json::Value =
            serde_json::from_str(&rect.to_contract_string()).expect("json array");
        assert_eq!(value, serde_json::json!([[1, 1], [2.5, -2]]));
    }
}
