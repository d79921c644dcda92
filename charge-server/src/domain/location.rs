//! Geographic coordinates and the rounded keys used to partition the cache.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Create a location, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use charge_server::domain::Location;
    ///
    /// assert!(Location::new(37.7749, -122.4194).is_ok());
    /// assert!(Location::new(91.0, 0.0).is_err());
    /// assert!(Location::new(0.0, f64::NAN).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Round both coordinates to one decimal place.
    pub fn rounded(&self) -> RoundedLocation {
        RoundedLocation {
            lat: round_tenth(self.lat),
            lng: round_tenth(self.lng),
        }
    }
}

/// A location rounded to one decimal place (roughly 11 km of latitude).
///
/// Two searches whose coordinates round to the same tenth of a degree share
/// one cache record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundedLocation {
    pub lat: f64,
    pub lng: f64,
}

impl RoundedLocation {
    /// The cache partition key, formatted `"{lat},{lng}"`.
    pub fn key(&self) -> LocationKey {
        LocationKey(format!("{:.1},{:.1}", self.lat, self.lng))
    }

    pub fn as_location(&self) -> Location {
        Location {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// String key identifying one cached result set, e.g. `"37.8,-122.4"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round to one decimal from the exact binary value, so `1.45` (stored as
/// 1.4499999...) rounds down. Exact ties such as `0.25` round away from zero.
fn round_tenth(value: f64) -> f64 {
    let is_tie = (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    let rounded = if is_tie {
        (value * 10.0).round() / 10.0
    } else {
        format!("{value:.1}").parse().unwrap_or(value)
    };
    // -0.0 would otherwise format as "-0.0" and split the key space
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn san_francisco_keys_to_one_decimal() {
        let loc = Location::new(37.7749, -122.4194).unwrap();
        assert_eq!(loc.rounded().key().as_str(), "37.8,-122.4");
    }

    #[test]
    fn whole_degrees_keep_trailing_zero() {
        let loc = Location::new(40.0, -74.0).unwrap();
        assert_eq!(loc.rounded().key().as_str(), "40.0,-74.0");
    }

    #[test]
    fn rounds_the_stored_binary_value() {
        let loc = Location::new(1.45, -122.45).unwrap();
        assert_eq!(loc.rounded().key().as_str(), "1.4,-122.5");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        let loc = Location::new(0.25, -0.75).unwrap();
        assert_eq!(loc.rounded().key().as_str(), "0.3,-0.8");
    }

    #[test]
    fn negative_zero_is_normalised() {
        let loc = Location::new(-0.04, 0.03).unwrap();
        assert_eq!(loc.rounded().key().as_str(), "0.0,0.0");
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(matches!(
            Location::new(-90.5, 0.0),
            Err(DomainError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Location::new(0.0, 180.01),
            Err(DomainError::InvalidLongitude(_))
        ));
        assert!(Location::new(f64::INFINITY, 0.0).is_err());
    }

    proptest! {
        #[test]
        fn nearby_points_share_a_key(
            lat in -89.0f64..89.0,
            lng in -179.0f64..179.0,
        ) {
            let loc = Location::new(lat, lng).unwrap();
            let rounded = loc.rounded();
            // Re-rounding an already rounded location is stable.
            let again = rounded.as_location().rounded();
            prop_assert_eq!(rounded.key(), again.key());
            prop_assert!((rounded.lat - lat).abs() <= 0.05 + 1e-9);
            prop_assert!((rounded.lng - lng).abs() <= 0.05 + 1e-9);
        }
    }
}
