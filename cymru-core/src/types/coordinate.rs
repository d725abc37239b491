//! Geographic coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeocodeError, Result};

/// A WGS84 latitude/longitude pair.
///
/// Serialized as `{"lat": .., "lng": ..}`, the shape the map front end and the
/// durable snapshot use. `latitude`/`longitude` are accepted when reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Degrees north, in `[-90, 90]`
    #[serde(alias = "latitude")]
    pub lat: f64,
    /// Degrees east, in `[-180, 180]`
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating it.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self> {
        let coord = Self::new(lat, lng);
        coord.validate()?;
        Ok(coord)
    }

    /// Checks that both components are finite and within range.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(GeocodeError::ValidationError(format!(
                "coordinate is not finite: {self}"
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeocodeError::ValidationError(format!(
                "latitude out of range: {}",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeocodeError::ValidationError(format!(
                "longitude out of range: {}",
                self.lng
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}
