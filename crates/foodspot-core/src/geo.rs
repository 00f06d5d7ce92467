//! Geographic primitives: validated coordinates, grid keys, great-circle
//! distance and the human-readable distance/time formats shown to users.

use std::fmt;

use serde::Serialize;

use crate::CoreError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Ten-thousandths of a degree, i.e. 4 decimal places (~11 m at the equator).
const GRID_SCALE: f64 = 10_000.0;

/// A validated WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidCoordinateFormat`] if either value is NaN or infinite.
    /// - [`CoreError::LatitudeOutOfRange`] if latitude is outside `[-90, 90]`.
    /// - [`CoreError::LongitudeOutOfRange`] if longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoreError::InvalidCoordinateFormat);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub fn grid_key(&self) -> GridKey {
        GridKey::from(*self)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A coordinate snapped to 4 decimal places, stored as integer
/// ten-thousandths so it hashes and compares exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    pub lat_e4: i64,
    pub lng_e4: i64,
}

impl From<Coordinate> for GridKey {
    #[allow(clippy::cast_possible_truncation)]
    fn from(coord: Coordinate) -> Self {
        // Validated coordinates are bounded by ±180, far inside i64 range.
        Self {
            lat_e4: (coord.latitude * GRID_SCALE).round() as i64,
            lng_e4: (coord.longitude * GRID_SCALE).round() as i64,
        }
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lat_e4, self.lng_e4)
    }
}

/// Great-circle distance between two points in meters.
#[must_use]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// `"420 m"` below one kilometer, `"1.3 km"` otherwise.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round())
    } else {
        // Round half up; `{:.1}` alone rounds ties to even.
        format!("{:.1} km", (meters / 100.0).round() / 10.0)
    }
}

/// Rounds to whole minutes with a one-minute floor; durations of an hour or
/// more render as `"1h 5m"` (or `"2h"` when the minutes are zero).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round();
    if minutes < 1.0 {
        return "1 min".to_string();
    }
    let minutes = minutes as u64;
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rem = minutes % 60;
    if rem > 0 {
        format!("{hours}h {rem}m")
    } else {
        format!("{hours}h")
    }
}
