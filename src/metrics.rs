//! Summary statistics derived from a track: distance, climbing and start point.
//!
//! Every function here is pure and linear in the number of points. Degenerate
//! tracks (zero or one point) produce zero distance and zero gain. Coordinates
//! are not validated: NaN in, NaN out.

use serde::Serialize;

use crate::error::MetricsError;
use crate::track::{Coordinate, StartPoint, Track};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

pub const FEET_PER_METER: f64 = 3.28084;

/// Metrics for one track, as handed to the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    /// Miles, rounded to one decimal.
    pub distance: f64,
    /// Feet, rounded to a whole number.
    pub elevation_gain: f64,
    pub start_point: StartPoint,
}

impl RouteMetrics {
    pub fn from_track(track: &Track) -> Result<Self, MetricsError> {
        let points = track.points();
        Ok(Self {
            start_point: start_point(points)?,
            distance: distance_miles(points),
            elevation_gain: elevation_gain_feet(points),
        })
    }
}

/// Total Haversine distance along the path, in miles, rounded to a tenth.
pub fn distance_miles(points: &[Coordinate]) -> f64 {
    let total = points
        .windows(2)
        .map(|pair| haversine_miles(&pair[0], &pair[1]))
        .fold(0.0, |acc, d| acc + d);
    round_to_tenth(total)
}

/// Sum of positive elevation deltas, converted to feet and rounded.
/// Descents are ignored, not subtracted.
pub fn elevation_gain_feet(points: &[Coordinate]) -> f64 {
    // Summing from +0.0; an empty f64 `sum()` is -0.0.
    let gain_meters = points
        .windows(2)
        .map(|pair| pair[1].elevation_or_zero() - pair[0].elevation_or_zero())
        .filter(|delta| *delta > 0.0)
        .fold(0.0, |acc, d| acc + d);
    (gain_meters * FEET_PER_METER).round()
}

/// Longitude and latitude of the first point.
pub fn start_point(points: &[Coordinate]) -> Result<StartPoint, MetricsError> {
    let first = points.first().ok_or(MetricsError::EmptyTrack)?;
    Ok(StartPoint {
        longitude: first.lon,
        latitude: first.lat,
    })
}

fn haversine_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Round half away from zero to one decimal place.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
