use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A single sample along a path: degrees for position, meters for elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
    pub ele: Option<f64>,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64, ele: Option<f64>) -> Self {
        Self { lon, lat, ele }
    }

    /// Build from a GeoJSON position (`[lon, lat]` or `[lon, lat, ele]`).
    /// Returns `None` for positions with fewer than two values.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat] => Some(Self::new(*lon, *lat, None)),
            [lon, lat, ele, ..] => Some(Self::new(*lon, *lat, Some(*ele))),
            _ => None,
        }
    }

    /// Elevation in meters, with a missing sample counted as sea level.
    pub fn elevation_or_zero(&self) -> f64 {
        self.ele.unwrap_or(0.0)
    }
}

/// Ordered coordinates of one uploaded path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    points: Vec<Coordinate>,
}

impl Track {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }
}

impl From<Vec<Coordinate>> for Track {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Coordinate> for Track {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Longitude and latitude of the first sample of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPoint {
    pub longitude: f64,
    pub latitude: f64,
}

// Stored alongside the route as a GeoJSON Point.
impl Serialize for StartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Point", 2)?;
        state.serialize_field("type", "Point")?;
        state.serialize_field("coordinates", &[self.longitude, self.latitude])?;
        state.end()
    }
}
