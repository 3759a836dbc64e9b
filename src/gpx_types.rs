use crate::track::Coordinate;

/// Everything extracted from one GPX upload.
#[derive(Debug, Default)]
pub struct GpxDocument {
    pub waypoints: Vec<GpxPoint>,
    pub routes: Vec<GpxPath>,
    pub tracks: Vec<GpxTrack>,
}

/// A `<wpt>`, `<rtept>` or `<trkpt>`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<String>,
    pub name: Option<String>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
            name: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lon, self.lat, self.ele)
    }
}

/// Descriptive fields shared by `<rte>` and `<trk>`.
#[derive(Debug, Default)]
pub struct PathInfo {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub kind: Option<String>,
}

/// A `<rte>`.
#[derive(Debug, Default)]
pub struct GpxPath {
    pub info: PathInfo,
    pub points: Vec<GpxPoint>,
}

/// A `<trk>`; each segment keeps its own point list.
#[derive(Debug, Default)]
pub struct GpxTrack {
    pub info: PathInfo,
    pub segments: Vec<Vec<GpxPoint>>,
}

impl GpxTrack {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}
