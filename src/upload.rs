use geojson::FeatureCollection;
use serde::Serialize;

use crate::converter::{first_line, to_feature_collection};
use crate::error::UploadError;
use crate::metrics::RouteMetrics;
use crate::options::ConvertOptions;
use crate::parser::parse_gpx;
use crate::track::StartPoint;

/// Raw fields of a route upload, as they arrive from the client.
#[derive(Debug, Default)]
pub struct RouteUpload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub gpx: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_track_points: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_track_points: 200_000,
        }
    }
}

/// A route record ready to be stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "geoJSON")]
    pub geo_json: FeatureCollection,
    pub distance: f64,
    pub elevation_gain: f64,
    pub start_point: StartPoint,
}

/// Validate an upload and derive its route record.
///
/// The file and name are checked before the GPX is touched. Metrics come from
/// the line that would be the first LineString of a default conversion, so
/// `opts` only shapes the stored FeatureCollection.
pub fn process_upload(
    upload: RouteUpload,
    opts: &ConvertOptions,
    limits: &UploadLimits,
) -> Result<RouteDraft, UploadError> {
    let gpx = upload.gpx.ok_or(UploadError::MissingFile)?;
    let name = upload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(UploadError::MissingName)?;

    let doc = parse_gpx(std::str::from_utf8(&gpx)?)?;
    let track = first_line(&doc).ok_or(UploadError::NoLineString)?;

    if track.len() > limits.max_track_points {
        return Err(UploadError::TooManyPoints {
            count: track.len(),
            limit: limits.max_track_points,
        });
    }

    let metrics = RouteMetrics::from_track(&track)?;
    let geo_json = to_feature_collection(&doc, opts);

    Ok(RouteDraft {
        name,
        description: upload.description.filter(|d| !d.is_empty()),
        geo_json,
        distance: metrics.distance,
        elevation_gain: metrics.elevation_gain,
        start_point: metrics.start_point,
    })
}
