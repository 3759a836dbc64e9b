use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;

use crate::gpx_types::*;
use crate::options::{ConvertOptions, GpxElementType};
use crate::track::{Coordinate, Track};

/// Convert a parsed GPX document to a GeoJSON FeatureCollection.
///
/// Features are emitted tracks first, then routes, then waypoints. Lines need
/// at least two points; shorter segments and routes are dropped.
pub fn to_feature_collection(doc: &GpxDocument, opts: &ConvertOptions) -> FeatureCollection {
    let mut features = Vec::new();

    if opts.should_include(GpxElementType::Track) {
        features.extend(doc.tracks.iter().filter_map(|trk| track_feature(trk, opts)));
    }

    if opts.should_include(GpxElementType::Route) {
        features.extend(
            doc.routes
                .iter()
                .filter(|rte| rte.points.len() >= 2)
                .map(|rte| {
                    let geometry = Value::LineString(positions(&rte.points, opts));
                    let mut props = path_props(GpxElementType::Route, &rte.info, opts);
                    if opts.include_time {
                        insert_times(&mut props, times(&rte.points));
                    }
                    feature(geometry, props)
                }),
        );
    }

    if opts.should_include(GpxElementType::Waypoint) {
        features.extend(doc.waypoints.iter().map(|wpt| waypoint_feature(wpt, opts)));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Points of the line that converts to the first `LineString` feature under
/// default options: the first track with exactly one usable segment, else the
/// first route with two or more points.
/// Display options never change which line this is or its elevations.
pub fn first_line(doc: &GpxDocument) -> Option<Track> {
    let points = doc
        .tracks
        .iter()
        .find_map(|trk| match usable_segments(trk).as_slice() {
            [only] => Some(*only),
            _ => None,
        })
        .or_else(|| {
            doc.routes
                .iter()
                .map(|rte| &rte.points)
                .find(|points| points.len() >= 2)
        })?;

    Some(points.iter().map(GpxPoint::coordinate).collect())
}

/// Coordinates of the first `LineString` feature, in file order.
pub fn first_line_string(collection: &FeatureCollection) -> Option<Track> {
    collection.features.iter().find_map(|f| {
        match &f.geometry.as_ref()?.value {
            Value::LineString(line) => Some(
                line.iter()
                    .filter_map(|position| Coordinate::from_position(position))
                    .collect(),
            ),
            _ => None,
        }
    })
}

/// One feature per track: a LineString for a single usable segment, a
/// MultiLineString when there are several, nothing when there are none.
fn track_feature(trk: &GpxTrack, opts: &ConvertOptions) -> Option<Feature> {
    let (geometry, line_times) = match usable_segments(trk).as_slice() {
        [] => return None,
        [only] => (Value::LineString(positions(only, opts)), times(only)),
        many => (
            Value::MultiLineString(many.iter().map(|seg| positions(seg, opts)).collect()),
            JsonValue::Array(many.iter().map(|seg| times(seg)).collect()),
        ),
    };

    let mut props = path_props(GpxElementType::Track, &trk.info, opts);
    if opts.include_time {
        insert_times(&mut props, line_times);
    }

    Some(feature(geometry, props))
}

fn usable_segments(trk: &GpxTrack) -> Vec<&Vec<GpxPoint>> {
    trk.segments.iter().filter(|s| s.len() >= 2).collect()
}

fn waypoint_feature(pt: &GpxPoint, opts: &ConvertOptions) -> Feature {
    let mut props = JsonObject::new();
    props.insert(
        "gpxType".to_string(),
        GpxElementType::Waypoint.as_str().into(),
    );
    if opts.include_metadata {
        if let Some(name) = &pt.name {
            props.insert("name".to_string(), name.as_str().into());
        }
    }
    if opts.include_time {
        if let Some(time) = &pt.time {
            props.insert("time".to_string(), time.as_str().into());
        }
    }

    feature(Value::Point(position(pt, opts)), props)
}

fn path_props(kind: GpxElementType, info: &PathInfo, opts: &ConvertOptions) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("gpxType".to_string(), kind.as_str().into());

    if opts.include_metadata {
        for (key, value) in [("name", &info.name), ("desc", &info.desc), ("type", &info.kind)] {
            if let Some(v) = value {
                props.insert(key.to_string(), v.as_str().into());
            }
        }
    }

    props
}

fn feature(value: Value, props: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// `[lon, lat]` or `[lon, lat, ele]`.
fn position(pt: &GpxPoint, opts: &ConvertOptions) -> Vec<f64> {
    match pt.ele {
        Some(ele) if opts.include_elevation => vec![pt.lon, pt.lat, ele],
        _ => vec![pt.lon, pt.lat],
    }
}

fn positions(points: &[GpxPoint], opts: &ConvertOptions) -> Vec<Vec<f64>> {
    points.iter().map(|pt| position(pt, opts)).collect()
}

fn times(points: &[GpxPoint]) -> JsonValue {
    points
        .iter()
        .map(|pt| pt.time.as_deref().map_or(JsonValue::Null, JsonValue::from))
        .collect()
}

/// Add `coordinateProperties.times` unless every timestamp is missing.
fn insert_times(props: &mut JsonObject, times: JsonValue) {
    if !has_time(&times) {
        return;
    }
    let mut coord_props = JsonObject::new();
    coord_props.insert("times".to_string(), times);
    props.insert(
        "coordinateProperties".to_string(),
        JsonValue::Object(coord_props),
    );
}

fn has_time(value: &JsonValue) -> bool {
    match value {
        JsonValue::Array(items) => items.iter().any(has_time),
        JsonValue::Null => false,
        _ => true,
    }
}
