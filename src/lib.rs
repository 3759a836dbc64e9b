//! Bike route uploads: GPX parsing, GeoJSON conversion, route metrics and the
//! HTTP surface that ties them together.

pub mod api;
pub mod config;
pub mod converter;
pub mod error;
pub mod gpx_types;
pub mod metrics;
pub mod options;
pub mod parser;
pub mod track;
pub mod upload;

pub use crate::error::{ConfigError, GpxError, MetricsError, UploadError};
pub use crate::metrics::{RouteMetrics, distance_miles, elevation_gain_feet, start_point};
pub use crate::track::{Coordinate, StartPoint, Track};
pub use crate::upload::{RouteDraft, RouteUpload, UploadLimits, process_upload};
