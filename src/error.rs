use std::str::Utf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpxError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("document has no <gpx> root element")]
    NotGpx,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("track has no points")]
    EmptyTrack,
}

/// Reasons an upload is rejected. All of them are the client's fault.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("GPX file is required")]
    MissingFile,
    #[error("Name is required")]
    MissingName,
    #[error("GPX file is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] Utf8Error),
    #[error("Invalid GPX: {0}")]
    InvalidGpx(#[from] GpxError),
    #[error("No LineString found in GPX")]
    NoLineString,
    #[error("Track has no points")]
    EmptyTrack,
    #[error("Track has {count} points, the limit is {limit}")]
    TooManyPoints { count: usize, limit: usize },
}

impl From<MetricsError> for UploadError {
    fn from(e: MetricsError) -> Self {
        match e {
            MetricsError::EmptyTrack => Self::EmptyTrack,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}
