use serde::Deserialize;

/// Options for GPX to GeoJSON conversion. Deserializes from camelCase query
/// parameters; every flag defaults to including the data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Add elevation as the third position value when a point has one.
    pub include_elevation: bool,
    /// Add `coordinateProperties.times` to lines and `time` to waypoints.
    pub include_time: bool,
    /// Add `name`, `desc` and `type` properties.
    pub include_metadata: bool,
    /// Restrict which GPX element kinds become features (default: all).
    pub types: Option<Vec<GpxElementType>>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_elevation: true,
            include_time: true,
            include_metadata: true,
            types: None,
        }
    }
}

impl ConvertOptions {
    pub fn should_include(&self, element_type: GpxElementType) -> bool {
        self.types
            .as_ref()
            .is_none_or(|types| types.contains(&element_type))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpxElementType {
    Waypoint,
    Route,
    Track,
}

impl GpxElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waypoint => "waypoint",
            Self::Route => "route",
            Self::Track => "track",
        }
    }
}
