use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::options::ConvertOptions;
use crate::upload::{RouteDraft, RouteUpload, process_upload};

pub struct RouteMetricsResponse(RouteDraft);

impl IntoResponse for RouteMetricsResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

/// `POST /api/bike-routes/metrics`
///
/// Multipart fields: `gpxFile` (the GPX document), `name`, `description`.
/// Query parameters are the boolean `ConvertOptions` flags.
pub async fn route_metrics_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ConvertOptions>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<RouteMetricsResponse, ApiError> {
    let Query(opts) = query?;
    let mut multipart = multipart?;
    let mut upload = RouteUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("gpxFile") => upload.gpx = Some(field.bytes().await?.to_vec()),
            Some("name") => upload.name = Some(field.text().await?),
            Some("description") => upload.description = Some(field.text().await?),
            _ => {}
        }
    }

    let limits = state.config.limits;
    let draft = tokio::task::spawn_blocking(move || process_upload(upload, &opts, &limits))
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))??;

    info!(
        name = %draft.name,
        distance = draft.distance,
        elevation_gain = draft.elevation_gain,
        "computed route metrics"
    );

    Ok(RouteMetricsResponse(draft))
}
