use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use bike_routes::api::router;
use bike_routes::config::Config;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "bike-routes-test-boundary";

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn app() -> Router {
    router(Config::default()).unwrap()
}

/// Build a multipart/form-data body. Fields with a filename are sent as files.
fn multipart_body(fields: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, value) in fields {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/gpx+xml\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn upload_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"API is running");
}

#[tokio::test]
async fn test_upload_returns_draft() {
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[
        ("name", None, "Embarcadero"),
        ("description", None, "Along the bay"),
        ("gpxFile", Some("ride.gpx"), gpx.as_str()),
    ]);

    let (status, json) = send(app(), upload_request("/api/bike-routes/metrics", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Embarcadero");
    assert_eq!(json["description"], "Along the bay");
    assert_eq!(json["distance"], 2.4);
    assert_eq!(json["elevationGain"], 164.0);
    assert_eq!(
        json["startPoint"],
        serde_json::json!({ "type": "Point", "coordinates": [-122.4194, 37.7749] })
    );
    assert_eq!(json["geoJSON"]["type"], "FeatureCollection");
    assert_eq!(json["geoJSON"]["features"][0]["geometry"]["type"], "LineString");
}

#[tokio::test]
async fn test_query_options_apply() {
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[("name", None, "Ride"), ("gpxFile", Some("ride.gpx"), gpx.as_str())]);

    let (status, json) = send(
        app(),
        upload_request("/api/bike-routes/metrics?includeTime=false", body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let props = &json["geoJSON"]["features"][0]["properties"];
    assert_eq!(props["name"], "Morning Ride");
    assert!(props.get("coordinateProperties").is_none());
}

#[tokio::test]
async fn test_metrics_ignore_display_options() {
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[("name", None, "Ride"), ("gpxFile", Some("ride.gpx"), gpx.as_str())]);

    let (status, json) = send(
        app(),
        upload_request("/api/bike-routes/metrics?includeElevation=false", body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["elevationGain"], 164.0);
    assert_eq!(json["distance"], 2.4);

    let coords = &json["geoJSON"]["features"][0]["geometry"]["coordinates"];
    assert_eq!(coords[0].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_query_is_json_error() {
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[("name", None, "Ride"), ("gpxFile", Some("ride.gpx"), gpx.as_str())]);

    let (status, json) = send(
        app(),
        upload_request("/api/bike-routes/metrics?includeTime=maybe", body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("includeTime"));
}

#[tokio::test]
async fn test_missing_multipart_is_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/bike-routes/metrics")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, json) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_oversized_upload() {
    let config = Config::from_lookup(|key| (key == "MAX_UPLOAD_BYTES").then(|| "64".to_string()))
        .unwrap();
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[("gpxFile", Some("ride.gpx"), gpx.as_str()), ("name", None, "Big")]);

    let (status, json) = send(
        router(config).unwrap(),
        upload_request("/api/bike-routes/metrics", body),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_missing_file() {
    let body = multipart_body(&[("name", None, "No file")]);
    let (status, json) = send(app(), upload_request("/api/bike-routes/metrics", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "GPX file is required");
}

#[tokio::test]
async fn test_missing_name() {
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[("gpxFile", Some("ride.gpx"), gpx.as_str())]);
    let (status, json) = send(app(), upload_request("/api/bike-routes/metrics", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Name is required");
}

#[tokio::test]
async fn test_no_line_string() {
    let gpx = load_fixture("waypoints_only.gpx");
    let body = multipart_body(&[("name", None, "Pins"), ("gpxFile", Some("pins.gpx"), gpx.as_str())]);
    let (status, json) = send(app(), upload_request("/api/bike-routes/metrics", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No LineString found in GPX");
}

#[tokio::test]
async fn test_track_point_limit() {
    let config = Config::from_lookup(|key| (key == "MAX_TRACK_POINTS").then(|| "3".to_string()))
        .unwrap();
    let gpx = load_fixture("sf_ride.gpx");
    let body = multipart_body(&[("name", None, "Long"), ("gpxFile", Some("ride.gpx"), gpx.as_str())]);

    let (status, json) = send(
        router(config).unwrap(),
        upload_request("/api/bike-routes/metrics", body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Track has 4 points, the limit is 3");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}
