//! HTTP tests for the diagnosis service router.
//!
//! Run: cargo test --package mangoscan-api --test analyze_tests

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use image::{ImageFormat, Rgb, RgbImage};
use mangoscan::strategy::FALLBACK_VERSION;
use mangoscan::{Diagnoser, Threshold, select_strategy};
use mangoscan_api::construct_router;
use mangoscan_api::state::{Limits, State};
use mangoscan_types::{Classifier, DiagnosisError, DiagnosisResult, LeafImage};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "mangoscan-test-boundary";

fn fallback_state(threshold: f64, limits: Limits) -> Arc<State> {
    let strategy = select_strategy(Err(DiagnosisError::model_unavailable("no checkpoint")));
    let diagnoser = Diagnoser::new(strategy, Threshold::new(threshold).unwrap());
    Arc::new(State::new(diagnoser, limits))
}

fn green_leaf_png() -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, Rgb([20, 160, 20]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"leaf.png\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(state: Arc<State>, request: Request<Body>) -> (StatusCode, Value) {
    let response = construct_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Drive one request on a current-thread runtime with a local Prometheus recorder and
/// return the status, the body and the rendered metrics.
fn send_recorded(state: Arc<State>, request: Request<Body>) -> (StatusCode, Value, String) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let (status, json) =
        metrics::with_local_recorder(&recorder, || runtime.block_on(send(state, request)));
    (status, json, handle.render())
}

#[tokio::test]
async fn green_leaf_is_healthy_with_fallback() {
    let state = fallback_state(0.65, Limits::default());
    let body = multipart_body("image", "image/png", &green_leaf_png());
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["diagnosis"], "Healthy");
    assert_eq!(json["rawPrediction"], "Healthy");
    assert_eq!(json["lowConfidence"], false);
    assert_eq!(json["modelVersion"], FALLBACK_VERSION);
    assert_eq!(json["minConfidence"], 0.65);
    assert!(json.get("warning").is_none());
    assert!(json["topPredictions"].as_array().unwrap().len() <= 3);
    assert!(
        json["practices"][0]
            .as_str()
            .is_some_and(|p| p.starts_with("No major disease signs detected"))
    );
}

#[tokio::test]
async fn strict_threshold_reports_uncertain() {
    let state = fallback_state(0.9, Limits::default());
    let body = multipart_body("image", "image/png", &green_leaf_png());
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["diagnosis"], "Uncertain");
    assert_eq!(json["rawPrediction"], "Healthy");
    assert_eq!(json["lowConfidence"], true);
    assert!(json["warning"].as_str().is_some_and(|w| !w.is_empty()));
    assert_eq!(json["topPredictions"][0]["label"], "Healthy");
}

#[tokio::test]
async fn rejects_non_image_upload() {
    let state = fallback_state(0.65, Limits::default());
    let body = multipart_body("image", "text/plain", b"not a leaf");
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert_eq!(json["error"]["message"], "Uploaded file must be an image");
}

#[tokio::test]
async fn rejects_empty_upload() {
    let state = fallback_state(0.65, Limits::default());
    let body = multipart_body("image", "image/png", b"");
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "Empty file");
}

#[tokio::test]
async fn rejects_undecodable_upload() {
    let state = fallback_state(0.65, Limits::default());
    let body = multipart_body("image", "image/png", b"\x00\x01garbage bytes");
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Invalid image"))
    );
}

#[tokio::test]
async fn rejects_missing_image_field() {
    let state = fallback_state(0.65, Limits::default());
    let body = multipart_body("photo", "image/png", &green_leaf_png());
    let (status, _) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_oversized_upload() {
    let limits = Limits {
        max_image_size_bytes: 16,
        ..Limits::default()
    };
    let state = fallback_state(0.65, limits);
    let body = multipart_body("image", "image/png", &green_leaf_png());
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[test]
fn non_multipart_body_gets_json_envelope() {
    let state = fallback_state(0.65, Limits::default());
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let (status, json, metrics) = send_recorded(state, request);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Expected multipart/form-data"))
    );
    assert!(metrics.contains(r#"analyze_rejections_total{reason="not_multipart"} 1"#));
}

#[test]
fn body_over_transport_limit_is_counted() {
    let limits = Limits {
        max_image_size_bytes: 16,
        ..Limits::default()
    };
    let state = fallback_state(0.65, limits);
    let oversized = vec![0u8; 128 * 1024];
    let body = multipart_body("image", "image/png", &oversized);
    let (status, json, metrics) = send_recorded(state, analyze_request(body));

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    assert!(metrics.contains(r#"analyze_rejections_total{reason="too_large"} 1"#));
}

#[test]
fn truncated_multipart_is_counted_as_malformed() {
    let state = fallback_state(0.65, Limits::default());
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"leaf.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(&green_leaf_png());
    let (status, json, metrics) = send_recorded(state, analyze_request(body));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_object());
    assert!(metrics.contains(r#"analyze_rejections_total{reason="malformed"} 1"#));
}

struct SlowClassifier {
    labels: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl Classifier for SlowClassifier {
    fn version(&self) -> &str {
        "slow-v1"
    }

    fn class_labels(&self) -> &[String] {
        &self.labels
    }

    fn scores(&self, _image: &LeafImage) -> DiagnosisResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(300));
        Ok(vec![1.0; self.labels.len()])
    }
}

#[tokio::test]
async fn slow_inference_times_out() {
    let classifier = SlowClassifier {
        labels: vec!["Healthy".to_string(), "Anthracnose".to_string()],
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let strategy = select_strategy(Ok(Arc::new(classifier)));
    let diagnoser = Diagnoser::new(strategy, Threshold::default());
    let limits = Limits {
        inference_timeout: Duration::from_millis(20),
        ..Limits::default()
    };
    let state = Arc::new(State::new(diagnoser, limits));

    let body = multipart_body("image", "image/png", &green_leaf_png());
    let (status, json) = send(state, analyze_request(body)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"]["code"], "INFERENCE_TIMEOUT");
}

#[tokio::test]
async fn stalled_inference_holds_its_slot_past_the_timeout() {
    let calls = Arc::new(AtomicUsize::new(0));
    let classifier = SlowClassifier {
        labels: vec!["Healthy".to_string(), "Anthracnose".to_string()],
        calls: calls.clone(),
    };
    let strategy = select_strategy(Ok(Arc::new(classifier)));
    let diagnoser = Diagnoser::new(strategy, Threshold::default());
    let limits = Limits {
        inference_timeout: Duration::from_millis(50),
        max_concurrent_inferences: 1,
        ..Limits::default()
    };
    let state = Arc::new(State::new(diagnoser, limits));

    let body = multipart_body("image", "image/png", &green_leaf_png());
    let (first, _) = send(state.clone(), analyze_request(body.clone())).await;
    assert_eq!(first, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(state.inference_permits.available_permits(), 0);

    let (second, json) = send(state.clone(), analyze_request(body)).await;
    assert_eq!(second, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"]["code"], "INFERENCE_TIMEOUT");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn health_reports_fallback_strategy() {
    let state = fallback_state(0.65, Limits::default());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "mangoscan-ai");
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["num_classes"], 0);
    assert_eq!(json["min_confidence"], 0.65);
    assert_eq!(json["model_version"], FALLBACK_VERSION);
}

#[tokio::test]
async fn serves_openapi_document() {
    let state = fallback_state(0.65, Limits::default());
    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"].get("/analyze").is_some());
    assert!(json["paths"].get("/health").is_some());
}
