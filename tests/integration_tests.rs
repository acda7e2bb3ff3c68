//! Integration tests for TripAI: HTTP API, model client and CLI

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use tripai::api::{self, AppState};
use tripai::web;
use tripai::config::ModelConfig;
use tripai::{
    DemoModelClient, GeminiClient, ModelClient, PdfExporter, TileLayer, TripAiError, TripPlanner,
    TripRequest,
};

const TWO_DAY_TRIP: &str = r#"{
  "destination": "Paris",
  "days": [
    {"day": 1, "activities": [
      {"name": "Eiffel Tower", "time": "09:00", "location": "Champ de Mars",
       "coordinates": {"lat": 48.8584, "lon": 2.2945}, "estimated_cost": 28},
      {"name": "Seine cruise", "time": "18:00", "location": "Port de la Bourdonnais"}
    ]},
    {"day": 2, "activities": [
      {"name": "Louvre", "time": "10:00", "location": "Rue de Rivoli",
       "coordinates": {"lat": 48.8606, "lon": 2.3376}, "estimated_cost": 22}
    ]}
  ]
}"#;

fn demo_state() -> AppState {
    AppState {
        planner: TripPlanner::new(Arc::new(DemoModelClient::new())),
        default_tile_layer: TileLayer::Standard,
        exporter: PdfExporter::new(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), content_type)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Start a stand-in for the Gemini API that answers every request the same way
async fn spawn_model_server(status: StatusCode, body: Value) -> String {
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, Json(body)).into_response() }
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gemini_client(base_url: String) -> GeminiClient {
    gemini_client_with_timeout(base_url, 5)
}

fn gemini_client_with_timeout(base_url: String, timeout_seconds: u32) -> GeminiClient {
    let config = ModelConfig {
        api_key: Some("test-key-123456".to_string()),
        base_url,
        model: "gemini-test".to_string(),
        timeout_seconds,
    };
    GeminiClient::new(&config).unwrap()
}

fn assert_unreachable(err: TripAiError) {
    assert!(
        err.user_message().contains("Unable to reach"),
        "{}",
        err.user_message()
    );
    match err {
        TripAiError::Request { status, .. } => assert_eq!(status, None),
        other => panic!("expected request error, got {other:?}"),
    }
}

/// Health endpoint reports the active model client
#[tokio::test]
async fn test_health_endpoint() {
    let app = api::router(demo_state());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body, _) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "demo");
}

/// Every base map style is offered to the form
#[tokio::test]
async fn test_tile_layers_endpoint() {
    let app = api::router(demo_state());
    let request = Request::builder().uri("/tile-layers").body(Body::empty()).unwrap();
    let (status, body, _) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let layers: Value = serde_json::from_slice(&body).unwrap();
    let ids: Vec<&str> = layers
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|layer| layer["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["standard", "satellite", "dark"]);
}

/// An empty destination is rejected before the model is called
#[tokio::test]
async fn test_generate_rejects_invalid_form() {
    let app = api::router(demo_state());
    let form = json!({"destination": "  ", "budget": 1000, "duration_days": 3});
    let (status, body, _) = send(app, post_json("/itinerary", &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().contains("Destination"));
}

/// A body with the wrong field types gets the same JSON error shape as other bad input
#[tokio::test]
async fn test_generate_rejects_mistyped_body() {
    let app = api::router(demo_state());
    let form = json!({"destination": "Paris", "budget": "abc", "duration_days": 2});
    let (status, body, content_type) = send(app, post_json("/itinerary", &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

/// A body that is not JSON at all is rejected the same way
#[tokio::test]
async fn test_generate_rejects_malformed_body() {
    let app = api::router(demo_state());
    let request = Request::builder()
        .method("POST")
        .uri("/itinerary")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"destination\": "))
        .unwrap();
    let (status, body, content_type) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["kind"], "validation");
}

/// Generating returns the itinerary, its text rendering and the map view
#[tokio::test]
async fn test_generate_itinerary_in_demo_mode() {
    let app = api::router(demo_state());
    let form = json!({
        "destination": "Paris",
        "budget": 1500,
        "duration_days": 2,
        "interests": ["Food", "Heritage"],
        "custom_interest": "Nightlife",
        "tile_layer": "dark"
    });
    let (status, body, _) = send(app, post_json("/itinerary", &form)).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["itinerary"]["days"].as_array().unwrap().len(), 2);
    assert_eq!(body["map"]["markers"].as_array().unwrap().len(), 3);
    assert_eq!(body["map"]["tile_layer"]["id"], "dark");
    assert_eq!(
        body["request"]["interests"],
        json!(["Food", "Heritage", "Nightlife"])
    );
    assert!(body["text"].as_str().unwrap().contains("Your 2-Day Trip to Paris"));
}

/// The download action turns a shown itinerary into a PDF attachment
#[tokio::test]
async fn test_export_pdf_endpoint() {
    let state = demo_state();
    let request = TripRequest::new("Paris", 1500.0, 2, ["Food"]).unwrap();
    let itinerary = state.planner.plan(&request).await.unwrap();
    let payload = json!({"request": request, "itinerary": itinerary});

    let (status, body, content_type) =
        send(api::router(state), post_json("/itinerary/pdf", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert!(body.starts_with(b"%PDF-"));
    let tail = String::from_utf8_lossy(&body[body.len().saturating_sub(32)..]).to_string();
    assert!(tail.contains("%%EOF"), "{tail}");
}

/// A posted itinerary without days is bad input, not a server failure
#[tokio::test]
async fn test_export_pdf_rejects_empty_itinerary() {
    let request = TripRequest::new("Paris", 1500.0, 2, ["Food"]).unwrap();
    let payload = json!({"request": request, "itinerary": {"destination": "Paris", "days": []}});

    let (status, body, _) =
        send(api::router(demo_state()), post_json("/itinerary/pdf", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().contains("no days"));
}

/// The form page is served outside `/api` and shows popups as plain text
#[tokio::test]
async fn test_form_page_is_served() {
    let app = web::app(demo_state(), concat!(env!("CARGO_MANIFEST_DIR"), "/frontend"));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body, content_type) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("popup.textContent = marker.popup"));
    assert!(!page.contains("bindPopup(marker.popup)"));
}

/// The client pulls the text out of a generateContent envelope
#[tokio::test]
async fn test_gemini_client_extracts_text() {
    let envelope = json!({
        "candidates": [{
            "content": {"parts": [{"text": TWO_DAY_TRIP}]},
            "finishReason": "STOP"
        }]
    });
    let base_url = spawn_model_server(StatusCode::OK, envelope).await;
    let client = gemini_client(base_url);

    let text = client.complete("plan a trip").await.unwrap();
    assert!(text.contains("Eiffel Tower"));
    assert_eq!(client.name(), "gemini-test");
}

/// A server error from the model API surfaces as a request error with its status
#[tokio::test]
async fn test_gemini_server_error_is_request_error() {
    let base_url = spawn_model_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "backend unavailable"}}),
    )
    .await;
    let planner = TripPlanner::new(Arc::new(gemini_client(base_url)));
    let request = TripRequest::new("Paris", 1000.0, 2, ["Food"]).unwrap();

    let err = planner.plan(&request).await.unwrap_err();
    match err {
        TripAiError::Request { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("expected request error, got {other:?}"),
    }
}

/// Nothing listening on the model port is a request error without a status
#[tokio::test]
async fn test_gemini_connection_refused_is_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = gemini_client(format!("http://{addr}"));

    let err = client.complete("plan a trip").await.unwrap_err();
    assert_unreachable(err);
}

/// A model API slower than the configured timeout is a request error without a status
#[tokio::test]
async fn test_gemini_timeout_is_request_error() {
    let app = Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(json!({"candidates": []}))
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let client = gemini_client_with_timeout(format!("http://{addr}"), 1);
    let planner = TripPlanner::new(Arc::new(client));
    let request = TripRequest::new("Paris", 1000.0, 2, ["Food"]).unwrap();

    let err = planner.plan(&request).await.unwrap_err();
    assert_unreachable(err);
}

/// End to end through a real HTTP model call: two days, three activities, two markers
#[tokio::test]
async fn test_plan_through_gemini_and_map() {
    let envelope = json!({"candidates": [{"content": {"parts": [{"text": TWO_DAY_TRIP}]}}]});
    let base_url = spawn_model_server(StatusCode::OK, envelope).await;
    let planner = TripPlanner::new(Arc::new(gemini_client(base_url)));
    let request = TripRequest::new("Paris", 1000.0, 2, ["Food"]).unwrap();

    let itinerary = planner.plan(&request).await.unwrap();
    assert_eq!(itinerary.days.len(), 2);
    assert_eq!(itinerary.activity_count(), 3);

    let map = tripai::MapView::from_itinerary(&itinerary, TileLayer::Satellite);
    assert_eq!(map.markers.len(), 2);
    assert!(map.center.is_some());
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_tripai"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trip planner"));
    assert!(stdout.contains("plan"));
    assert!(stdout.contains("serve"));
}

/// Test the plan subcommand against the canned demo itinerary
#[test]
fn test_cli_plan_in_demo_mode() {
    let output = Command::new(env!("CARGO_BIN_EXE_tripai"))
        .args(["--demo", "plan", "--destination", "Paris", "--days", "2", "-i", "Food"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stdout.contains("Your 2-Day Trip to Paris"));
    assert!(stdout.contains("Day 1"));
    assert!(stdout.contains("Cost Breakdown"));
}

/// Test that `plan --pdf` writes a PDF next to the text output
#[test]
fn test_cli_plan_writes_pdf() {
    let path = std::env::temp_dir().join(format!("tripai-cli-{}.pdf", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_tripai"))
        .args(["--demo", "plan", "--destination", "Kraków", "--days", "1", "--pdf"])
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    let pdf = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(pdf.starts_with(b"%PDF-"));
}

/// Test that invalid input is reported without contacting the model
#[test]
fn test_cli_plan_rejects_zero_days() {
    let output = Command::new(env!("CARGO_BIN_EXE_tripai"))
        .args(["--demo", "plan", "--destination", "Paris", "--days", "0"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("between 1 and"), "stderr: {stderr}");
}
