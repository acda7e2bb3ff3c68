use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::{
    TripAiError, VERSION,
    export::{PdfExporter, render_text},
    map::{MapView, TileLayer, TileLayerInfo},
    models::{Itinerary, TripRequest},
    planner::TripPlanner,
};

/// Shared, read-only state for the API handlers
#[derive(Clone)]
pub struct AppState {
    pub planner: TripPlanner,
    pub default_tile_layer: TileLayer,
    pub exporter: PdfExporter,
}

/// Body of the generate action, as posted by the form
#[derive(Debug, Deserialize)]
pub struct TripForm {
    pub destination: String,
    pub budget: f64,
    pub duration_days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub custom_interest: Option<String>,
    #[serde(default)]
    pub tile_layer: Option<TileLayer>,
}

impl TripForm {
    fn into_request(self, max_days: u32) -> crate::Result<TripRequest> {
        let interests = self.interests.into_iter().chain(self.custom_interest);
        TripRequest::with_limit(
            &self.destination,
            self.budget,
            self.duration_days,
            interests,
            max_days,
        )
    }
}

#[derive(Serialize)]
pub struct ItineraryResponse {
    pub request: TripRequest,
    pub itinerary: Itinerary,
    pub text: String,
    pub map: MapView,
}

/// Body of the download action: the itinerary the page is showing
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub request: TripRequest,
    pub itinerary: Itinerary,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

/// A body that is not valid JSON for `T` is a validation error
fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, TripAiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| TripAiError::validation(rejection.body_text()))
}

impl IntoResponse for TripAiError {
    fn into_response(self) -> Response {
        let status = match &self {
            TripAiError::Validation { .. } => StatusCode::BAD_REQUEST,
            TripAiError::Request { .. } | TripAiError::Parse { .. } => StatusCode::BAD_GATEWAY,
            TripAiError::Config { .. } | TripAiError::Export { .. } | TripAiError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        let body = ErrorBody {
            error: self.user_message(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tile-layers", get(tile_layers))
        .route("/itinerary", post(generate_itinerary))
        .route("/itinerary/pdf", post(export_pdf))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "model": state.planner.model_name(),
    }))
}

async fn tile_layers() -> Json<Vec<TileLayerInfo>> {
    Json(TileLayer::ALL.into_iter().map(TileLayerInfo::from).collect())
}

async fn generate_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<TripForm>, JsonRejection>,
) -> Result<Json<ItineraryResponse>, TripAiError> {
    let form = read_body(payload)?;
    let tile_layer = form.tile_layer.unwrap_or(state.default_tile_layer);
    let request = form.into_request(state.planner.max_days())?;
    info!(
        "Generating {}-day itinerary for {}",
        request.duration_days, request.destination
    );

    let itinerary = state.planner.plan(&request).await?;
    let map = MapView::from_itinerary(&itinerary, tile_layer);
    let text = render_text(&request, &itinerary);

    Ok(Json(ItineraryResponse {
        request,
        itinerary,
        text,
        map,
    }))
}

async fn export_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TripAiError> {
    let payload = read_body(payload)?;
    payload.request.validate(state.planner.max_days())?;
    if payload.itinerary.days.is_empty() {
        return Err(TripAiError::validation("Itinerary has no days to export"));
    }
    let pdf = state.exporter.render(&payload.request, &payload.itinerary)?;
    info!("Exported itinerary PDF ({} bytes)", pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"itinerary.pdf\"",
            ),
        ],
        pdf,
    ))
}
