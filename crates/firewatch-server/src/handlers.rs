//! HTTP request handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use tracing::{error, instrument, warn};

use firewatch_ai::HistoryEntry;
use firewatch_firms::{map::render_map, DEFAULT_DAY_RANGE, DEFAULT_SOURCE};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, serde::Deserialize)]
pub struct LocationsQuery {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_day_range")]
    pub day_range: u32,
}

fn default_country() -> String {
    "india".to_string()
}

fn default_state() -> String {
    "up".to_string()
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_day_range() -> u32 {
    DEFAULT_DAY_RANGE
}

/// GET /
pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "hello World" }))
}

/// GET /health
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "success" })),
    )
}

/// POST /chat — run the decision loop against the caller's thread.
#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if body.user_id.is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".to_string()));
    }

    let response = state
        .agent()
        .chat(&body.user_id, body.message)
        .await
        .map_err(|e| {
            error!(error = %e, "chat run failed");
            ApiError::Internal(e.to_string())
        })?;

    Ok(Json(ChatResponse { response }))
}

/// GET /chat/history/{user_id} — the filtered conversation view. Never
/// surfaces an error; an unknown thread is just an empty history.
#[instrument(skip(state))]
pub async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<HistoryResponse> {
    let history = state.store().visible_history(&user_id).await;
    Json(HistoryResponse { history })
}

/// POST /get_locations — render the region's detections as map HTML.
#[instrument(skip(state))]
pub async fn get_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let detections = state
        .firms()
        .fetch_area(&query.country, &query.state, &query.source, query.day_range)
        .await
        .map_err(|e| {
            error!(error = %e, "fire data fetch failed");
            ApiError::Internal(e.to_string())
        })?;

    let html = render_map(&detections);
    Ok(Json(serde_json::json!({ "html": html })))
}

/// POST /draw_boxes_fire — forward an uploaded photo to the detector and
/// return the annotated image, base64 encoded.
#[instrument(skip(state, multipart))]
pub async fn draw_boxes_fire(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(detector) = state.detector() else {
        return Err(ApiError::Unavailable(
            "detector service not configured".to_string(),
        ));
    };

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload.jpg")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let Some((filename, data)) = upload else {
        warn!("image upload without a 'file' field");
        return Err(ApiError::BadRequest("uploading a file is mandatory".to_string()));
    };

    let annotated = detector.draw_boxes(data, &filename).await.map_err(|e| {
        error!(error = %e, "detector inference failed");
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(serde_json::json!({ "data": B64.encode(annotated) })))
}
