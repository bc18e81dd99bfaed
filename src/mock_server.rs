//! Standalone mock of the SharePoint incidents API for local testing.
//!
//! Response-shape-compatible with the real endpoint so the submission client
//! can be pointed at it unchanged, plus debug endpoints for inspecting what
//! was received.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::clients::mock::MockTicketGenerator;
use crate::models::ApiResponse;

/// Explicitly-owned storage for received incidents and request log entries.
/// Created at process start, reset only through `/admin/reset`.
#[derive(Default)]
pub struct MockStore {
    incidents: Mutex<HashMap<String, Value>>,
    request_log: Mutex<Vec<Value>>,
}

#[derive(Clone)]
pub struct MockState {
    store: Arc<MockStore>,
    tickets: Arc<MockTicketGenerator>,
}

impl MockState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MockStore::default()),
            tickets: Arc::new(MockTicketGenerator::new()),
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn mock_router(state: MockState) -> Router {
    Router::new()
        .route("/api/incidents", post(submit_incident))
        .route("/api/incidents/:ticket_id", get(get_incident))
        .route("/admin/incidents", get(list_incidents))
        .route("/admin/requests", get(list_requests))
        .route("/admin/reset", post(reset_data))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(crate::constants::MAX_REQUEST_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Mock SharePoint Service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Accepts the same multipart body the real endpoint expects: a `json` form
/// field plus an optional `attachment` file part.
async fn submit_incident(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    let mut json_payload: Option<Value> = None;
    let mut attachment: Option<(String, usize)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "json" => match field.text().await {
                Ok(text) => match serde_json::from_str(&text) {
                    Ok(value) => json_payload = Some(value),
                    Err(e) => {
                        warn!("Invalid JSON field in mock submission: {e}");
                        return upstream_error(
                            StatusCode::BAD_REQUEST,
                            400,
                            format!("Invalid JSON format: {e}"),
                        );
                    }
                },
                Err(e) => {
                    return upstream_error(
                        StatusCode::BAD_REQUEST,
                        400,
                        format!("Unreadable json field: {e}"),
                    );
                }
            },
            "attachment" => {
                let filename = field.file_name().unwrap_or("attachment").to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        info!(filename = %filename, size = bytes.len(), "Received file attachment");
                        attachment = Some((filename, bytes.len()));
                    }
                    Err(e) => {
                        return upstream_error(
                            StatusCode::BAD_REQUEST,
                            400,
                            format!("Unreadable attachment: {e}"),
                        );
                    }
                }
            }
            other => {
                warn!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    let Some(payload) = json_payload else {
        return upstream_error(StatusCode::BAD_REQUEST, 400, "Missing incident data");
    };

    // Same required-field check the upstream applies
    let required_fields = ["eventCallDesc", "callerFirstName", "callerLastName"];
    let missing: Vec<&str> = required_fields
        .iter()
        .filter(|field| {
            payload
                .get(**field)
                .and_then(Value::as_str)
                .map(str::is_empty)
                .unwrap_or(true)
        })
        .copied()
        .collect();
    if !missing.is_empty() {
        return upstream_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            422,
            format!("Missing required fields: {}", missing.join(", ")),
        );
    }

    let ticket_id = state.tickets.generate_ticket_id();

    let incident = json!({
        "ticket_id": ticket_id,
        "payload": payload,
        "has_file": attachment.is_some(),
        "timestamp": Utc::now().to_rfc3339(),
        "status": "submitted",
    });
    state
        .store
        .incidents
        .lock()
        .expect("incident store lock")
        .insert(ticket_id.clone(), incident);

    state
        .store
        .request_log
        .lock()
        .expect("request log lock")
        .push(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "ticket_id": ticket_id,
            "payload_summary": {
                "caller": format!(
                    "{} {}",
                    payload["callerFirstName"].as_str().unwrap_or(""),
                    payload["callerLastName"].as_str().unwrap_or("")
                ),
                "description": payload["eventCallDesc"]
                    .as_str()
                    .unwrap_or("")
                    .chars()
                    .take(50)
                    .collect::<String>(),
                "has_file": attachment.is_some(),
            },
        }));

    info!(%ticket_id, "Mock incident created successfully");
    Json(ApiResponse::success(ticket_id)).into_response()
}

async fn get_incident(
    State(state): State<MockState>,
    Path(ticket_id): Path<String>,
) -> Response {
    let incidents = state.store.incidents.lock().expect("incident store lock");
    match incidents.get(&ticket_id) {
        Some(incident) => Json(incident.clone()).into_response(),
        None => upstream_error(StatusCode::NOT_FOUND, 404, "Incident not found"),
    }
}

async fn list_incidents(State(state): State<MockState>) -> Json<Value> {
    let incidents = state.store.incidents.lock().expect("incident store lock");
    let values: Vec<Value> = incidents.values().cloned().collect();
    Json(json!({
        "total_incidents": values.len(),
        "incidents": values,
    }))
}

async fn list_requests(State(state): State<MockState>) -> Json<Value> {
    let log = state.store.request_log.lock().expect("request log lock");
    let recent: Vec<Value> = log.iter().rev().take(10).rev().cloned().collect();
    Json(json!({
        "total_requests": log.len(),
        "requests": recent,
    }))
}

async fn reset_data(State(state): State<MockState>) -> Json<Value> {
    state
        .store
        .incidents
        .lock()
        .expect("incident store lock")
        .clear();
    state
        .store
        .request_log
        .lock()
        .expect("request log lock")
        .clear();
    info!("Mock data reset");
    Json(json!({ "message": "Mock data reset successfully" }))
}

fn upstream_error(status: StatusCode, code: i64, description: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(code, description))).into_response()
}
