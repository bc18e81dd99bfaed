use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::constants::MAX_FILE_SIZE;
use crate::error::ServiceError;
use crate::models::IncidentSubmissionRequest;
use crate::sanitize::sanitize_error_details;
use crate::service::generate_correlation_id;
use crate::server::state::AppState;

static MISSING_FIELD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"missing field `([^`]+)`").expect("valid field pattern"));

/// CORS preflight for the submit route.
pub async fn submit_incident_options() -> Json<Value> {
    Json(json!({ "message": "CORS preflight successful" }))
}

/// Service health probe.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "netanya-incident-service",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// `POST /incidents/submit` - validate, transform and forward one incident.
pub async fn submit_incident(
    State(state): State<AppState>,
    body: String,
) -> Response {
    let correlation_id = generate_correlation_id();

    // Schema validation with a structured per-field error list
    let request: IncidentSubmissionRequest = match parse_request(&body) {
        Ok(request) => request,
        Err(details) => {
            warn!(correlation_id = %correlation_id, ?details, "Request failed schema validation");
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed",
                Some(Value::Array(details)),
                &correlation_id,
            );
        }
    };

    info!(
        correlation_id = %correlation_id,
        caller = %format!("{} {}", request.user_data.first_name, request.user_data.last_name),
        category = %request.category.name,
        has_file = request.extra_files.is_some(),
        "Incident submission API request"
    );

    // Declared-size ceiling is enforced before the validator even runs
    if let Some(file) = &request.extra_files {
        if file.size > MAX_FILE_SIZE {
            warn!(correlation_id = %correlation_id, size = file.size, "File too large");
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "File size exceeds maximum limit of 10MB",
                None,
                &correlation_id,
            );
        }
    }

    match state.service.submit_incident(&request, &correlation_id).await {
        Ok(result) => {
            let mut response_body = json!({
                "success": result.success,
                "ticket_id": result.ticket_id,
                "correlation_id": result.correlation_id,
                "has_file": result.has_file,
                "message": "Incident submitted successfully",
            });
            if let Some(file_info) = &result.file_info {
                response_body["file_info"] = json!(file_info);
            }
            if state.config.debug_mode {
                if let Some(metadata) = &result.metadata {
                    response_body["metadata"] = metadata.clone();
                }
            }

            info!(correlation_id = %correlation_id, ticket_id = %result.ticket_id, "Incident submission successful");

            with_correlation_header(
                (StatusCode::OK, Json(response_body)).into_response(),
                &correlation_id,
            )
        }
        Err(e) => {
            error!(correlation_id = %correlation_id, error = %e, "Incident submission failed");
            map_service_error(e, &correlation_id, state.config.debug_mode)
        }
    }
}

/// Convert a failed submission into the client-visible error shape.
fn map_service_error(error: ServiceError, correlation_id: &str, debug_mode: bool) -> Response {
    let status = if error.is_validation_like() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    // Client-fixable failures keep their message; everything else is generic
    // unless debug mode is on, and raw detail never leaks in production.
    let (message, details) = if status == StatusCode::UNPROCESSABLE_ENTITY {
        (sanitize_error_details(&error.to_string()), None)
    } else if debug_mode {
        (
            "Incident submission failed".to_string(),
            Some(Value::String(error.to_string())),
        )
    } else {
        ("Incident submission failed".to_string(), None)
    };

    error_response(status, &message, details, correlation_id)
}

fn error_response(
    status: StatusCode,
    message: &str,
    details: Option<Value>,
    correlation_id: &str,
) -> Response {
    let mut body = json!({
        "error": message,
        "correlation_id": correlation_id,
        "timestamp": Utc::now().to_rfc3339(),
    });
    if let Some(details) = details {
        body["details"] = details;
    }
    with_correlation_header((status, Json(body)).into_response(), correlation_id)
}

fn with_correlation_header(mut response: Response, correlation_id: &str) -> Response {
    if let Ok(value) = correlation_id.parse() {
        response.headers_mut().insert("X-Correlation-ID", value);
    }
    response
}

/// Parse the request body, reporting schema problems as `{field, message, type}`
/// entries.
fn parse_request(body: &str) -> Result<IncidentSubmissionRequest, Vec<Value>> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        vec![json!({
            "field": "body",
            "message": e.to_string(),
            "type": "json_invalid",
        })]
    })?;

    serde_json::from_value(value).map_err(|e| {
        let message = e.to_string();
        let field = MISSING_FIELD_PATTERN
            .captures(&message)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "body".to_string());
        let error_type = if message.contains("missing field") {
            "missing"
        } else {
            "type_error"
        };
        vec![json!({
            "field": field,
            "message": message,
            "type": error_type,
        })]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_reports_missing_field() {
        let body = r#"{"user_data": {"first_name": "a", "last_name": "b"}}"#;
        let details = parse_request(body).unwrap_err();
        assert_eq!(details[0]["type"], "missing");
        assert!(details[0]["field"].as_str().unwrap().len() > 0);
    }

    #[test]
    fn parse_request_reports_malformed_json() {
        let details = parse_request("{not json").unwrap_err();
        assert_eq!(details[0]["field"], "body");
        assert_eq!(details[0]["type"], "json_invalid");
    }
}
