use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FieldValue, IntakeStep};
use super::service::{IntakeServiceError, IntakeWizardService};
use super::session::{FieldView, WizardError};
use super::store::{SessionId, SessionStore, StoreError, SubmissionGateway};

/// Router builder exposing the wizard over HTTP for the rendering layer.
pub fn intake_router<S, G>(service: Arc<IntakeWizardService<S, G>>) -> Router
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(start_handler::<S, G>))
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(fields_handler::<S, G>).delete(abandon_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/fields",
            put(update_field_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/next",
            post(next_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/back",
            post(back_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/jump",
            post(jump_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/summary",
            get(summary_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/submit",
            post(submit_handler::<S, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct FieldUpdateRequest {
    key: String,
    value: FieldValue,
}

#[derive(Debug, Deserialize)]
struct JumpRequest {
    step: u8,
}

#[derive(Debug, Deserialize)]
struct FieldsQuery {
    step: Option<u8>,
}

fn step_payload(step: IntakeStep, fields: Vec<FieldView>) -> serde_json::Value {
    json!({
        "step": step,
        "position": step.position(),
        "step_label": step.label(),
        "fields": fields,
    })
}

async fn start_handler<S, G>(State(service): State<Arc<IntakeWizardService<S, G>>>) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    match service.start() {
        Ok((id, fields)) => {
            let mut payload = step_payload(IntakeStep::BasicDetails, fields);
            payload["session_id"] = json!(id.0);
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn fields_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
    Query(query): Query<FieldsQuery>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    let step = match query.step {
        Some(position) => match IntakeStep::from_position(position) {
            Some(step) => Some(step),
            None => {
                let payload = json!({ "error": format!("no step at position {position}") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
        None => None,
    };
    match service.fields(&id, step) {
        Ok((step, fields)) => {
            (StatusCode::OK, axum::Json(step_payload(step, fields))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn update_field_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<FieldUpdateRequest>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match service.update_field(&id, &request.key, request.value) {
        Ok(fields) => (StatusCode::OK, axum::Json(json!({ "fields": fields }))).into_response(),
        Err(error) => error_response(error),
    }
}

async fn next_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match service.advance(&id) {
        Ok((step, fields)) => {
            (StatusCode::OK, axum::Json(step_payload(step, fields))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn back_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match service.go_back(&id) {
        Ok((step, fields)) => {
            (StatusCode::OK, axum::Json(step_payload(step, fields))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn jump_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<JumpRequest>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    let Some(step) = IntakeStep::from_position(request.step) else {
        let payload = json!({ "error": format!("no step at position {}", request.step) });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.jump(&id, step) {
        Ok((step, fields)) => {
            (StatusCode::OK, axum::Json(step_payload(step, fields))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn summary_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match service.summary(&id) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn submit_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match service.submit(&id) {
        Ok(snapshot) => {
            // The raw snapshot goes to the gateway, not back over the wire;
            // the caller gets a receipt.
            let payload = json!({
                "session_id": id.0,
                "submitted_at": snapshot.submitted_at,
                "field_count": snapshot.values().len(),
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn abandon_handler<S, G>(
    State(service): State<Arc<IntakeWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match service.abandon(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: IntakeServiceError) -> Response {
    match error {
        IntakeServiceError::Wizard(WizardError::StepIncomplete { step, validation }) => {
            let payload = json!({
                "error": format!("step '{}' has incomplete or invalid fields", step.label()),
                "step": step,
                "failures": validation.failures(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        IntakeServiceError::Wizard(WizardError::SubmissionBlocked { validation }) => {
            let payload = json!({
                "error": "the form still has invalid fields",
                "invalid_steps": validation.invalid_steps(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        IntakeServiceError::Wizard(error @ WizardError::UnknownField(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        IntakeServiceError::Wizard(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        IntakeServiceError::Store(StoreError::NotFound) => {
            let payload = json!({ "error": "session not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        IntakeServiceError::Store(StoreError::Conflict) => {
            let payload = json!({ "error": "session already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
