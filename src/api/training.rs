//! Training Data Routes
//!
//! Label registration and training example submission, listing and
//! deletion for a project.
//!
//! Routes (relative to /api/classes/:class_id/students/:student_id/projects):
//! - GET /:project_id/labels - Per-label training counts
//! - POST /:project_id/labels - Register a label
//! - POST /:project_id/training - Submit a training example
//! - GET /:project_id/training - List training examples (Range paging)
//! - DELETE /:project_id/training/:training_id - Delete one example

use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::middleware::{resolve_project_access, Caller};
use crate::models::{ItemRange, TrainingExample};
use crate::{AppState, Result};

/// Build training data routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:project_id/labels", get(get_labels).post(add_label))
        .route(
            "/:project_id/training",
            post(store_training).get(get_training),
        )
        .route("/:project_id/training/:training_id", delete(delete_training))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to register a label.
#[derive(Debug, Deserialize)]
pub struct AddLabelRequest {
    pub label: String,
}

/// Request to submit a training example. `data` is kept as raw JSON so
/// validation can distinguish missing, empty, and non-numeric payloads.
#[derive(Debug, Deserialize)]
pub struct TrainingSubmission {
    #[serde(default)]
    pub label: String,
    pub data: Option<serde_json::Value>,
}

/// Stored training example response.
#[derive(Debug, Serialize)]
pub struct TrainingResponse {
    pub id: String,
    pub label: String,
    pub audiodata: Vec<f64>,
}

impl From<TrainingExample> for TrainingResponse {
    fn from(example: TrainingExample) -> Self {
        Self {
            id: example.id,
            label: example.label,
            audiodata: example.audio_data,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Per-label counts of stored training examples.
///
/// GET /api/classes/:class_id/students/:student_id/projects/:project_id/labels
#[axum::debug_handler]
async fn get_labels(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id)): Path<(String, String, String)>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<HashMap<String, i64>>> {
    caller.verify_scope(&class_id, &student_id)?;
    let project = resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    let counts = state.store.label_counts(&project.id).await?;
    Ok(Json(counts))
}

/// Register a label against a project.
///
/// POST /api/classes/:class_id/students/:student_id/projects/:project_id/labels
#[axum::debug_handler]
async fn add_label(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id)): Path<(String, String, String)>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<AddLabelRequest>,
) -> Result<Json<Vec<String>>> {
    caller.verify_scope(&class_id, &student_id)?;
    resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    let labels = state
        .store
        .add_label(&student_id, &class_id, &project_id, &request.label)
        .await?;

    Ok(Json(labels))
}

/// Submit a training example.
///
/// POST /api/classes/:class_id/students/:student_id/projects/:project_id/training
#[axum::debug_handler]
async fn store_training(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id)): Path<(String, String, String)>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<TrainingSubmission>,
) -> Result<(StatusCode, Json<TrainingResponse>)> {
    caller.verify_scope(&class_id, &student_id)?;
    resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    let example = state
        .store
        .store_sound_training(&project_id, request.data.as_ref(), &request.label)
        .await?;

    Ok((StatusCode::CREATED, Json(example.into())))
}

/// List training examples.
///
/// GET /api/classes/:class_id/students/:student_id/projects/:project_id/training
///
/// An optional `Range: items=start-end` header selects a slice; the
/// response then carries a matching `Content-Range: items start-end/total`
/// header. Without a range the full listing is returned.
#[axum::debug_handler]
async fn get_training(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id)): Path<(String, String, String)>,
    Extension(caller): Extension<Caller>,
    headers: HeaderMap,
) -> Result<Response> {
    caller.verify_scope(&class_id, &student_id)?;
    resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    let range = match headers.get(header::RANGE).and_then(|v| v.to_str().ok()) {
        Some(value) => Some(ItemRange::parse(value)?),
        None => None,
    };

    let (examples, total) = state.store.get_sound_training(&project_id, range).await?;
    let body: Vec<TrainingResponse> = examples.into_iter().map(Into::into).collect();

    match range {
        Some(range) => Ok((
            StatusCode::OK,
            [(header::CONTENT_RANGE, range.content_range(total))],
            Json(body),
        )
            .into_response()),
        None => Ok(Json(body).into_response()),
    }
}

/// Delete one training example.
///
/// DELETE /api/classes/:class_id/students/:student_id/projects/:project_id/training/:training_id
#[axum::debug_handler]
async fn delete_training(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id, training_id)): Path<(String, String, String, String)>,
    Extension(caller): Extension<Caller>,
) -> Result<StatusCode> {
    caller.verify_scope(&class_id, &student_id)?;
    resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    state
        .store
        .delete_sound_training(&project_id, &training_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
