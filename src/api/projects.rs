//! Project Routes
//!
//! CRUD operations for student projects.
//!
//! Routes (relative to /api/classes/:class_id/students/:student_id/projects):
//! - POST / - Create a new project
//! - GET /:project_id - Get project details
//! - DELETE /:project_id - Delete project and all its training data

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::Project;
use crate::middleware::{resolve_project_access, Caller};
use crate::models::{ProjectField, ProjectType};
use crate::{AppState, Error, Result};

/// Build project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project))
        .route("/:project_id", get(get_project).delete(delete_project))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a new project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Kind of training data: "sounds", "text", "numbers" or "images"
    #[serde(rename = "type")]
    pub project_type: String,
    /// Human-readable name
    pub name: String,
    /// Language code for the project content
    #[serde(default)]
    pub language: String,
    /// Field definitions (numbers projects)
    #[serde(default)]
    pub fields: Vec<ProjectField>,
    /// Whether training data is shared across the class
    #[serde(default, rename = "isCrowdSourced")]
    pub is_crowd_sourced: bool,
}

/// Project response.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub userid: String,
    pub classid: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub name: String,
    pub language: String,
    pub fields: Vec<ProjectField>,
    #[serde(rename = "isCrowdSourced")]
    pub is_crowd_sourced: bool,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            fields: project.field_defs(),
            is_crowd_sourced: project.is_crowd_sourced(),
            id: project.id,
            userid: project.user_id,
            classid: project.class_id,
            project_type: project.project_type,
            name: project.name,
            language: project.language,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new project.
///
/// POST /api/classes/:class_id/students/:student_id/projects
#[axum::debug_handler]
async fn create_project(
    State(state): State<AppState>,
    Path((class_id, student_id)): Path<(String, String)>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    caller.verify_scope(&class_id, &student_id)?;

    let project_type = ProjectType::from_str(&request.project_type).ok_or_else(|| {
        Error::InvalidInput(format!("Unrecognized project type: {}", request.project_type))
    })?;

    let project = state
        .store
        .store_project(crate::db::CreateProject {
            user_id: student_id,
            class_id,
            project_type,
            name: request.name,
            language: request.language,
            fields: request.fields,
            crowd_sourced: request.is_crowd_sourced,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Get a project by ID.
///
/// GET /api/classes/:class_id/students/:student_id/projects/:project_id
#[axum::debug_handler]
async fn get_project(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id)): Path<(String, String, String)>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ProjectResponse>> {
    caller.verify_scope(&class_id, &student_id)?;

    let project = resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    Ok(Json(project.into()))
}

/// Delete a project.
///
/// DELETE /api/classes/:class_id/students/:student_id/projects/:project_id
///
/// Cascades to every label and training example the project owns.
#[axum::debug_handler]
async fn delete_project(
    State(state): State<AppState>,
    Path((class_id, student_id, project_id)): Path<(String, String, String)>,
    Extension(caller): Extension<Caller>,
) -> Result<StatusCode> {
    caller.verify_scope(&class_id, &student_id)?;
    resolve_project_access(&state, &class_id, &student_id, &project_id).await?;

    state
        .store
        .delete_entire_project(&student_id, &class_id, &project_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
