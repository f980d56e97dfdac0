//! Project and label database queries.
//!
//! Projects are the top-level organizational unit: every label and
//! training example belongs to exactly one project, scoped to a
//! (class, student) owner pair.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};
use crate::models::{new_id, ProjectField, ProjectType};

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Project record from the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub class_id: String,
    pub project_type: String,
    pub name: String,
    pub language: String,
    /// Field definitions for structured (numbers) projects, JSON-encoded.
    pub fields: String,
    pub crowd_sourced: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    /// Parsed type tag.
    pub fn type_tag(&self) -> Option<ProjectType> {
        ProjectType::from_str(&self.project_type)
    }

    /// Decoded field definitions.
    pub fn field_defs(&self) -> Vec<ProjectField> {
        serde_json::from_str(&self.fields).unwrap_or_default()
    }

    pub fn is_crowd_sourced(&self) -> bool {
        self.crowd_sourced != 0
    }
}

/// Input for creating a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: String,
    pub class_id: String,
    pub project_type: ProjectType,
    pub name: String,
    pub language: String,
    pub fields: Vec<ProjectField>,
    pub crowd_sourced: bool,
}

// ============================================================================
// Queries
// ============================================================================

/// Create a new project with a fresh id.
pub async fn store_project(pool: &DbPool, input: CreateProject) -> Result<Project> {
    let fields = serde_json::to_string(&input.fields)?;

    sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (id, user_id, class_id, project_type, name, language, fields, crowd_sourced)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new_id())
    .bind(&input.user_id)
    .bind(&input.class_id)
    .bind(input.project_type.as_str())
    .bind(&input.name)
    .bind(&input.language)
    .bind(&fields)
    .bind(if input.crowd_sourced { 1 } else { 0 })
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a project by ID.
pub async fn get_project(pool: &DbPool, id: &str) -> Result<Project> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound)
}

/// Get a project by ID, restricted to its owning (class, student) scope.
/// A project owned by someone else is reported as absent, not forbidden:
/// callers must not learn about resources outside their scope.
pub async fn get_project_owned(
    pool: &DbPool,
    user_id: &str,
    class_id: &str,
    id: &str,
) -> Result<Project> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE id = ? AND user_id = ? AND class_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .bind(class_id)
    .fetch_optional(pool)
    .await?
    .ok_or(Error::NotFound)
}

/// List all projects owned within a (class, student) scope.
pub async fn list_projects_for_user(
    pool: &DbPool,
    user_id: &str,
    class_id: &str,
) -> Result<Vec<Project>> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE user_id = ? AND class_id = ? ORDER BY name ASC",
    )
    .bind(user_id)
    .bind(class_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

// ============================================================================
// Labels
// ============================================================================

/// Register a label against a project. Idempotent: adding a label that
/// already exists leaves the list unchanged. Returns the full label list.
pub async fn add_label_to_project(
    pool: &DbPool,
    user_id: &str,
    class_id: &str,
    project_id: &str,
    label: &str,
) -> Result<Vec<String>> {
    let project = get_project_owned(pool, user_id, class_id, project_id).await?;

    sqlx::query("INSERT OR IGNORE INTO labels (project_id, label) VALUES (?, ?)")
        .bind(&project.id)
        .bind(label)
        .execute(pool)
        .await?;

    list_labels(pool, &project.id).await
}

/// All labels registered against a project, in registration order.
pub async fn list_labels(pool: &DbPool, project_id: &str) -> Result<Vec<String>> {
    let labels: Vec<(String,)> =
        sqlx::query_as("SELECT label FROM labels WHERE project_id = ? ORDER BY rowid ASC")
            .bind(project_id)
            .fetch_all(pool)
            .await?;

    Ok(labels.into_iter().map(|(label,)| label).collect())
}

// ============================================================================
// Deletion cascades
// ============================================================================

/// Delete a project and everything it owns, in a single transaction.
pub async fn delete_project(pool: &DbPool, id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM training WHERE project_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM labels WHERE project_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound);
    }

    tx.commit().await?;
    Ok(())
}

/// Delete every project (and cascade) owned by one student in one class.
pub async fn delete_projects_for_user(pool: &DbPool, user_id: &str, class_id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM training WHERE project_id IN
            (SELECT id FROM projects WHERE user_id = ? AND class_id = ?)
        "#,
    )
    .bind(user_id)
    .bind(class_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM labels WHERE project_id IN
            (SELECT id FROM projects WHERE user_id = ? AND class_id = ?)
        "#,
    )
    .bind(user_id)
    .bind(class_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM projects WHERE user_id = ? AND class_id = ?")
        .bind(user_id)
        .bind(class_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Delete every project (and cascade) in a class.
pub async fn delete_projects_for_class(pool: &DbPool, class_id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM training WHERE project_id IN (SELECT id FROM projects WHERE class_id = ?)",
    )
    .bind(class_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM labels WHERE project_id IN (SELECT id FROM projects WHERE class_id = ?)",
    )
    .bind(class_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM projects WHERE class_id = ?")
        .bind(class_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
