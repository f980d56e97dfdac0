//! Training store service.
//!
//! The authoritative CRUD and query surface for projects, labels, and
//! training examples. Validation runs before anything is resolved or
//! written; limit enforcement and the subsequent insert share one
//! transaction so concurrent submissions to the same project cannot
//! slip past a ceiling together.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::db::{self, CreateProject, DbPool, Project};
use crate::error::{Error, Result};
use crate::limits::LimitsProvider;
use crate::models::{ItemRange, ProjectType, TrainingExample};
use crate::validation;

/// Service for managing training data.
#[derive(Clone)]
pub struct TrainingStore {
    db: DbPool,
    limits: Arc<dyn LimitsProvider>,
}

impl TrainingStore {
    /// Create a new training store.
    pub fn new(db: DbPool, limits: Arc<dyn LimitsProvider>) -> Self {
        Self { db, limits }
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Create a new project.
    pub async fn store_project(&self, input: CreateProject) -> Result<Project> {
        let project = db::store_project(&self.db, input).await?;
        info!(project_id = %project.id, class_id = %project.class_id, "Created project");
        Ok(project)
    }

    /// Get a project by id.
    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        db::get_project(&self.db, project_id).await
    }

    /// Delete a project and everything it owns. The project must belong
    /// to the given (class, student) scope.
    pub async fn delete_entire_project(
        &self,
        user_id: &str,
        class_id: &str,
        project_id: &str,
    ) -> Result<()> {
        let project = db::get_project_owned(&self.db, user_id, class_id, project_id).await?;
        db::delete_project(&self.db, &project.id).await?;
        info!(project_id = %project.id, "Deleted project and its training data");
        Ok(())
    }

    /// Delete every project owned by one student in one class.
    pub async fn delete_entire_user(&self, user_id: &str, class_id: &str) -> Result<()> {
        db::delete_projects_for_user(&self.db, user_id, class_id).await?;
        info!(user_id, class_id, "Deleted all projects for user");
        Ok(())
    }

    /// Delete every project in a class.
    pub async fn delete_class_resources(&self, class_id: &str) -> Result<()> {
        db::delete_projects_for_class(&self.db, class_id).await?;
        info!(class_id, "Deleted all projects for class");
        Ok(())
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// Register a label against a project (idempotent). Returns the
    /// resulting label list.
    pub async fn add_label(
        &self,
        user_id: &str,
        class_id: &str,
        project_id: &str,
        label: &str,
    ) -> Result<Vec<String>> {
        db::add_label_to_project(&self.db, user_id, class_id, project_id, label).await
    }

    /// Number of stored training examples per registered label, zeroes
    /// included. Empty map for a project with no registered labels.
    pub async fn label_counts(&self, project_id: &str) -> Result<HashMap<String, i64>> {
        let project = db::get_project(&self.db, project_id).await?;
        db::label_counts(&self.db, &project.id).await
    }

    // ========================================================================
    // Training examples
    // ========================================================================

    /// Validate and store one training example.
    ///
    /// Order matters: validation failures propagate before the project is
    /// even resolved, and a submission over the ceiling persists nothing.
    pub async fn store_sound_training(
        &self,
        project_id: &str,
        data: Option<&Value>,
        label: &str,
    ) -> Result<TrainingExample> {
        let samples = validation::validate_audio(data)?;

        let project = db::get_project(&self.db, project_id).await?;
        let limits = self.limits.store_limits();

        let ceiling = match project.type_tag() {
            Some(ProjectType::Sounds) => limits.sound_training_items_per_project,
            Some(ProjectType::Text) => limits.text_training_items_per_project,
            Some(ProjectType::Numbers) => limits.number_training_items_per_project,
            Some(ProjectType::Images) => limits.image_training_items_per_project,
            None => {
                return Err(Error::Internal(format!(
                    "Unrecognized project type: {}",
                    project.project_type
                )))
            }
        };

        // Count and insert share a transaction: SQLite's single writer
        // makes the sequence atomic against concurrent submissions to
        // the same project.
        let mut tx = self.db.begin().await?;

        let count = db::count_training_on(&mut *tx, &project.id).await?;
        if count >= ceiling as i64 {
            debug!(project_id = %project.id, count, ceiling, "Training data limit reached");
            return Err(Error::LimitExceeded);
        }

        if project.type_tag() == Some(ProjectType::Numbers) {
            let class_count = db::count_training_for_class_on(&mut *tx, &project.class_id).await?;
            if class_count >= limits.number_training_items_per_class as i64 {
                debug!(class_id = %project.class_id, class_count, "Class-wide training data limit reached");
                return Err(Error::LimitExceeded);
            }
        }

        let example = db::insert_training(&mut *tx, &project.id, label, &samples).await?;
        tx.commit().await?;

        debug!(project_id = %project.id, training_id = %example.id, "Stored training example");
        Ok(example)
    }

    /// List training examples in stable insertion order, with the total
    /// count for pagination metadata.
    pub async fn get_sound_training(
        &self,
        project_id: &str,
        range: Option<ItemRange>,
    ) -> Result<(Vec<TrainingExample>, i64)> {
        let project = db::get_project(&self.db, project_id).await?;
        db::get_training(&self.db, &project.id, range).await
    }

    /// Current number of stored examples for a project. Zero for a
    /// project that does not exist (or no longer exists).
    pub async fn count_training(&self, project_id: &str) -> Result<i64> {
        db::count_training(&self.db, project_id).await
    }

    /// Delete one training example, scoped to the given project.
    pub async fn delete_sound_training(&self, project_id: &str, training_id: &str) -> Result<()> {
        db::delete_training(&self.db, project_id, training_id).await?;
        debug!(project_id, training_id, "Deleted training example");
        Ok(())
    }
}
