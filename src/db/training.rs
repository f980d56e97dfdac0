//! Training example database queries.
//!
//! Rows keep their insertion order (rowid) so listings paginate stably.
//! The count-then-insert sequence used for limit enforcement runs on a
//! single connection inside a transaction owned by the store service,
//! which is why the write-path helpers take `&mut SqliteConnection`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::FromRow;

use crate::error::{Error, Result};
use crate::models::{new_id, now, ItemRange, TrainingExample};

use super::DbPool;

/// Database row for training examples
#[derive(Debug, FromRow)]
struct TrainingRow {
    id: String,
    project_id: String,
    label: String,
    audio_data: String,
    created_at: String,
}

impl From<TrainingRow> for TrainingExample {
    fn from(row: TrainingRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            label: row.label,
            audio_data: serde_json::from_str(&row.audio_data).unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }
    }
}

/// Insert a new training example. Runs on the caller's connection so it
/// can share a transaction with the preceding limit check.
pub async fn insert_training(
    conn: &mut SqliteConnection,
    project_id: &str,
    label: &str,
    audio_data: &[f64],
) -> Result<TrainingExample> {
    let example = TrainingExample {
        id: new_id(),
        project_id: project_id.to_string(),
        label: label.to_string(),
        audio_data: audio_data.to_vec(),
        created_at: now(),
    };

    sqlx::query(
        r#"
        INSERT INTO training (id, project_id, label, audio_data, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&example.id)
    .bind(&example.project_id)
    .bind(&example.label)
    .bind(serde_json::to_string(&example.audio_data)?)
    .bind(example.created_at.to_rfc3339())
    .execute(conn)
    .await?;

    Ok(example)
}

/// Count training examples stored for a project, on the caller's connection.
pub async fn count_training_on(conn: &mut SqliteConnection, project_id: &str) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM training WHERE project_id = ?")
        .bind(project_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Count training examples stored for a project.
pub async fn count_training(pool: &DbPool, project_id: &str) -> Result<i64> {
    let mut conn = pool.acquire().await?;
    count_training_on(&mut *conn, project_id).await
}

/// Count training examples stored across every project in a class, on the
/// caller's connection. Used for class-wide ceilings.
pub async fn count_training_for_class_on(
    conn: &mut SqliteConnection,
    class_id: &str,
) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM training
        WHERE project_id IN (SELECT id FROM projects WHERE class_id = ?)
        "#,
    )
    .bind(class_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// List training examples for a project in stable insertion order,
/// optionally restricted to an item range. Returns the slice and the
/// total number of stored examples.
pub async fn get_training(
    pool: &DbPool,
    project_id: &str,
    range: Option<ItemRange>,
) -> Result<(Vec<TrainingExample>, i64)> {
    let total = count_training(pool, project_id).await?;

    let rows: Vec<TrainingRow> = match range {
        Some(range) => {
            sqlx::query_as(
                r#"
                SELECT id, project_id, label, audio_data, created_at
                FROM training
                WHERE project_id = ?
                ORDER BY rowid ASC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(project_id)
            .bind(range.count() as i64)
            .bind(range.start as i64)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT id, project_id, label, audio_data, created_at
                FROM training
                WHERE project_id = ?
                ORDER BY rowid ASC
                "#,
            )
            .bind(project_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

/// Delete one training example, scoped to its project. A training id that
/// exists under a different project is not deletable through the wrong
/// project id.
pub async fn delete_training(pool: &DbPool, project_id: &str, training_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM training WHERE id = ? AND project_id = ?")
        .bind(training_id)
        .bind(project_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Number of stored training examples per registered label.
///
/// Every label registered against the project is reported, zero included.
/// Examples whose label text was never registered are not surfaced here
/// (they still count toward totals and appear in listings).
pub async fn label_counts(pool: &DbPool, project_id: &str) -> Result<HashMap<String, i64>> {
    let labels = super::list_labels(pool, project_id).await?;

    let counted: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT label, COUNT(*) FROM training
        WHERE project_id = ?
        GROUP BY label
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    let counted: HashMap<String, i64> = counted.into_iter().collect();

    Ok(labels
        .into_iter()
        .map(|label| {
            let count = counted.get(&label).copied().unwrap_or(0);
            (label, count)
        })
        .collect())
}
