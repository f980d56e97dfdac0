//! Training example domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored training example: a labeled audio feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub id: String,
    pub project_id: String,
    pub label: String,
    pub audio_data: Vec<f64>,
    pub created_at: DateTime<Utc>,
}
