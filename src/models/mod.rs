//! Data models for Trainstore.
//!
//! Domain types shared between the db layer, the store service, and
//! the API handlers.

mod project;
mod range;
mod training;

pub use project::*;
pub use range::*;
pub use training::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
