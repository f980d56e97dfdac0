//! Trainstore - classroom training data backend
//!
//! A multi-tenant storage service for machine-learning training examples
//! submitted by students within classroom projects.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod limits;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod validation;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
