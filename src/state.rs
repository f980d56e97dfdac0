//! Application state for Trainstore.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::limits::{ConfigLimits, LimitsProvider};
use crate::middleware::{Authenticator, GatewayAuthenticator};
use crate::services::TrainingStore;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Training data store service.
    pub store: TrainingStore,
    /// Caller identity resolution strategy.
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    /// Create the production application state: pool from the configured
    /// database path, config-backed limits, gateway-asserted identity.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        let db = crate::db::init_pool(&config.database.path).await?;
        crate::db::initialize_schema(&db).await?;

        Ok(Self::with_parts(
            db,
            Arc::new(ConfigLimits),
            Arc::new(GatewayAuthenticator),
        ))
    }

    /// Assemble state from explicit collaborators. Tests use this to
    /// substitute stub limits and authenticators.
    pub fn with_parts(
        db: DbPool,
        limits: Arc<dyn LimitsProvider>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        let store = TrainingStore::new(db.clone(), limits);
        Self { db, store, auth }
    }
}
