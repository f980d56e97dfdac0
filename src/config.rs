//! Configuration management for Trainstore.
//!
//! Loads configuration from environment variables. Everything has a
//! sensible default so the server starts with no environment at all.

use std::env;
use std::sync::OnceLock;

use crate::limits::StoreLimits;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub limits: StoreLimits,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
            },
            database: DatabaseConfig {
                path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| "data/trainstore.db".to_string()),
            },
            limits: StoreLimits {
                sound_training_items_per_project: env_limit(
                    "SOUND_TRAINING_ITEMS_PER_PROJECT",
                    StoreLimits::default().sound_training_items_per_project,
                ),
                text_training_items_per_project: env_limit(
                    "TEXT_TRAINING_ITEMS_PER_PROJECT",
                    StoreLimits::default().text_training_items_per_project,
                ),
                number_training_items_per_project: env_limit(
                    "NUMBER_TRAINING_ITEMS_PER_PROJECT",
                    StoreLimits::default().number_training_items_per_project,
                ),
                number_training_items_per_class: env_limit(
                    "NUMBER_TRAINING_ITEMS_PER_CLASS",
                    StoreLimits::default().number_training_items_per_class,
                ),
                image_training_items_per_project: env_limit(
                    "IMAGE_TRAINING_ITEMS_PER_PROJECT",
                    StoreLimits::default().image_training_items_per_project,
                ),
            },
        }
    }
}

fn env_limit(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
