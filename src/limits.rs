//! Resource ceilings for stored training data.
//!
//! The store never caches limits: every enforcement sequence asks the
//! provider again, so a different provider (or changed configuration)
//! takes effect without a restart.

use serde::{Deserialize, Serialize};

/// Maximum counts of stored training items, per resource type and scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLimits {
    pub sound_training_items_per_project: u32,
    pub text_training_items_per_project: u32,
    pub number_training_items_per_project: u32,
    /// Class-wide ceiling applied to number projects in addition to the
    /// per-project one.
    pub number_training_items_per_class: u32,
    pub image_training_items_per_project: u32,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            sound_training_items_per_project: 100,
            text_training_items_per_project: 500,
            number_training_items_per_project: 1000,
            number_training_items_per_class: 3000,
            image_training_items_per_project: 100,
        }
    }
}

/// Source of the active store limits.
pub trait LimitsProvider: Send + Sync {
    fn store_limits(&self) -> StoreLimits;
}

/// Production provider: reads the env-derived configuration on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLimits;

impl LimitsProvider for ConfigLimits {
    fn store_limits(&self) -> StoreLimits {
        crate::config::config().limits
    }
}

/// Fixed limits, for tests and local experiments.
#[derive(Debug, Clone, Copy)]
pub struct FixedLimits(pub StoreLimits);

impl LimitsProvider for FixedLimits {
    fn store_limits(&self) -> StoreLimits {
        self.0
    }
}
