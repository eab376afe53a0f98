// ABOUTME: Configuration layer for the plan generation engine
// ABOUTME: Bundles nutrition, balancing and generation settings with validated defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Engine Configuration
//!
//! All tunable constants live here rather than at call sites: nutrition
//! formula coefficients, portion-balancing thresholds and generation retry
//! settings. Defaults reproduce the calibrated production behavior; every
//! struct is serializable so deployments can tune without recompiling.

mod balancing;
mod generation;
mod nutrition;

pub use balancing::{BalancingConfig, FatClassCuts};
pub use generation::GenerationConfig;
pub use nutrition::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, MealSplitConfig, NutritionConfig,
    ProteinFactorsConfig,
};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Nutrition target calculation settings
    pub nutrition: NutritionConfig,
    /// Portion balancing thresholds and multipliers
    pub balancing: BalancingConfig,
    /// Generation retry, temperature and timeout settings
    pub generation: GenerationConfig,
}

impl PlanConfig {
    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first invalid value.
    pub fn validate(&self) -> Result<(), AppError> {
        self.nutrition.validate()?;
        self.balancing.validate()?;
        self.generation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PlanConfig::default().validate().unwrap();
    }
}
