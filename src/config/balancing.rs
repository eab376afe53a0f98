// ABOUTME: Portion balancing configuration
// ABOUTME: Correction thresholds, class multipliers and supplement dosing limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! Portion Balancing Configuration
//!
//! The carb/fat correction thresholds and multipliers here are empirically
//! calibrated values, not derived constants; they are configuration so they
//! can be tuned against real generation output.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Per-class fat-correction multipliers with class-specific floors (grams).
///
/// A uniform cut would under-correct the few high-fat-density ingredients
/// responsible for an excess, so oils are cut hardest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatClassCuts {
    /// Oils and pure fats: keep 30%, floor 5 g
    pub oil_multiplier: f64,
    /// Minimum remaining oil amount
    pub oil_floor: f64,
    /// Nuts and seeds: keep 70%, floor 10 g
    pub nuts_multiplier: f64,
    /// Minimum remaining nuts/seeds amount
    pub nuts_floor: f64,
    /// Cheese, avocado and similar: keep 80%, floor 10 g
    pub dairy_fat_multiplier: f64,
    /// Minimum remaining cheese/avocado amount
    pub dairy_fat_floor: f64,
}

impl Default for FatClassCuts {
    fn default() -> Self {
        Self {
            oil_multiplier: 0.3,
            oil_floor: 5.0,
            nuts_multiplier: 0.7,
            nuts_floor: 10.0,
            dairy_fat_multiplier: 0.8,
            dairy_fat_floor: 10.0,
        }
    }
}

/// Portion balancing thresholds and supplement dosing limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancingConfig {
    /// Carb correction triggers when day carbs exceed this multiple of target
    pub carb_excess_ratio: f64,
    /// Safety factor applied to the carb scale so one pass lands under target
    pub carb_scale_safety: f64,
    /// Minimum viable ingredient amount after scaling (grams/units)
    pub min_ingredient_amount: f64,
    /// Fat correction triggers when day fat exceeds this multiple of target
    pub fat_excess_ratio: f64,
    /// Class-specific fat cut multipliers
    pub fat_cuts: FatClassCuts,
    /// Protein gap (g) below which no protein supplement is added
    pub protein_gap_threshold_g: f64,
    /// Maximum protein (g) a supplement entry may contribute
    pub protein_dose_cap_g: f64,
    /// Carb gap (g) above which a gainer is considered
    pub carb_gap_threshold_g: f64,
    /// Calorie gap (kcal) above which a gainer is considered
    pub calorie_gap_threshold_kcal: f64,
    /// Maximum gainer dose in grams of powder
    pub gainer_dose_cap_g: f64,
    /// Supplement removed entirely when the macro exceeds this multiple of
    /// target after injection
    pub overshoot_ratio: f64,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            carb_excess_ratio: 1.2,
            carb_scale_safety: 0.9,
            min_ingredient_amount: 10.0,
            fat_excess_ratio: 1.3,
            fat_cuts: FatClassCuts::default(),
            protein_gap_threshold_g: 15.0,
            protein_dose_cap_g: 30.0,
            carb_gap_threshold_g: 30.0,
            calorie_gap_threshold_kcal: 200.0,
            gainer_dose_cap_g: 120.0,
            overshoot_ratio: 1.1,
        }
    }
}

impl BalancingConfig {
    /// Validate threshold sanity
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a ratio is not above 1.0 or a multiplier
    /// falls outside (0, 1].
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, ratio) in [
            ("carb_excess_ratio", self.carb_excess_ratio),
            ("fat_excess_ratio", self.fat_excess_ratio),
            ("overshoot_ratio", self.overshoot_ratio),
        ] {
            if ratio <= 1.0 {
                return Err(AppError::config(format!(
                    "{name} must be greater than 1.0, got {ratio}"
                )));
            }
        }

        for (name, mult) in [
            ("carb_scale_safety", self.carb_scale_safety),
            ("oil_multiplier", self.fat_cuts.oil_multiplier),
            ("nuts_multiplier", self.fat_cuts.nuts_multiplier),
            ("dairy_fat_multiplier", self.fat_cuts.dairy_fat_multiplier),
        ] {
            if mult <= 0.0 || mult > 1.0 {
                return Err(AppError::config(format!(
                    "{name} must be in (0, 1], got {mult}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        BalancingConfig::default().validate().unwrap();
    }

    #[test]
    fn excess_ratio_at_one_rejected() {
        let config = BalancingConfig {
            carb_excess_ratio: 1.0,
            ..BalancingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
