// ABOUTME: Daily nutrition targets derived from a profile snapshot
// ABOUTME: Immutable once computed; all-zero targets signal natural-values mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use serde::{Deserialize, Serialize};

/// Daily calorie and macronutrient targets.
///
/// Derived from a profile snapshot and immutable afterwards; recomputed when
/// biometrics or goal change. Calories are rounded to a whole number and
/// macros to one decimal, exactly once at the computation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    /// Daily calorie target (kcal)
    pub calories_per_day: u32,
    /// Daily protein target (g)
    pub protein_per_day_g: f64,
    /// Daily carbohydrate target (g)
    pub carbs_per_day_g: f64,
    /// Daily fat target (g)
    pub fat_per_day_g: f64,
}

impl NutritionTargets {
    /// Sentinel targets requesting natural-values mode: the balancing engine
    /// is bypassed and generated meals keep their self-reported nutrition.
    ///
    /// This mode is explicit. It is never inferred from a target merely being
    /// small, and target calculation never produces it for valid biometrics.
    #[must_use]
    pub const fn natural_values() -> Self {
        Self {
            calories_per_day: 0,
            protein_per_day_g: 0.0,
            carbs_per_day_g: 0.0,
            fat_per_day_g: 0.0,
        }
    }

    /// Whether these targets request natural-values mode (all four zero)
    #[must_use]
    pub fn is_natural_values(&self) -> bool {
        self.calories_per_day == 0
            && self.protein_per_day_g == 0.0
            && self.carbs_per_day_g == 0.0
            && self.fat_per_day_g == 0.0
    }

    /// Scale targets to a per-meal share, used when hinting the generator
    #[must_use]
    pub fn share(&self, fraction: f64) -> Self {
        Self {
            calories_per_day: (f64::from(self.calories_per_day) * fraction).round() as u32,
            protein_per_day_g: self.protein_per_day_g * fraction,
            carbs_per_day_g: self.carbs_per_day_g * fraction,
            fat_per_day_g: self.fat_per_day_g * fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_values_detected_only_when_all_zero() {
        assert!(NutritionTargets::natural_values().is_natural_values());

        let targets = NutritionTargets {
            calories_per_day: 0,
            protein_per_day_g: 0.0,
            carbs_per_day_g: 1.0,
            fat_per_day_g: 0.0,
        };
        assert!(!targets.is_natural_values());
    }

    #[test]
    fn small_targets_are_not_natural_values() {
        let targets = NutritionTargets {
            calories_per_day: 1,
            protein_per_day_g: 0.1,
            carbs_per_day_g: 0.1,
            fat_per_day_g: 0.1,
        };
        assert!(!targets.is_natural_values());
    }
}
