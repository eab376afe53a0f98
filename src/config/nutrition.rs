// ABOUTME: Nutrition target calculation configuration
// ABOUTME: BMR coefficients, activity factors, goal adjustments and macro factors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! Nutrition Calculation Configuration
//!
//! # Scientific References
//!
//! - BMR: Mifflin, M.D., et al. (1990). A new predictive equation for resting
//!   energy expenditure. *American Journal of Clinical Nutrition*, 51(2),
//!   241-247. DOI: 10.1093/ajcn/51.2.241
//! - Activity factors: `McArdle` et al. (2010), Exercise Physiology
//! - Protein: Phillips & Van Loon (2011) DOI: 10.1080/02640414.2011.619204

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Nutrition target calculation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// Mifflin-St Jeor BMR coefficients
    pub bmr: BmrConfig,
    /// TDEE activity multipliers
    pub activity_factors: ActivityFactorsConfig,
    /// Additive calorie adjustments per training goal
    pub goal_adjustments: GoalAdjustmentConfig,
    /// Protein g/kg factors per training goal
    pub protein_factors: ProteinFactorsConfig,
    /// Fat target as a fraction of daily calories (0.25 = 25%)
    pub fat_fraction_of_calories: FatFraction,
    /// Per-meal share of daily targets used when hinting the generator
    pub meal_split: MealSplitConfig,
}

/// Fat fraction newtype so the default derives cleanly
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FatFraction(pub f64);

impl Default for FatFraction {
    fn default() -> Self {
        Self(0.25)
    }
}

/// Mifflin-St Jeor formula coefficients
///
/// BMR = `weight_coef`·kg + `height_coef`·cm + `age_coef`·age + sex constant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Weight coefficient (10.0)
    pub weight_coef: f64,
    /// Height coefficient (6.25)
    pub height_coef: f64,
    /// Age coefficient (-5.0)
    pub age_coef: f64,
    /// Male constant (+5)
    pub male_constant: f64,
    /// Female/other constant (-161)
    pub female_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            weight_coef: 10.0,
            height_coef: 6.25,
            age_coef: -5.0,
            male_constant: 5.0,
            female_constant: -161.0,
        }
    }
}

/// TDEE activity multipliers, ascending by activity level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Little or no exercise: 1.2
    pub sedentary: f64,
    /// 1-3 days/week: 1.375
    pub lightly_active: f64,
    /// 3-5 days/week: 1.55
    pub moderately_active: f64,
    /// 6-7 days/week: 1.725
    pub very_active: f64,
    /// Hard training twice a day: 1.9
    pub extra_active: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            lightly_active: 1.375,
            moderately_active: 1.55,
            very_active: 1.725,
            extra_active: 1.9,
        }
    }
}

/// Additive kcal adjustment applied to TDEE per training goal.
///
/// Applied additively, not multiplicatively, so the deficit/surplus stays
/// constant across body sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAdjustmentConfig {
    /// Weight loss deficit (-400)
    pub weight_loss: f64,
    /// Muscle gain surplus (+300)
    pub muscle_gain: f64,
    /// Endurance surplus (+150)
    pub endurance: f64,
    /// Strength surplus (+200)
    pub strength: f64,
    /// Flexibility: maintenance (0)
    pub flexibility: f64,
    /// General fitness: maintenance (0)
    pub general_fitness: f64,
}

impl Default for GoalAdjustmentConfig {
    fn default() -> Self {
        Self {
            weight_loss: -400.0,
            muscle_gain: 300.0,
            endurance: 150.0,
            strength: 200.0,
            flexibility: 0.0,
            general_fitness: 0.0,
        }
    }
}

/// Protein target factors in g per kg body weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinFactorsConfig {
    /// Baseline for all goals (1.6)
    pub baseline_g_per_kg: f64,
    /// Weight loss: muscle preservation under deficit (1.8)
    pub weight_loss_g_per_kg: f64,
    /// Muscle gain (2.0)
    pub muscle_gain_g_per_kg: f64,
}

impl Default for ProteinFactorsConfig {
    fn default() -> Self {
        Self {
            baseline_g_per_kg: 1.6,
            weight_loss_g_per_kg: 1.8,
            muscle_gain_g_per_kg: 2.0,
        }
    }
}

/// Share of daily targets assigned to each meal slot when hinting the
/// generator. Shares must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSplitConfig {
    /// Breakfast share (0.25)
    pub breakfast: f64,
    /// Lunch share (0.30)
    pub lunch: f64,
    /// Snack share (0.15)
    pub snack: f64,
    /// Dinner share (0.30)
    pub dinner: f64,
}

impl Default for MealSplitConfig {
    fn default() -> Self {
        Self {
            breakfast: 0.25,
            lunch: 0.30,
            snack: 0.15,
            dinner: 0.30,
        }
    }
}

impl NutritionConfig {
    /// Validate coefficient ranges
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for non-positive multipliers, a fat fraction
    /// outside (0, 1) or meal shares that do not sum to 1.
    pub fn validate(&self) -> Result<(), AppError> {
        let factors = [
            ("sedentary", self.activity_factors.sedentary),
            ("lightly_active", self.activity_factors.lightly_active),
            ("moderately_active", self.activity_factors.moderately_active),
            ("very_active", self.activity_factors.very_active),
            ("extra_active", self.activity_factors.extra_active),
        ];
        for (name, value) in factors {
            if value < 1.0 {
                return Err(AppError::config(format!(
                    "activity factor {name} must be at least 1.0, got {value}"
                )));
            }
        }

        if !(0.0..1.0).contains(&self.fat_fraction_of_calories.0)
            || self.fat_fraction_of_calories.0 == 0.0
        {
            return Err(AppError::config(format!(
                "fat_fraction_of_calories must be in (0, 1), got {}",
                self.fat_fraction_of_calories.0
            )));
        }

        let share_sum = self.meal_split.breakfast
            + self.meal_split.lunch
            + self.meal_split.snack
            + self.meal_split.dinner;
        if (share_sum - 1.0).abs() > 1e-9 {
            return Err(AppError::config(format!(
                "meal split shares must sum to 1.0, got {share_sum}"
            )));
        }

        Ok(())
    }
}
