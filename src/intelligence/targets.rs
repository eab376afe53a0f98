// ABOUTME: Daily nutrition target calculation from profile biometrics
// ABOUTME: Mifflin-St Jeor BMR, activity-factor TDEE, additive goal adjustment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Nutrition Target Calculation
//!
//! Pure and deterministic: biometrics plus goal in, daily calorie and macro
//! targets out. Missing biometrics fail before any arithmetic runs — a
//! silently defaulted zero target would later read as a deliberate
//! natural-values mode switch in the balancing engine.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting
//!   energy expenditure. *American Journal of Clinical Nutrition*, 51(2),
//!   241-247. DOI: 10.1093/ajcn/51.2.241
//! - `McArdle` et al. (2010), Exercise Physiology (activity factors)

use tracing::debug;

use crate::config::NutritionConfig;
use crate::errors::AppError;
use crate::models::{ActivityLevel, FitnessGoal, NutritionTargets, Profile, Sex};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Compute daily nutrition targets for a profile.
///
/// Rounding happens exactly once, at the end: calories to a whole number,
/// macros to one decimal. All intermediate math stays unrounded.
///
/// # Errors
///
/// Returns `MissingBiometrics` when age, height or weight is absent or
/// non-positive — before any arithmetic.
pub fn compute_targets(
    profile: &Profile,
    config: &NutritionConfig,
) -> Result<NutritionTargets, AppError> {
    let bio = profile.biometrics()?;

    let sex_constant = match profile.sex {
        Sex::Male => config.bmr.male_constant,
        Sex::Female | Sex::Other => config.bmr.female_constant,
    };
    let bmr = config.bmr.weight_coef * bio.weight_kg
        + config.bmr.height_coef * bio.height_cm
        + config.bmr.age_coef * f64::from(bio.age)
        + sex_constant;

    let activity_factor = match profile.activity_level {
        ActivityLevel::Sedentary => config.activity_factors.sedentary,
        ActivityLevel::LightlyActive => config.activity_factors.lightly_active,
        ActivityLevel::ModeratelyActive => config.activity_factors.moderately_active,
        ActivityLevel::VeryActive => config.activity_factors.very_active,
        ActivityLevel::ExtraActive => config.activity_factors.extra_active,
    };
    let tdee = bmr * activity_factor;

    let goal_adjustment = match profile.goal {
        FitnessGoal::WeightLoss => config.goal_adjustments.weight_loss,
        FitnessGoal::MuscleGain => config.goal_adjustments.muscle_gain,
        FitnessGoal::Endurance => config.goal_adjustments.endurance,
        FitnessGoal::Strength => config.goal_adjustments.strength,
        FitnessGoal::Flexibility => config.goal_adjustments.flexibility,
        FitnessGoal::GeneralFitness => config.goal_adjustments.general_fitness,
    };
    let calories = tdee + goal_adjustment;

    let protein_factor = match profile.goal {
        FitnessGoal::WeightLoss => config.protein_factors.weight_loss_g_per_kg,
        FitnessGoal::MuscleGain => config.protein_factors.muscle_gain_g_per_kg,
        _ => config.protein_factors.baseline_g_per_kg,
    };
    let protein = bio.weight_kg * protein_factor;

    let fat = calories * config.fat_fraction_of_calories.0 / KCAL_PER_G_FAT;

    let carbs = ((calories - protein * KCAL_PER_G_PROTEIN - fat * KCAL_PER_G_FAT)
        / KCAL_PER_G_CARBS)
        .max(0.0);

    debug!(
        bmr,
        tdee, calories, "nutrition targets computed for profile {}", profile.id
    );

    Ok(NutritionTargets {
        calories_per_day: calories.round() as u32,
        protein_per_day_g: round1(protein),
        carbs_per_day_g: round1(carbs),
        fat_per_day_g: round1(fat),
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
