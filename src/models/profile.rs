// ABOUTME: User profile model from the assessment flow
// ABOUTME: Biometrics, training goal, lifestyle constraints and dietary preferences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Biological sex for BMR calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male constant (+5) in Mifflin-St Jeor
    Male,
    /// Female constant (-161)
    Female,
    /// Treated as female for BMR purposes (conservative estimate)
    Other,
}

/// Training goal driving calorie adjustment and macro distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    /// Caloric deficit with elevated protein
    WeightLoss,
    /// Caloric surplus with maximal protein
    MuscleGain,
    /// Moderate surplus for endurance work
    Endurance,
    /// Moderate surplus for strength work
    Strength,
    /// Maintenance calories
    Flexibility,
    /// Maintenance calories
    GeneralFitness,
}

/// Activity level for TDEE calculation, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    LightlyActive,
    /// 3-5 days/week
    ModeratelyActive,
    /// 6-7 days/week
    VeryActive,
    /// Hard training twice a day
    ExtraActive,
}

/// Training experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// New to structured training
    #[default]
    Beginner,
    /// Consistent training for 6+ months
    Intermediate,
    /// Multiple years of structured training
    Advanced,
}

/// Cooking skill for recipe complexity filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CookingSkill {
    /// Simple recipes, basic techniques
    Basic,
    /// Moderate complexity
    #[default]
    Intermediate,
    /// Advanced techniques welcome
    Advanced,
}

/// Dietary restriction for meal generation constraints
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    /// No gluten-containing ingredients
    GlutenFree,
    /// No dairy products
    DairyFree,
    /// No animal products
    Vegan,
    /// No meat or fish
    Vegetarian,
    /// No nuts
    NutFree,
    /// Reduced carbohydrate intake
    LowCarb,
    /// Free-text restriction from the assessment
    Custom(String),
}

impl DietaryRestriction {
    /// Human-readable label used in prompt construction
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::GlutenFree => "gluten-free".to_owned(),
            Self::DairyFree => "dairy-free".to_owned(),
            Self::Vegan => "vegan".to_owned(),
            Self::Vegetarian => "vegetarian".to_owned(),
            Self::NutFree => "nut-free".to_owned(),
            Self::LowCarb => "low-carb".to_owned(),
            Self::Custom(text) => text.clone(),
        }
    }
}

/// Day of week available for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// Lowercase label used as a day-type template key
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

/// Validated biometrics extracted from a profile.
///
/// Existence of this value proves age, height and weight are present and
/// strictly positive; target calculation takes this, not the raw profile.
#[derive(Debug, Clone, Copy)]
pub struct Biometrics {
    /// Age in years
    pub age: u32,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
}

/// User profile captured by the assessment flow.
///
/// Created once per user, superseded by a new active record on
/// re-assessment, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile identifier
    pub id: Uuid,
    /// Age in years
    pub age: Option<u32>,
    /// Biological sex
    pub sex: Sex,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Desired weight in kilograms, if stated
    pub target_weight_kg: Option<f64>,
    /// Training goal
    pub goal: FitnessGoal,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Training experience
    pub experience: ExperienceLevel,
    /// Free-text injury flags from the assessment
    pub injuries: Option<String>,
    /// Free-text medical flags
    pub medical_notes: Option<String>,
    /// Available equipment (free-form names)
    pub equipment: Vec<String>,
    /// Days available for training
    pub available_days: Vec<Weekday>,
    /// Dietary restrictions
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Preferred cuisines
    pub cuisine_preferences: Vec<String>,
    /// Cooking skill
    pub cooking_skill: CookingSkill,
    /// Weekly food budget in the user's currency
    pub weekly_budget: Option<f64>,
    /// Daily meal-prep time budget in minutes
    pub prep_time_budget_mins: Option<u32>,
    /// Whether this is the active profile record
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last re-assessment timestamp
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Extract validated biometrics, failing fast when any required value is
    /// absent or non-positive.
    ///
    /// # Errors
    ///
    /// Returns `MissingBiometrics` naming the offending field. Downstream
    /// balancing treats zero targets as a deliberate mode switch, so a
    /// missing value must never silently become zero here.
    pub fn biometrics(&self) -> Result<Biometrics, AppError> {
        let age = match self.age {
            Some(age) if age > 0 => age,
            _ => {
                return Err(AppError::missing_biometrics(
                    "age is required for target calculation",
                ))
            }
        };
        let height_cm = match self.height_cm {
            Some(height) if height > 0.0 => height,
            _ => {
                return Err(AppError::missing_biometrics(
                    "height is required for target calculation",
                ))
            }
        };
        let weight_kg = match self.weight_kg {
            Some(weight) if weight > 0.0 => weight,
            _ => {
                return Err(AppError::missing_biometrics(
                    "weight is required for target calculation",
                ))
            }
        };

        Ok(Biometrics {
            age,
            height_cm,
            weight_kg,
        })
    }
}
