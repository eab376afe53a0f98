// ABOUTME: Plan container, day unit and shared entity models
// ABOUTME: Workout days, meal days, recipes, exercises and per-use parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of plan a container holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Multi-week workout plan
    Workout,
    /// Multi-day meal plan
    Meal,
}

impl PlanKind {
    /// Storage discriminator
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Meal => "meal",
        }
    }
}

/// Plan length: workout plans span weeks, meal plans span days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanDuration {
    /// Workout plan length in weeks
    Weeks(u32),
    /// Meal plan length in days
    Days(u32),
}

impl PlanDuration {
    /// Number of calendar weeks covered (meal plans round up)
    #[must_use]
    pub const fn weeks(&self) -> u32 {
        match self {
            Self::Weeks(weeks) => *weeks,
            Self::Days(days) => days.div_ceil(7),
        }
    }

    /// Number of calendar days covered
    #[must_use]
    pub const fn days(&self) -> u32 {
        match self {
            Self::Weeks(weeks) => *weeks * 7,
            Self::Days(days) => *days,
        }
    }
}

/// A workout or meal plan owned by one profile.
///
/// Exactly one container per profile and kind is active at a time; activating
/// a new one atomically deactivates the prior active container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanContainer {
    /// Container identifier
    pub id: Uuid,
    /// Owning profile
    pub profile_id: Uuid,
    /// Workout or meal plan
    pub kind: PlanKind,
    /// Plan length
    pub duration: PlanDuration,
    /// Whether this container is the active one for its kind
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Meal slot within a day; also the day-type key for meal templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    /// First meal of the day
    Breakfast,
    /// Midday meal
    Lunch,
    /// Smaller between-meal portion
    Snack,
    /// Evening meal
    Dinner,
}

impl MealSlot {
    /// All slots in day order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Snack, Self::Dinner];

    /// Lowercase label used as a day-type template key
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
        }
    }
}

/// Ingredient measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IngredientUnit {
    /// Weight in grams (base unit for nutrition math)
    #[default]
    Grams,
    /// Volume in milliliters (treated 1:1 with grams for nutrition math)
    Milliliters,
    /// Count of whole items
    Pieces,
}

/// One structured ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name as generated
    pub name: String,
    /// Amount in `unit`
    pub amount: f64,
    /// Measurement unit
    pub unit: IngredientUnit,
}

/// Structured recipe owned by a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Ingredient list
    pub ingredients: Vec<Ingredient>,
    /// Free-text preparation instructions
    pub instructions: String,
    /// Free-form tags (cuisine, dietary, "supplement", ...)
    pub tags: Vec<String>,
}

/// Self-reported or computed nutrition for one meal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MealNutrition {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

/// Synthetic supplement entry kind, used to close nutrition gaps.
///
/// Supplement meals are not user-facing recipes; they exist so a day's totals
/// can reach targets the generated meals missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplementKind {
    /// Whey protein shake closing a protein gap
    Protein,
    /// Carbohydrate/calorie gainer shake
    Gainer,
}

/// One meal within a day unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Meal name as generated
    pub name: String,
    /// Short description
    pub description: String,
    /// Slot this meal fills
    pub slot: MealSlot,
    /// Deduplicated recipe record backing this meal, once resolved
    pub recipe_id: Option<Uuid>,
    /// Recipe detail (denormalized for display)
    pub recipe: RecipeDetail,
    /// Nutrition for this meal; self-reported by the generator, replaced by
    /// computed values after balancing
    pub nutrition: MealNutrition,
    /// Set when this entry is a synthetic supplement
    pub supplement: Option<SupplementKind>,
}

/// Exercise difficulty, closed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Suitable for new trainees
    Beginner,
    /// Some training history assumed
    #[default]
    Intermediate,
    /// Advanced trainees only
    Advanced,
}

impl Difficulty {
    /// Case-normalizing parser; unknown values are rejected, not defaulted
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Shared, deduplicated exercise entity.
///
/// Uniquely identified by case-insensitive name; the same logical name
/// resolves to the same record across a generation session and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise identifier
    pub id: Uuid,
    /// Primary name
    pub name: String,
    /// Alternate/secondary name, if the generator supplied one
    pub alternate_name: Option<String>,
    /// Short description
    pub description: String,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Demonstration video link
    pub video_url: Option<String>,
    /// Whether the video link passed a liveness check
    pub video_validated: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Per-use exercise parameters: the join between a day unit and an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseUse {
    /// Resolved shared exercise record
    pub exercise_id: Uuid,
    /// Exercise name (denormalized for display)
    pub name: String,
    /// Number of sets
    pub sets: Option<u32>,
    /// Repetitions per set
    pub reps: Option<u32>,
    /// Duration for time-based exercises (seconds)
    pub duration_secs: Option<u32>,
    /// Working weight in kilograms; `None` when unknown or bodyweight-word
    /// coercion failed
    pub weight_kg: Option<f64>,
    /// Rest between sets (seconds)
    pub rest_secs: Option<u32>,
}

/// One workout day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Workout name as generated
    pub name: String,
    /// Short description
    pub description: String,
    /// Ordered exercise list with per-use parameters
    pub exercises: Vec<ExerciseUse>,
}

/// One day of meals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDay {
    /// Meals in slot order, plus any supplement entries
    pub meals: Vec<Meal>,
}

/// Content carried by a day unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayContent {
    /// A workout day
    Workout(WorkoutDay),
    /// A day of meals
    Meals(MealDay),
}

/// Denormalized per-unit totals for display
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitTotals {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Estimated duration for workout units (minutes)
    pub duration_mins: Option<u32>,
}

/// One day within a plan container, keyed by (week, day index).
///
/// Units stamped from the same day-type template share a `template_key`,
/// which is how single-unit regeneration finds every occurrence of the same
/// logical content across weeks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayUnit {
    /// Unit identifier
    pub id: Uuid,
    /// Owning container
    pub container_id: Uuid,
    /// 1-based week number
    pub week_number: u32,
    /// 0-based day index within the week
    pub day_index: u32,
    /// Logical day-type identity ("monday", "breakfast-day", ...)
    pub template_key: String,
    /// Workout or meals
    pub content: DayContent,
    /// Denormalized totals
    pub totals: UnitTotals,
}
