// ABOUTME: Per-kind schema validation for generated content
// ABOUTME: Typed workout/meal templates with enum normalization and numeric coercion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Content Schemas
//!
//! The parsed JSON candidate is never treated as untyped beyond the initial
//! decode: each content kind has an explicit validator producing a typed
//! template or a `Validation` error naming the violation. Validators coerce
//! where the contract allows it (numeric strings, weight words, mixed-case
//! enum values) and reject everything else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{Difficulty, IngredientUnit};

/// Kind of content a generation call is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// A workout-day template
    Workout,
    /// A meal template for one slot
    Meal,
}

/// Validated generated content, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedContent {
    /// A validated workout-day template
    Workout(WorkoutTemplate),
    /// A validated meal template
    Meal(MealTemplate),
}

/// One exercise line inside a workout template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    /// Exercise name
    pub name: String,
    /// Alternate name if the generator supplied one
    pub alternate_name: Option<String>,
    /// Short description
    pub description: Option<String>,
    /// Difficulty after case normalization
    pub difficulty: Option<Difficulty>,
    /// Number of sets
    pub sets: Option<u32>,
    /// Repetitions per set
    pub reps: Option<u32>,
    /// Duration for time-based work (seconds)
    pub duration_secs: Option<u32>,
    /// Working weight in kg; `None` when absent or unparseable
    pub weight_kg: Option<f64>,
    /// Rest between sets (seconds)
    pub rest_secs: Option<u32>,
    /// Demonstration video link
    pub video_url: Option<String>,
}

/// A validated workout-day template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Workout name
    pub name: String,
    /// Short description
    pub description: String,
    /// Non-empty exercise list
    pub exercises: Vec<ExerciseTemplate>,
}

/// One ingredient line inside a meal template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientTemplate {
    /// Ingredient name
    pub name: String,
    /// Amount in `unit`
    pub amount: f64,
    /// Measurement unit
    pub unit: IngredientUnit,
}

/// A validated meal template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTemplate {
    /// Meal name
    pub name: String,
    /// Short description
    pub description: String,
    /// Self-reported calories (kcal)
    pub calories: f64,
    /// Self-reported protein (g)
    pub protein_g: f64,
    /// Self-reported carbohydrates (g)
    pub carbs_g: f64,
    /// Self-reported fat (g)
    pub fat_g: f64,
    /// Non-empty ingredient list
    pub ingredients: Vec<IngredientTemplate>,
    /// Non-empty preparation instructions
    pub instructions: String,
    /// Free-form tags
    pub tags: Vec<String>,
}

/// Validate a parsed candidate against the schema for `kind`.
///
/// # Errors
///
/// Returns a `Validation` error naming the first violated field.
pub fn validate(kind: ContentKind, value: &Value) -> Result<GeneratedContent, AppError> {
    match kind {
        ContentKind::Workout => validate_workout(value).map(GeneratedContent::Workout),
        ContentKind::Meal => validate_meal(value).map(GeneratedContent::Meal),
    }
}

fn validate_workout(value: &Value) -> Result<WorkoutTemplate, AppError> {
    let name = require_string(value, "name")?;
    let description = require_string(value, "description")?;
    let raw_exercises = require_array(value, "exercises")?;

    let mut exercises = Vec::with_capacity(raw_exercises.len());
    for (index, raw) in raw_exercises.iter().enumerate() {
        exercises.push(validate_exercise(raw).map_err(|err| {
            AppError::validation(format!("exercises[{index}]: {}", err.message))
        })?);
    }

    Ok(WorkoutTemplate {
        name,
        description,
        exercises,
    })
}

fn validate_exercise(value: &Value) -> Result<ExerciseTemplate, AppError> {
    let name = require_string(value, "name")?;

    let difficulty = match value.get("difficulty").and_then(Value::as_str) {
        Some(raw) => Some(
            Difficulty::parse(raw)
                .ok_or_else(|| AppError::validation(format!("unknown difficulty '{raw}'")))?,
        ),
        None => None,
    };

    Ok(ExerciseTemplate {
        name,
        alternate_name: optional_string(value, "alternate_name"),
        description: optional_string(value, "description"),
        difficulty,
        sets: coerce_u32(value.get("sets")),
        reps: coerce_u32(value.get("reps")),
        duration_secs: coerce_u32(value.get("duration_secs")),
        weight_kg: coerce_weight(value.get("weight_kg")),
        rest_secs: coerce_u32(value.get("rest_secs")),
        video_url: optional_string(value, "video_url"),
    })
}

fn validate_meal(value: &Value) -> Result<MealTemplate, AppError> {
    let name = require_string(value, "name")?;
    let description = require_string(value, "description")?;
    let calories = require_number(value, "calories")?;
    let protein_g = require_number(value, "protein_g")?;
    let carbs_g = require_number(value, "carbs_g")?;
    let fat_g = require_number(value, "fat_g")?;

    let raw_ingredients = require_array(value, "ingredients")?;
    let mut ingredients = Vec::with_capacity(raw_ingredients.len());
    for (index, raw) in raw_ingredients.iter().enumerate() {
        let name = require_string(raw, "name").map_err(|err| {
            AppError::validation(format!("ingredients[{index}]: {}", err.message))
        })?;
        let amount = require_number(raw, "amount").map_err(|err| {
            AppError::validation(format!("ingredients[{index}]: {}", err.message))
        })?;
        let unit = parse_unit(raw.get("unit").and_then(Value::as_str));
        ingredients.push(IngredientTemplate { name, amount, unit });
    }

    let instructions = match value.get("instructions") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Array(steps)) if !steps.is_empty() => steps
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => {
            return Err(AppError::validation(
                "field 'instructions' must be a non-empty string or list",
            ))
        }
    };
    if instructions.trim().is_empty() {
        return Err(AppError::validation(
            "field 'instructions' must not be empty",
        ));
    }

    let tags = value
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    Ok(MealTemplate {
        name,
        description,
        calories,
        protein_g,
        carbs_g,
        fat_g,
        ingredients,
        instructions,
        tags,
    })
}

// ============================================================================
// Field Helpers
// ============================================================================

fn require_string(value: &Value, field: &str) -> Result<String, AppError> {
    match value.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        _ => Err(AppError::validation(format!(
            "field '{field}' must be a non-empty string"
        ))),
    }
}

fn optional_string(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

fn require_array<'a>(value: &'a Value, field: &str) -> Result<&'a Vec<Value>, AppError> {
    match value.get(field).and_then(Value::as_array) {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(AppError::validation(format!(
            "field '{field}' must be a non-empty array"
        ))),
    }
}

fn require_number(value: &Value, field: &str) -> Result<f64, AppError> {
    coerce_f64(value.get(field)).ok_or_else(|| {
        AppError::validation(format!("field '{field}' must be a number"))
    })
}

/// Coerce a JSON value into f64: numbers directly, numeric strings by parsing
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce a JSON value into u32, accepting "8-12"-style ranges by taking the
/// leading integer
fn coerce_u32(value: Option<&Value>) -> Option<u32> {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok()
        }
        _ => None,
    }
}

/// Fixed numeric anchors for weight words the generator tends to emit
const WEIGHT_WORDS: &[(&str, f64)] = &[
    ("bodyweight", 0.0),
    ("body weight", 0.0),
    ("none", 0.0),
    ("light", 20.0),
    ("medium", 40.0),
    ("moderate", 40.0),
    ("heavy", 60.0),
];

/// Coerce a weight field: numbers pass through, known words map to fixed
/// values, anything else becomes `None` — never an error, never dropped.
fn coerce_weight(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let normalized = s.trim().to_lowercase();
            if let Ok(parsed) = normalized.parse::<f64>() {
                return Some(parsed);
            }
            WEIGHT_WORDS
                .iter()
                .find(|(word, _)| *word == normalized)
                .map(|(_, kg)| *kg)
        }
        _ => None,
    }
}

fn parse_unit(raw: Option<&str>) -> IngredientUnit {
    match raw.map(|u| u.trim().to_lowercase()) {
        Some(unit) if matches!(unit.as_str(), "ml" | "milliliter" | "milliliters") => {
            IngredientUnit::Milliliters
        }
        Some(unit) if matches!(unit.as_str(), "pc" | "pcs" | "piece" | "pieces" | "ks") => {
            IngredientUnit::Pieces
        }
        _ => IngredientUnit::Grams,
    }
}
