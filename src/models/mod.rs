// ABOUTME: Domain models for the plan generation engine
// ABOUTME: Re-exports profile, nutrition target and plan container types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Domain Models
//!
//! Profiles, nutrition targets, plan containers, day units and the shared
//! deduplicated entities (exercises, recipes). Everything here is plain
//! serializable data; behavior lives in `intelligence`, `llm` and
//! `orchestrator`.

mod plan;
mod profile;
mod targets;

pub use plan::{
    DayContent, DayUnit, Difficulty, Exercise, ExerciseUse, Ingredient, IngredientUnit, Meal,
    MealDay, MealNutrition, MealSlot, PlanContainer, PlanDuration, PlanKind, RecipeDetail,
    SupplementKind, UnitTotals, WorkoutDay,
};
pub use profile::{
    ActivityLevel, Biometrics, CookingSkill, DietaryRestriction, ExperienceLevel, FitnessGoal,
    Profile, Sex, Weekday,
};
pub use targets::NutritionTargets;
