// ABOUTME: Prompt construction for workout and meal template generation
// ABOUTME: Role context, strict output-schema instructions and domain constraints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::schema::ContentKind;
use super::ChatMessage;
use crate::models::ExperienceLevel;

/// Per-meal nutrition hint passed into meal prompts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MealTargetHint {
    /// Calories this meal should contribute (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

/// Structured prompt specification for one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Content kind to generate
    pub kind: ContentKind,
    /// Subject line, e.g. "Monday full-body workout" or "breakfast"
    pub subject: String,
    /// Equipment available to the user (workout prompts)
    pub equipment: Vec<String>,
    /// Free-text injury flags to respect
    pub injuries: Option<String>,
    /// Dietary restriction labels (meal prompts)
    pub dietary_restrictions: Vec<String>,
    /// Preferred cuisines (meal prompts)
    pub cuisine_preferences: Vec<String>,
    /// Training experience level (workout prompts)
    pub experience: Option<ExperienceLevel>,
    /// Names already produced; the generator must avoid repeating them
    pub avoid_names: Vec<String>,
    /// Nutrition hint for the meal being generated
    pub meal_targets: Option<MealTargetHint>,
    /// Daily meal-prep time budget in minutes (meal prompts)
    pub prep_time_budget_mins: Option<u32>,
}

impl PromptSpec {
    /// Build the conversation for this spec
    #[must_use]
    pub fn build_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_instruction()),
            ChatMessage::user(self.user_instruction()),
        ]
    }

    /// Terser, more directive instruction appended after a refusal
    #[must_use]
    pub fn fallback_instruction(&self) -> ChatMessage {
        let schema = match self.kind {
            ContentKind::Workout => WORKOUT_SCHEMA,
            ContentKind::Meal => MEAL_SCHEMA,
        };
        ChatMessage::user(format!(
            "Respond with the JSON object only. No apology, no commentary, \
             no markdown. Schema:\n{schema}"
        ))
    }

    fn system_instruction(&self) -> String {
        let role = match self.kind {
            ContentKind::Workout => {
                "You are a certified personal trainer designing safe, effective workouts."
            }
            ContentKind::Meal => {
                "You are a sports nutritionist designing practical, macro-accurate meals."
            }
        };
        let schema = match self.kind {
            ContentKind::Workout => WORKOUT_SCHEMA,
            ContentKind::Meal => MEAL_SCHEMA,
        };
        format!(
            "{role}\n\nRespond with a single JSON object and nothing else: no \
             markdown fences, no explanation before or after. The object must \
             follow this schema exactly:\n{schema}"
        )
    }

    fn user_instruction(&self) -> String {
        let mut prompt = match self.kind {
            ContentKind::Workout => format!("Design a {} session.", self.subject),
            ContentKind::Meal => format!("Design a {} recipe.", self.subject),
        };

        if let Some(experience) = self.experience {
            let label = match experience {
                ExperienceLevel::Beginner => "a beginner",
                ExperienceLevel::Intermediate => "an intermediate trainee",
                ExperienceLevel::Advanced => "an advanced trainee",
            };
            let _ = write!(prompt, " The user is {label}.");
        }

        if !self.equipment.is_empty() {
            let _ = write!(
                prompt,
                " Available equipment: {}. Use nothing else.",
                self.equipment.join(", ")
            );
        }

        if let Some(injuries) = &self.injuries {
            let _ = write!(
                prompt,
                " Avoid movements that aggravate the following: {injuries}."
            );
        }

        if !self.dietary_restrictions.is_empty() {
            let _ = write!(
                prompt,
                " The meal must be {}.",
                self.dietary_restrictions.join(" and ")
            );
        }

        if !self.cuisine_preferences.is_empty() {
            let _ = write!(
                prompt,
                " Preferred cuisines: {}.",
                self.cuisine_preferences.join(", ")
            );
        }

        if let Some(targets) = self.meal_targets {
            let _ = write!(
                prompt,
                " Target approximately {:.0} kcal, {:.0} g protein, {:.0} g \
                 carbohydrates and {:.0} g fat. State realistic nutrition \
                 values for the ingredient amounts you choose.",
                targets.calories, targets.protein_g, targets.carbs_g, targets.fat_g
            );
        }

        if let Some(mins) = self.prep_time_budget_mins {
            let _ = write!(prompt, " Preparation must fit within {mins} minutes.");
        }

        if !self.avoid_names.is_empty() {
            let _ = write!(
                prompt,
                " Do not reuse any of these names: {}.",
                self.avoid_names.join(", ")
            );
        }

        prompt
    }
}

const WORKOUT_SCHEMA: &str = r#"{
  "name": "string",
  "description": "string",
  "exercises": [
    {
      "name": "string",
      "alternate_name": "string (optional)",
      "description": "string (optional)",
      "difficulty": "beginner | intermediate | advanced",
      "sets": 3,
      "reps": 10,
      "duration_secs": 0,
      "weight_kg": 20,
      "rest_secs": 60,
      "video_url": "string (optional)"
    }
  ]
}"#;

const MEAL_SCHEMA: &str = r#"{
  "name": "string",
  "description": "string",
  "calories": 500,
  "protein_g": 30,
  "carbs_g": 50,
  "fat_g": 15,
  "ingredients": [
    {"name": "string", "amount": 100, "unit": "g"}
  ],
  "instructions": "string",
  "tags": ["string"]
}"#;
