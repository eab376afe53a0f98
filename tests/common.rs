// ABOUTME: Shared fixtures for integration tests
// ABOUTME: Scripted completion provider, profile builder and canned generator payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use fitplan::errors::AppError;
use fitplan::llm::{CompletionProvider, CompletionRequest, CompletionResponse};
use fitplan::models::{
    ActivityLevel, CookingSkill, ExperienceLevel, FitnessGoal, Profile, Sex, Weekday,
};

/// Completion provider that answers workout prompts with workout JSON and
/// meal prompts with meal JSON, tracking how many calls were made.
pub struct RoutingProvider {
    pub calls: Mutex<Vec<String>>,
}

impl RoutingProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for RoutingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for RoutingProvider {
    fn name(&self) -> &'static str {
        "routing-test"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        let user_prompt = request
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        self.calls.lock().unwrap().push(user_prompt.clone());

        let content = if user_prompt.contains("recipe") {
            meal_json(&subject_of(&user_prompt))
        } else {
            workout_json(&subject_of(&user_prompt))
        };

        Ok(CompletionResponse {
            content,
            model: "routing-test".to_owned(),
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

fn subject_of(prompt: &str) -> String {
    for marker in ["Design a ", "design a "] {
        if let Some(start) = prompt.find(marker) {
            let rest = &prompt[start + marker.len()..];
            if let Some(end) = rest.find(&[' ', '.'][..]) {
                return rest[..end].to_owned();
            }
        }
    }
    "generic".to_owned()
}

/// Workout payload exercising the repair pass (fences, shared exercise name)
pub fn workout_json(subject: &str) -> String {
    format!(
        "```json\n{{\n  \"name\": \"{subject} session\",\n  \"description\": \"Generated full-body work\",\n  \"exercises\": [\n    {{\"name\": \"Push-Up\", \"difficulty\": \"beginner\", \"sets\": 3, \"reps\": 12, \"rest_secs\": 60}},\n    {{\"name\": \"{subject} squat\", \"difficulty\": \"INTERMEDIATE\", \"sets\": 4, \"reps\": 10, \"weight_kg\": \"heavy\", \"rest_secs\": 90}}\n  ]\n}}\n```"
    )
}

/// Meal payload with enough carbs/protein structure to exercise balancing
pub fn meal_json(subject: &str) -> String {
    format!(
        "{{\n  \"name\": \"{subject} bowl\",\n  \"description\": \"Simple {subject}\",\n  \"calories\": 500, \"protein_g\": 25, \"carbs_g\": 55, \"fat_g\": 15,\n  \"ingredients\": [\n    {{\"name\": \"cooked rice\", \"amount\": 150, \"unit\": \"g\"}},\n    {{\"name\": \"chicken breast\", \"amount\": 120, \"unit\": \"g\"}},\n    {{\"name\": \"olive oil\", \"amount\": 10, \"unit\": \"g\"}}\n  ],\n  \"instructions\": \"Cook and combine.\",\n  \"tags\": [\"{subject}\"]\n}}"
    )
}

/// A complete, valid assessment profile
pub fn profile() -> Profile {
    Profile {
        id: Uuid::new_v4(),
        age: Some(30),
        sex: Sex::Male,
        height_cm: Some(180.0),
        weight_kg: Some(80.0),
        target_weight_kg: None,
        goal: FitnessGoal::GeneralFitness,
        activity_level: ActivityLevel::Sedentary,
        experience: ExperienceLevel::Intermediate,
        injuries: None,
        medical_notes: None,
        equipment: vec!["dumbbells".to_owned()],
        available_days: vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday],
        dietary_restrictions: vec![],
        cuisine_preferences: vec![],
        cooking_skill: CookingSkill::Intermediate,
        weekly_budget: None,
        prep_time_budget_mins: Some(45),
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
