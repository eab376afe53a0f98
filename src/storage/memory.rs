// ABOUTME: In-memory PlanStore implementation for tests and local runs
// ABOUTME: Shared HashMaps behind an async RwLock, matching store semantics exactly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{GenerationFailure, PlanStore, RecipeRecord};
use crate::errors::AppError;
use crate::models::{DayUnit, Exercise, PlanContainer, PlanKind, Profile};

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    exercises: HashMap<Uuid, Exercise>,
    recipes: HashMap<Uuid, RecipeRecord>,
    containers: HashMap<Uuid, PlanContainer>,
    day_units: HashMap<Uuid, DayUnit>,
    failures: Vec<GenerationFailure>,
}

/// In-memory store with the same observable semantics as the SQLite backend
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for InMemoryStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, AppError> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .tables
            .read()
            .await
            .exercises
            .values()
            .find(|e| e.name.trim().to_lowercase() == needle)
            .cloned())
    }

    async fn find_exercise_by_alternate(&self, name: &str) -> Result<Option<Exercise>, AppError> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .tables
            .read()
            .await
            .exercises
            .values()
            .find(|e| {
                e.alternate_name
                    .as_ref()
                    .is_some_and(|alt| alt.trim().to_lowercase() == needle)
            })
            .cloned())
    }

    async fn insert_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .exercises
            .insert(exercise.id, exercise.clone());
        Ok(())
    }

    async fn count_exercises(&self) -> Result<u64, AppError> {
        Ok(self.tables.read().await.exercises.len() as u64)
    }

    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<RecipeRecord>, AppError> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .tables
            .read()
            .await
            .recipes
            .values()
            .find(|r| r.name.trim().to_lowercase() == needle)
            .cloned())
    }

    async fn insert_recipe(&self, recipe: &RecipeRecord) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .recipes
            .insert(recipe.id, recipe.clone());
        Ok(())
    }

    async fn insert_container(&self, container: &PlanContainer) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .containers
            .insert(container.id, container.clone());
        Ok(())
    }

    async fn get_container(&self, id: Uuid) -> Result<Option<PlanContainer>, AppError> {
        Ok(self.tables.read().await.containers.get(&id).cloned())
    }

    async fn activate_container(
        &self,
        container_id: Uuid,
        profile_id: Uuid,
        kind: PlanKind,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.containers.contains_key(&container_id) {
            return Err(AppError::not_found("plan container"));
        }
        for container in tables.containers.values_mut() {
            if container.profile_id == profile_id && container.kind == kind {
                container.active = container.id == container_id;
            }
        }
        Ok(())
    }

    async fn insert_day_unit(&self, unit: &DayUnit) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .day_units
            .insert(unit.id, unit.clone());
        Ok(())
    }

    async fn update_day_unit(&self, unit: &DayUnit) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.day_units.contains_key(&unit.id) {
            return Err(AppError::not_found("day unit"));
        }
        tables.day_units.insert(unit.id, unit.clone());
        Ok(())
    }

    async fn day_units_for_container(
        &self,
        container_id: Uuid,
    ) -> Result<Vec<DayUnit>, AppError> {
        let mut units: Vec<DayUnit> = self
            .tables
            .read()
            .await
            .day_units
            .values()
            .filter(|u| u.container_id == container_id)
            .cloned()
            .collect();
        units.sort_by_key(|u| (u.week_number, u.day_index));
        Ok(units)
    }

    async fn record_generation_failure(
        &self,
        profile_id: Uuid,
        reason: &str,
    ) -> Result<(), AppError> {
        self.tables.write().await.failures.push(GenerationFailure {
            id: Uuid::new_v4(),
            profile_id,
            reason: reason.to_owned(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn generation_failures(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<GenerationFailure>, AppError> {
        let mut failures: Vec<GenerationFailure> = self
            .tables
            .read()
            .await
            .failures
            .iter()
            .filter(|f| f.profile_id == profile_id)
            .cloned()
            .collect();
        failures.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanDuration, PlanKind};

    fn container(profile_id: Uuid, active: bool) -> PlanContainer {
        PlanContainer {
            id: Uuid::new_v4(),
            profile_id,
            kind: PlanKind::Workout,
            duration: PlanDuration::Weeks(8),
            active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn activation_deactivates_prior_container_of_same_kind() {
        let store = InMemoryStore::new();
        let profile_id = Uuid::new_v4();
        let old = container(profile_id, true);
        let new = container(profile_id, false);
        store.insert_container(&old).await.unwrap();
        store.insert_container(&new).await.unwrap();

        store
            .activate_container(new.id, profile_id, PlanKind::Workout)
            .await
            .unwrap();

        assert!(!store.get_container(old.id).await.unwrap().unwrap().active);
        assert!(store.get_container(new.id).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn exercise_lookup_is_case_insensitive() {
        let store = InMemoryStore::new();
        let exercise = Exercise {
            id: Uuid::new_v4(),
            name: "Push-Up".to_owned(),
            alternate_name: Some("Press-Up".to_owned()),
            description: String::new(),
            difficulty: crate::models::Difficulty::Beginner,
            video_url: None,
            video_validated: false,
            created_at: Utc::now(),
        };
        store.insert_exercise(&exercise).await.unwrap();

        let found = store.find_exercise_by_name("push-up").await.unwrap();
        assert_eq!(found.map(|e| e.id), Some(exercise.id));

        let found = store.find_exercise_by_alternate("PRESS-UP").await.unwrap();
        assert_eq!(found.map(|e| e.id), Some(exercise.id));
    }
}
