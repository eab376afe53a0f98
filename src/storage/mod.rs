// ABOUTME: Persistent store seam for profiles, plans and shared entities
// ABOUTME: Async trait with SQLite and in-memory implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Persistent Store
//!
//! The engine consumes a relational store through [`PlanStore`]:
//! create/update/upsert/count plus the two capabilities the pipeline depends
//! on — case-insensitive name matching for deduplication and the atomic
//! "activate this container, deactivate the others" update.
//!
//! [`SqliteStore`] is the production implementation; [`InMemoryStore`] backs
//! tests and local experimentation.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DayUnit, Exercise, PlanContainer, PlanKind, Profile, RecipeDetail};

/// Shared, deduplicated recipe record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Recipe identifier
    pub id: Uuid,
    /// Recipe name (case-insensitive unique)
    pub name: String,
    /// Structured detail
    pub detail: RecipeDetail,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// User-visible record of a failed generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationFailure {
    /// Failure identifier
    pub id: Uuid,
    /// Profile the run belonged to
    pub profile_id: Uuid,
    /// Short human-readable explanation
    pub reason: String,
    /// When the run failed
    pub created_at: DateTime<Utc>,
}

/// Persistent relational store consumed by the pipeline
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Fetch a profile by id
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Create or replace a profile record
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError>;

    /// Case-insensitive exact match on primary exercise name
    async fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, AppError>;

    /// Case-insensitive exact match on alternate exercise name
    async fn find_exercise_by_alternate(&self, name: &str) -> Result<Option<Exercise>, AppError>;

    /// Insert a new exercise record
    async fn insert_exercise(&self, exercise: &Exercise) -> Result<(), AppError>;

    /// Total number of stored exercises
    async fn count_exercises(&self) -> Result<u64, AppError>;

    /// Case-insensitive exact match on recipe name
    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<RecipeRecord>, AppError>;

    /// Insert a new recipe record
    async fn insert_recipe(&self, recipe: &RecipeRecord) -> Result<(), AppError>;

    /// Insert a plan container (created inactive)
    async fn insert_container(&self, container: &PlanContainer) -> Result<(), AppError>;

    /// Fetch a container by id
    async fn get_container(&self, id: Uuid) -> Result<Option<PlanContainer>, AppError>;

    /// Atomically activate a container and deactivate every other container
    /// of the same kind for the profile
    async fn activate_container(
        &self,
        container_id: Uuid,
        profile_id: Uuid,
        kind: PlanKind,
    ) -> Result<(), AppError>;

    /// Insert a day unit
    async fn insert_day_unit(&self, unit: &DayUnit) -> Result<(), AppError>;

    /// Replace a day unit's content and totals
    async fn update_day_unit(&self, unit: &DayUnit) -> Result<(), AppError>;

    /// All day units of a container, ordered by (week, day index)
    async fn day_units_for_container(&self, container_id: Uuid)
        -> Result<Vec<DayUnit>, AppError>;

    /// Record a user-visible generation failure
    async fn record_generation_failure(
        &self,
        profile_id: Uuid,
        reason: &str,
    ) -> Result<(), AppError>;

    /// Failures recorded for a profile, newest first
    async fn generation_failures(&self, profile_id: Uuid)
        -> Result<Vec<GenerationFailure>, AppError>;
}
