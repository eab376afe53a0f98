// ABOUTME: SQLite PlanStore implementation over sqlx
// ABOUTME: JSON payload columns with extracted key columns for indexed lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use super::{GenerationFailure, PlanStore, RecipeRecord};
use crate::errors::AppError;
use crate::models::{DayUnit, Exercise, PlanContainer, PlanKind, Profile};

/// Schema statements executed on connect. Name lookups go through the
/// `*_lower` columns, computed in Rust so diacritics fold correctly.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY,
        active INTEGER NOT NULL,
        payload TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY,
        name_lower TEXT NOT NULL,
        alternate_lower TEXT,
        payload TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_exercises_name ON exercises (name_lower)",
    "CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY,
        name_lower TEXT NOT NULL,
        payload TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes (name_lower)",
    "CREATE TABLE IF NOT EXISTS containers (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        active INTEGER NOT NULL,
        payload TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_containers_profile ON containers (profile_id, kind)",
    "CREATE TABLE IF NOT EXISTS day_units (
        id TEXT PRIMARY KEY,
        container_id TEXT NOT NULL,
        week_number INTEGER NOT NULL,
        day_index INTEGER NOT NULL,
        payload TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_day_units_container ON day_units (container_id)",
    "CREATE TABLE IF NOT EXISTS generation_failures (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        reason TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
];

/// SQLite-backed plan store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and initialize the schema.
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` when the URL is invalid or the schema cannot
    /// be created.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(AppError::from)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    fn parse_payload<T: serde::de::DeserializeOwned>(payload: &str) -> Result<T, AppError> {
        serde_json::from_str(payload)
            .map_err(|err| AppError::database(format!("corrupt stored payload: {err}")))
    }

    async fn payload_by_query(
        &self,
        query: &str,
        needle: &str,
    ) -> Result<Option<String>, AppError> {
        let row = sqlx::query(query)
            .bind(needle)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get::<String, _>("payload").map_err(AppError::from))
            .transpose()
    }
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        self.payload_by_query("SELECT payload FROM profiles WHERE id = ?1", &id.to_string())
            .await?
            .map(|payload| Self::parse_payload(&payload))
            .transpose()
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO profiles (id, active, payload, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                active = excluded.active,
                payload = excluded.payload,
                updated_at = excluded.updated_at",
        )
        .bind(profile.id.to_string())
        .bind(i32::from(profile.active))
        .bind(serde_json::to_string(profile)?)
        .bind(profile.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, AppError> {
        self.payload_by_query(
            "SELECT payload FROM exercises WHERE name_lower = ?1 LIMIT 1",
            &name.trim().to_lowercase(),
        )
        .await?
        .map(|payload| Self::parse_payload(&payload))
        .transpose()
    }

    async fn find_exercise_by_alternate(&self, name: &str) -> Result<Option<Exercise>, AppError> {
        self.payload_by_query(
            "SELECT payload FROM exercises WHERE alternate_lower = ?1 LIMIT 1",
            &name.trim().to_lowercase(),
        )
        .await?
        .map(|payload| Self::parse_payload(&payload))
        .transpose()
    }

    async fn insert_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO exercises (id, name_lower, alternate_lower, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(exercise.id.to_string())
        .bind(exercise.name.trim().to_lowercase())
        .bind(
            exercise
                .alternate_name
                .as_ref()
                .map(|alt| alt.trim().to_lowercase()),
        )
        .bind(serde_json::to_string(exercise)?)
        .bind(exercise.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_exercises(&self) -> Result<u64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM exercises")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as u64)
    }

    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<RecipeRecord>, AppError> {
        self.payload_by_query(
            "SELECT payload FROM recipes WHERE name_lower = ?1 LIMIT 1",
            &name.trim().to_lowercase(),
        )
        .await?
        .map(|payload| Self::parse_payload(&payload))
        .transpose()
    }

    async fn insert_recipe(&self, recipe: &RecipeRecord) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO recipes (id, name_lower, payload, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(recipe.id.to_string())
        .bind(recipe.name.trim().to_lowercase())
        .bind(serde_json::to_string(recipe)?)
        .bind(recipe.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_container(&self, container: &PlanContainer) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO containers (id, profile_id, kind, active, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(container.id.to_string())
        .bind(container.profile_id.to_string())
        .bind(container.kind.as_str())
        .bind(i32::from(container.active))
        .bind(serde_json::to_string(container)?)
        .bind(container.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_container(&self, id: Uuid) -> Result<Option<PlanContainer>, AppError> {
        self.payload_by_query(
            "SELECT payload FROM containers WHERE id = ?1",
            &id.to_string(),
        )
        .await?
        .map(|payload| Self::parse_payload(&payload))
        .transpose()
    }

    async fn activate_container(
        &self,
        container_id: Uuid,
        profile_id: Uuid,
        kind: PlanKind,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let deactivated = sqlx::query(
            "UPDATE containers
             SET active = 0, payload = json_set(payload, '$.active', json('false'))
             WHERE profile_id = ?1 AND kind = ?2 AND active = 1 AND id != ?3",
        )
        .bind(profile_id.to_string())
        .bind(kind.as_str())
        .bind(container_id.to_string())
        .execute(&mut *tx)
        .await?;

        if deactivated.rows_affected() > 1 {
            // More than one active container means a prior activation raced;
            // last writer wins, but the signal is worth surfacing.
            warn!(
                profile_id = %profile_id,
                deactivated = deactivated.rows_affected(),
                "multiple active containers found during activation"
            );
        }

        let activated = sqlx::query(
            "UPDATE containers
             SET active = 1, payload = json_set(payload, '$.active', json('true'))
             WHERE id = ?1",
        )
        .bind(container_id.to_string())
        .execute(&mut *tx)
        .await?;

        if activated.rows_affected() == 0 {
            return Err(AppError::not_found("plan container"));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn insert_day_unit(&self, unit: &DayUnit) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO day_units (id, container_id, week_number, day_index, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(unit.id.to_string())
        .bind(unit.container_id.to_string())
        .bind(i64::from(unit.week_number))
        .bind(i64::from(unit.day_index))
        .bind(serde_json::to_string(unit)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_day_unit(&self, unit: &DayUnit) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE day_units SET payload = ?2 WHERE id = ?1")
            .bind(unit.id.to_string())
            .bind(serde_json::to_string(unit)?)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("day unit"));
        }
        Ok(())
    }

    async fn day_units_for_container(
        &self,
        container_id: Uuid,
    ) -> Result<Vec<DayUnit>, AppError> {
        let rows = sqlx::query(
            "SELECT payload FROM day_units WHERE container_id = ?1
             ORDER BY week_number, day_index",
        )
        .bind(container_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let payload: String = row.try_get("payload")?;
                Self::parse_payload(&payload)
            })
            .collect()
    }

    async fn record_generation_failure(
        &self,
        profile_id: Uuid,
        reason: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO generation_failures (id, profile_id, reason, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(profile_id.to_string())
        .bind(reason)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn generation_failures(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<GenerationFailure>, AppError> {
        let rows = sqlx::query(
            "SELECT id, profile_id, reason, created_at FROM generation_failures
             WHERE profile_id = ?1 ORDER BY created_at DESC",
        )
        .bind(profile_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let profile_id: String = row.try_get("profile_id")?;
                let reason: String = row.try_get("reason")?;
                let created_at: String = row.try_get("created_at")?;
                Ok(GenerationFailure {
                    id: Uuid::parse_str(&id)
                        .map_err(|err| AppError::database(format!("corrupt id: {err}")))?,
                    profile_id: Uuid::parse_str(&profile_id)
                        .map_err(|err| AppError::database(format!("corrupt id: {err}")))?,
                    reason,
                    created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
                        .map_err(|err| AppError::database(format!("corrupt timestamp: {err}")))?
                        .with_timezone(&chrono::Utc),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, PlanDuration};
    use chrono::Utc;

    async fn store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/test.db", dir.path().display());
        (SqliteStore::connect(&url).await.unwrap(), dir)
    }

    fn exercise(name: &str, alternate: Option<&str>) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            alternate_name: alternate.map(str::to_owned),
            description: String::new(),
            difficulty: Difficulty::Intermediate,
            video_url: None,
            video_validated: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn exercise_round_trip_with_case_folding() {
        let (store, _dir) = store().await;
        let record = exercise("Bench Press", Some("Barbell Press"));
        store.insert_exercise(&record).await.unwrap();

        let by_name = store.find_exercise_by_name("BENCH press").await.unwrap();
        assert_eq!(by_name.map(|e| e.id), Some(record.id));

        let by_alternate = store
            .find_exercise_by_alternate("barbell press")
            .await
            .unwrap();
        assert_eq!(by_alternate.map(|e| e.id), Some(record.id));

        assert_eq!(store.count_exercises().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn activation_is_atomic_per_profile_and_kind() {
        let (store, _dir) = store().await;
        let profile_id = Uuid::new_v4();

        let make = |active| PlanContainer {
            id: Uuid::new_v4(),
            profile_id,
            kind: PlanKind::Meal,
            duration: PlanDuration::Days(14),
            active,
            created_at: Utc::now(),
        };

        let old = make(true);
        let new = make(false);
        store.insert_container(&old).await.unwrap();
        store.insert_container(&new).await.unwrap();

        store
            .activate_container(new.id, profile_id, PlanKind::Meal)
            .await
            .unwrap();

        assert!(!store.get_container(old.id).await.unwrap().unwrap().active);
        assert!(store.get_container(new.id).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn activating_missing_container_fails() {
        let (store, _dir) = store().await;
        let err = store
            .activate_container(Uuid::new_v4(), Uuid::new_v4(), PlanKind::Workout)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ResourceNotFound);
    }
}
