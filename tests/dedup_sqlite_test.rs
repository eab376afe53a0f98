// ABOUTME: Deduplication cache tests over the SQLite store
// ABOUTME: Session stability, synonym normalization and cross-run resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use fitplan::dedup::{CachedEntity, DedupCache, EntityKind};
use fitplan::models::{Difficulty, Exercise};
use fitplan::storage::{PlanStore, SqliteStore};

async fn sqlite_store() -> (Arc<SqliteStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/dedup.db", dir.path().display());
    (Arc::new(SqliteStore::connect(&url).await.unwrap()), dir)
}

fn exercise(name: &str) -> Exercise {
    Exercise {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        alternate_name: None,
        description: String::new(),
        difficulty: Difficulty::Beginner,
        video_url: None,
        video_validated: true,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn same_name_resolves_identically_within_one_run() {
    let (store, _dir) = sqlite_store().await;
    let cache = DedupCache::new(store.clone());

    let entity = CachedEntity {
        id: Uuid::new_v4(),
        canonical_name: "Push-Up".to_owned(),
        validated: true,
    };
    cache
        .remember(EntityKind::Exercise, "Push-Up", entity.clone())
        .await;

    // Lookups from different day templates, different casing and spacing
    for name in ["push-up", "PUSH-UP", "  Push-Up  "] {
        let resolved = cache
            .resolve(EntityKind::Exercise, name, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, entity.id);
    }
}

#[tokio::test]
async fn czech_synonyms_resolve_against_stored_canonical_names() {
    let (store, _dir) = sqlite_store().await;
    let stored = exercise("Push-Up");
    store.insert_exercise(&stored).await.unwrap();

    let cache = DedupCache::new(store);
    let resolved = cache
        .resolve(EntityKind::Exercise, "Kliky", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, stored.id);
}

#[tokio::test]
async fn a_fresh_run_resolves_history_instead_of_recreating() {
    let (store, _dir) = sqlite_store().await;

    // First run creates the record
    {
        let cache = DedupCache::new(store.clone());
        assert!(cache
            .resolve(EntityKind::Exercise, "Goblet Squat", None)
            .await
            .unwrap()
            .is_none());
        let record = exercise("Goblet Squat");
        store.insert_exercise(&record).await.unwrap();
        cache
            .remember(
                EntityKind::Exercise,
                "Goblet Squat",
                CachedEntity {
                    id: record.id,
                    canonical_name: record.name.clone(),
                    validated: true,
                },
            )
            .await;
    }

    // A second run (fresh cache, same store) hits the persistent tier
    let cache = DedupCache::new(store.clone());
    let resolved = cache
        .resolve(EntityKind::Exercise, "goblet squat", None)
        .await
        .unwrap();
    assert!(resolved.is_some());
    assert_eq!(store.count_exercises().await.unwrap(), 1);
}
