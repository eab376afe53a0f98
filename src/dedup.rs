// ABOUTME: Two-tier deduplication cache for exercises and recipes
// ABOUTME: Session map first, then persistent-store lookups with synonym normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Deduplication Cache
//!
//! Resolves "is this entity already known" before anything creates a new one.
//! Tier one is an in-memory map scoped to a single orchestration run; tier
//! two queries the persistent store — case-insensitive exact match on the
//! primary name, then the alternate name, then a fixed synonym table — before
//! declaring a definitive miss.
//!
//! A session-tier hit also means the entity's external resources (video
//! links) were validated when it was first created, so callers skip
//! re-validation. That saved work is the main purpose of the cache; this is
//! what keeps an eight-week plan from re-checking the same push-up video
//! dozens of times, and from creating dozens of near-identical records.
//!
//! The cache is an explicit object passed by handle into every step that
//! resolves entities. Its lifetime is exactly one plan generation run; it is
//! never a process-wide singleton. Writers go through one async lock, which
//! is the single-writer discipline the session tier requires.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::PlanStore;

/// Entity kinds the cache can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Shared exercise records
    Exercise,
    /// Shared recipe records
    Recipe,
}

/// A resolved entity reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntity {
    /// Stored record id
    pub id: Uuid,
    /// Canonical stored name
    pub canonical_name: String,
    /// Whether external resources attached to the entity have already passed
    /// liveness validation; callers skip re-checking when true
    pub validated: bool,
}

/// Fixed synonym normalizations for common exercise names, including the
/// Czech aliases the assessment language produces.
static EXERCISE_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("klik", "push-up"),
        ("kliky", "push-up"),
        ("press-up", "push-up"),
        ("press-ups", "push-up"),
        ("push up", "push-up"),
        ("push-ups", "push-up"),
        ("dřep", "squat"),
        ("dřepy", "squat"),
        ("shyb", "pull-up"),
        ("shyby", "pull-up"),
        ("pull up", "pull-up"),
        ("pull-ups", "pull-up"),
        ("chin-up", "pull-up"),
        ("mrtvý tah", "deadlift"),
        ("prkno", "plank"),
        ("výpad", "lunge"),
        ("výpady", "lunge"),
        ("angličák", "burpee"),
        ("angličáky", "burpee"),
    ])
});

/// Two-tier deduplication cache, scoped to one orchestration run
pub struct DedupCache {
    store: Arc<dyn PlanStore>,
    session: RwLock<HashMap<(EntityKind, String), CachedEntity>>,
}

impl DedupCache {
    /// Create a cache over the given store
    #[must_use]
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self {
            store,
            session: RwLock::new(HashMap::new()),
        }
    }

    fn session_key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Resolve a name to an already-known entity, or `None` on a definitive
    /// miss.
    ///
    /// Resolution is stable within one run: once a name resolves (or is
    /// remembered), every later call with the same name returns the same
    /// entity, regardless of concurrent store activity.
    ///
    /// # Errors
    ///
    /// Propagates store failures as `DatabaseError`.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        name: &str,
        alternate: Option<&str>,
    ) -> Result<Option<CachedEntity>, AppError> {
        let key = Self::session_key(name);

        if let Some(hit) = self.session.read().await.get(&(kind, key.clone())) {
            return Ok(Some(hit.clone()));
        }

        let Some(found) = self.resolve_from_store(kind, &key, alternate).await? else {
            return Ok(None);
        };

        // Store-tier hits were validated when first created; cache them so
        // the rest of the run stays on the session tier.
        let mut session = self.session.write().await;
        let entity = session
            .entry((kind, key))
            .or_insert_with(|| found.clone())
            .clone();
        Ok(Some(entity))
    }

    async fn resolve_from_store(
        &self,
        kind: EntityKind,
        key: &str,
        alternate: Option<&str>,
    ) -> Result<Option<CachedEntity>, AppError> {
        match kind {
            EntityKind::Exercise => {
                if let Some(found) = self.store.find_exercise_by_name(key).await? {
                    return Ok(Some(Self::from_exercise(&found)));
                }
                if let Some(alt) = alternate {
                    if let Some(found) = self.store.find_exercise_by_name(alt).await? {
                        return Ok(Some(Self::from_exercise(&found)));
                    }
                    if let Some(found) = self.store.find_exercise_by_alternate(alt).await? {
                        return Ok(Some(Self::from_exercise(&found)));
                    }
                }
                if let Some(found) = self.store.find_exercise_by_alternate(key).await? {
                    return Ok(Some(Self::from_exercise(&found)));
                }
                if let Some(canonical) = EXERCISE_SYNONYMS.get(key) {
                    if let Some(found) = self.store.find_exercise_by_name(canonical).await? {
                        return Ok(Some(Self::from_exercise(&found)));
                    }
                }
                Ok(None)
            }
            EntityKind::Recipe => {
                let found = self.store.find_recipe_by_name(key).await?;
                Ok(found.map(|recipe| CachedEntity {
                    id: recipe.id,
                    canonical_name: recipe.name,
                    validated: true,
                }))
            }
        }
    }

    fn from_exercise(exercise: &crate::models::Exercise) -> CachedEntity {
        CachedEntity {
            id: exercise.id,
            canonical_name: exercise.name.clone(),
            validated: true,
        }
    }

    /// Remember a freshly created entity so every later lookup in this run —
    /// across days and weeks — resolves to the same record.
    pub async fn remember(&self, kind: EntityKind, name: &str, entity: CachedEntity) {
        let mut session = self.session.write().await;
        session.insert((kind, Self::session_key(name)), entity.clone());
        // The synonym's canonical form points at the same record, so a later
        // template using the canonical name also hits the session tier.
        if kind == EntityKind::Exercise {
            if let Some(canonical) = EXERCISE_SYNONYMS.get(Self::session_key(name).as_str()) {
                session.insert((kind, (*canonical).to_owned()), entity);
            }
        }
    }

    /// Number of entities currently in the session tier (diagnostics)
    pub async fn session_len(&self) -> usize {
        self.session.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::storage::InMemoryStore;
    use chrono::Utc;

    fn exercise(name: &str) -> crate::models::Exercise {
        crate::models::Exercise {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            alternate_name: None,
            description: String::new(),
            difficulty: Difficulty::Beginner,
            video_url: Some("https://example.com/video".to_owned()),
            video_validated: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn session_tier_wins_over_store() {
        let store = Arc::new(InMemoryStore::new());
        let cache = DedupCache::new(store.clone());

        let remembered = CachedEntity {
            id: Uuid::new_v4(),
            canonical_name: "Push-Up".to_owned(),
            validated: true,
        };
        cache
            .remember(EntityKind::Exercise, "Push-Up", remembered.clone())
            .await;

        // A conflicting store record must not shadow the session entry
        store.insert_exercise(&exercise("push-up")).await.unwrap();

        let resolved = cache
            .resolve(EntityKind::Exercise, "  PUSH-UP ", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, remembered.id);
    }

    #[tokio::test]
    async fn store_misses_fall_through_synonyms() {
        let store = Arc::new(InMemoryStore::new());
        let stored = exercise("Push-Up");
        store.insert_exercise(&stored).await.unwrap();

        let cache = DedupCache::new(store);
        let resolved = cache
            .resolve(EntityKind::Exercise, "kliky", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, stored.id);
    }

    #[tokio::test]
    async fn definitive_miss_returns_none() {
        let cache = DedupCache::new(Arc::new(InMemoryStore::new()));
        let resolved = cache
            .resolve(EntityKind::Exercise, "one-arm handstand push-up", None)
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn resolution_is_stable_across_repeated_lookups() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_exercise(&exercise("Squat")).await.unwrap();

        let cache = DedupCache::new(store.clone());
        let first = cache
            .resolve(EntityKind::Exercise, "squat", None)
            .await
            .unwrap()
            .unwrap();

        // Even if the store changes underneath, the run keeps its resolution
        store.insert_exercise(&exercise("Squat")).await.unwrap();
        let second = cache
            .resolve(EntityKind::Exercise, "SQUAT", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id, second.id);
    }
}
