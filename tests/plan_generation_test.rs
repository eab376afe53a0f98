// ABOUTME: End-to-end plan generation workflow tests
// ABOUTME: Covers day-type batching, deduplication, balancing, activation and failure paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! Full-workflow tests over the in-memory store and a scripted completion
//! provider: no network, no real model.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use fitplan::config::PlanConfig;
use fitplan::external::AcceptAllLinks;
use fitplan::llm::StructuredGenerationClient;
use fitplan::models::{DayContent, PlanDuration, PlanKind, SupplementKind};
use fitplan::orchestrator::{InlineStepRunner, PlanOrchestrator, PlanOutcome, PlanRequest};
use fitplan::storage::{InMemoryStore, PlanStore};

use common::{profile, RoutingProvider};

fn orchestrator(
    store: Arc<InMemoryStore>,
    provider: Arc<RoutingProvider>,
) -> PlanOrchestrator {
    let config = PlanConfig::default();
    let generator = Arc::new(StructuredGenerationClient::new(
        provider,
        config.generation.clone(),
    ));
    PlanOrchestrator::new(
        store,
        generator,
        Arc::new(AcceptAllLinks),
        Arc::new(InlineStepRunner),
        config,
    )
}

#[tokio::test]
async fn workout_plan_generates_per_day_type_and_stamps_weeks() {
    let store = Arc::new(InMemoryStore::new());
    let provider = Arc::new(RoutingProvider::new());
    let user = profile();
    store.upsert_profile(&user).await.unwrap();

    let outcome = orchestrator(store.clone(), provider.clone())
        .generate_plan(PlanRequest {
            profile_id: user.id,
            kind: PlanKind::Workout,
            duration: PlanDuration::Weeks(8),
        })
        .await
        .unwrap();

    let PlanOutcome::Success { container_id } = outcome else {
        panic!("expected success");
    };

    // 3 available days -> exactly 3 generator calls, not 24
    assert_eq!(provider.call_count(), 3);

    // ...but 8 weeks x 3 days of stamped units
    let units = store.day_units_for_container(container_id).await.unwrap();
    assert_eq!(units.len(), 24);

    // Units from the same day-type share identical content
    let monday_units: Vec<_> = units
        .iter()
        .filter(|u| u.template_key == "monday")
        .collect();
    assert_eq!(monday_units.len(), 8);
    assert!(monday_units
        .windows(2)
        .all(|pair| pair[0].content == pair[1].content));

    // Container is active after completion
    assert!(store.get_container(container_id).await.unwrap().unwrap().active);
}

#[tokio::test]
async fn shared_exercise_resolves_to_one_record_across_day_types() {
    let store = Arc::new(InMemoryStore::new());
    let provider = Arc::new(RoutingProvider::new());
    let user = profile();
    store.upsert_profile(&user).await.unwrap();

    orchestrator(store.clone(), provider)
        .generate_plan(PlanRequest {
            profile_id: user.id,
            kind: PlanKind::Workout,
            duration: PlanDuration::Weeks(4),
        })
        .await
        .unwrap();

    // Every day-type template contains "Push-Up"; dedup must create exactly
    // one record for it, plus one per distinct day-type squat
    let push_up = store.find_exercise_by_name("push-up").await.unwrap();
    assert!(push_up.is_some());
    assert_eq!(store.count_exercises().await.unwrap(), 1 + 3);
}

#[tokio::test]
async fn second_run_for_another_user_creates_no_duplicate_exercises() {
    let store = Arc::new(InMemoryStore::new());
    let user_a = profile();
    let user_b = profile();
    store.upsert_profile(&user_a).await.unwrap();
    store.upsert_profile(&user_b).await.unwrap();

    for user in [&user_a, &user_b] {
        orchestrator(store.clone(), Arc::new(RoutingProvider::new()))
            .generate_plan(PlanRequest {
                profile_id: user.id,
                kind: PlanKind::Workout,
                duration: PlanDuration::Weeks(2),
            })
            .await
            .unwrap();
    }

    // The second orchestration run resolves every name against history
    // instead of re-creating records
    assert_eq!(store.count_exercises().await.unwrap(), 4);
}

#[tokio::test]
async fn meal_plan_is_balanced_and_carries_computed_totals() {
    let store = Arc::new(InMemoryStore::new());
    let provider = Arc::new(RoutingProvider::new());
    let user = profile();
    store.upsert_profile(&user).await.unwrap();

    let orchestrator = orchestrator(store.clone(), provider.clone());
    let targets = orchestrator.compute_targets(user.id).await.unwrap();

    let outcome = orchestrator
        .generate_plan(PlanRequest {
            profile_id: user.id,
            kind: PlanKind::Meal,
            duration: PlanDuration::Days(14),
        })
        .await
        .unwrap();

    let PlanOutcome::Success { container_id } = outcome else {
        panic!("expected success");
    };

    // 4 meal slots -> 4 generator calls regardless of day count
    assert_eq!(provider.call_count(), 4);

    let units = store.day_units_for_container(container_id).await.unwrap();
    assert_eq!(units.len(), 14);

    for unit in &units {
        let DayContent::Meals(day) = &unit.content else {
            panic!("expected meal content");
        };

        // Convergence bounds hold after the single balancing pass
        assert!(unit.totals.carbs_g <= targets.carbs_per_day_g * 1.2 * 1.05);
        assert!(unit.totals.fat_g <= targets.fat_per_day_g * 1.3 * 1.05);

        // Never more than two supplement entries on a day
        let supplements = day.meals.iter().filter(|m| m.supplement.is_some()).count();
        assert!(supplements <= 2);

        // Retraction invariant: a surviving protein supplement means protein
        // stayed within the overshoot band
        if day
            .meals
            .iter()
            .any(|m| m.supplement == Some(SupplementKind::Protein))
        {
            assert!(unit.totals.protein_g <= targets.protein_per_day_g * 1.1 + 1e-9);
        }

        // Denormalized totals match the summed meal nutrition
        let summed: f64 = day.meals.iter().map(|m| m.nutrition.calories).sum();
        assert!((unit.totals.calories - summed).abs() < 1e-6);
    }
}

#[tokio::test]
async fn missing_biometrics_fails_with_user_visible_record() {
    let store = Arc::new(InMemoryStore::new());
    let mut user = profile();
    user.weight_kg = None;
    store.upsert_profile(&user).await.unwrap();

    let outcome = orchestrator(store.clone(), Arc::new(RoutingProvider::new()))
        .generate_plan(PlanRequest {
            profile_id: user.id,
            kind: PlanKind::Meal,
            duration: PlanDuration::Days(7),
        })
        .await
        .unwrap();

    let PlanOutcome::Failure { reason } = outcome else {
        panic!("expected failure");
    };
    // The biometric fault is surfaced verbatim, not as a generic retry prompt
    assert!(reason.contains("weight"));

    // A user-visible failure record exists and no container was activated
    let failures = store.generation_failures(user.id).await.unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].reason.contains("weight"));
}

#[tokio::test]
async fn activating_a_new_plan_deactivates_the_previous_one() {
    let store = Arc::new(InMemoryStore::new());
    let user = profile();
    store.upsert_profile(&user).await.unwrap();

    let mut container_ids = Vec::new();
    for _ in 0..2 {
        let outcome = orchestrator(store.clone(), Arc::new(RoutingProvider::new()))
            .generate_plan(PlanRequest {
                profile_id: user.id,
                kind: PlanKind::Workout,
                duration: PlanDuration::Weeks(1),
            })
            .await
            .unwrap();
        let PlanOutcome::Success { container_id } = outcome else {
            panic!("expected success");
        };
        container_ids.push(container_id);
    }

    let first = store.get_container(container_ids[0]).await.unwrap().unwrap();
    let second = store.get_container(container_ids[1]).await.unwrap().unwrap();
    assert!(!first.active);
    assert!(second.active);
}

#[tokio::test]
async fn regenerating_one_unit_replaces_all_of_its_occurrences() {
    let store = Arc::new(InMemoryStore::new());
    let user = profile();
    store.upsert_profile(&user).await.unwrap();

    let orchestrator = orchestrator(store.clone(), Arc::new(RoutingProvider::new()));
    let outcome = orchestrator
        .generate_plan(PlanRequest {
            profile_id: user.id,
            kind: PlanKind::Workout,
            duration: PlanDuration::Weeks(4),
        })
        .await
        .unwrap();
    let PlanOutcome::Success { container_id } = outcome else {
        panic!("expected success");
    };

    let units = store.day_units_for_container(container_id).await.unwrap();
    let target = units
        .iter()
        .find(|u| u.template_key == "wednesday")
        .unwrap()
        .clone();
    let untouched_before: Vec<_> = units
        .iter()
        .filter(|u| u.template_key == "monday")
        .cloned()
        .collect();

    let replacements = orchestrator
        .regenerate_single_unit(container_id, target.id)
        .await
        .unwrap();

    // Every Wednesday occurrence across the 4 weeks was replaced
    assert_eq!(replacements.len(), 4);
    assert!(replacements
        .iter()
        .all(|u| u.template_key == "wednesday"));

    // Other day-types were left untouched
    let after = store.day_units_for_container(container_id).await.unwrap();
    for before in untouched_before {
        let now = after.iter().find(|u| u.id == before.id).unwrap();
        assert_eq!(now.content, before.content);
    }
}
