// ABOUTME: Plan generation workflow orchestration
// ABOUTME: Sequences validation, targets, generation, resolution, persistence, balancing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Plan Orchestrator
//!
//! The top-level workflow:
//!
//! ```text
//! ProfileValidated -> TargetsComputed -> TemplatesGenerated
//!   -> EntitiesResolved -> Persisted -> Balanced (meals) -> Completed | Failed
//! ```
//!
//! Each transition is an idempotent unit of work run through the external
//! durable-step substrate; replaying a completed step must not duplicate
//! persisted entities (the deduplication cache and the explicit
//! deactivate-prior-container semantics make that hold).
//!
//! Templates are generated per **day-type**, not per calendar day: an
//! eight-week plan with three training days generates three workout
//! templates and stamps them across all weeks. Generating per calendar day
//! would multiply external-service calls by the week count for no additional
//! content diversity — the batching is a cost-control design, not an
//! oversight.
//!
//! On unrecoverable failure the orchestrator records a short user-visible
//! failure, emits the failure event and terminates; containers are activated
//! only after the workflow completes, so no half-populated active container
//! can remain.

mod substrate;

pub use substrate::{InlineStepRunner, StepRunner};

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{try_join_all, BoxFuture};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::PlanConfig;
use crate::dedup::{CachedEntity, DedupCache, EntityKind};
use crate::errors::AppError;
use crate::external::LinkChecker;
use crate::intelligence::{balance_day, compute_targets};
use crate::llm::{
    ContentKind, ExerciseTemplate, GeneratedContent, MealTargetHint, MealTemplate, PromptSpec,
    StructuredGenerationClient, WorkoutTemplate,
};
use crate::models::{
    DayContent, DayUnit, Difficulty, Exercise, ExerciseUse, Ingredient, Meal, MealDay,
    MealNutrition, MealSlot, NutritionTargets, PlanContainer, PlanDuration, PlanKind, Profile,
    RecipeDetail, UnitTotals, WorkoutDay,
};
use crate::storage::{PlanStore, RecipeRecord};

/// Workflow states, in transition order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Profile loaded and structurally valid
    ProfileValidated,
    /// Nutrition targets derived
    TargetsComputed,
    /// Day-type templates generated
    TemplatesGenerated,
    /// Exercises/recipes resolved against existing records
    EntitiesResolved,
    /// Container and day units written
    Persisted,
    /// Meal days reconciled against targets
    Balanced,
    /// Workflow finished successfully
    Completed,
    /// Workflow terminated with a user-visible failure
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ProfileValidated => "profile_validated",
            Self::TargetsComputed => "targets_computed",
            Self::TemplatesGenerated => "templates_generated",
            Self::EntitiesResolved => "entities_resolved",
            Self::Persisted => "persisted",
            Self::Balanced => "balanced",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Request to generate a plan for a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Profile to plan for
    pub profile_id: Uuid,
    /// Workout or meal plan
    pub kind: PlanKind,
    /// Plan length
    pub duration: PlanDuration,
}

/// Outcome reported to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Plan generated and activated
    Success {
        /// The new active container
        container_id: Uuid,
    },
    /// Workflow terminated; a failure record was written
    Failure {
        /// Short user-visible explanation
        reason: String,
    },
}

/// Day-type templates produced by the generation step
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TemplateSet {
    Workout(Vec<(String, WorkoutTemplate)>),
    Meal(Vec<(MealSlot, MealTemplate)>),
}

/// Resolved day-type content ready for stamping
#[derive(Debug, Clone, Serialize, Deserialize)]
enum ResolvedSet {
    Workout(Vec<(String, WorkoutDay)>),
    Meal(MealDay),
}

/// Template key shared by every stamped meal day
const MEAL_DAY_KEY: &str = "meal-day";

/// Top-level plan generation workflow
pub struct PlanOrchestrator {
    store: Arc<dyn PlanStore>,
    generator: Arc<StructuredGenerationClient>,
    links: Arc<dyn LinkChecker>,
    steps: Arc<dyn StepRunner>,
    config: PlanConfig,
}

impl PlanOrchestrator {
    /// Wire an orchestrator from its collaborators
    #[must_use]
    pub fn new(
        store: Arc<dyn PlanStore>,
        generator: Arc<StructuredGenerationClient>,
        links: Arc<dyn LinkChecker>,
        steps: Arc<dyn StepRunner>,
        config: PlanConfig,
    ) -> Self {
        Self {
            store,
            generator,
            links,
            steps,
            config,
        }
    }

    /// Standalone target computation for pre-flight validation by the UI.
    ///
    /// # Errors
    ///
    /// Returns `MissingBiometrics` for incomplete assessments and
    /// `ResourceNotFound` for unknown profiles.
    pub async fn compute_targets(&self, profile_id: Uuid) -> Result<NutritionTargets, AppError> {
        let profile = self
            .store
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::not_found("profile"))?;
        compute_targets(&profile, &self.config.nutrition)
    }

    /// Run the full plan generation workflow for a profile.
    ///
    /// Always resolves to an outcome: unrecoverable workflow errors are
    /// recorded as user-visible failures, not returned as `Err`. An `Err`
    /// here means the failure itself could not be recorded.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the failure record cannot be written.
    pub async fn generate_plan(&self, request: PlanRequest) -> Result<PlanOutcome, AppError> {
        let budget = Duration::from_secs(self.config.generation.workflow_timeout_secs);

        let outcome = match tokio::time::timeout(budget, self.run_workflow(&request)).await {
            Ok(Ok(container_id)) => {
                info!(state = %WorkflowState::Completed, %container_id, "plan generation finished");
                self.steps
                    .send_event("plan.completed", json!({ "container_id": container_id }))
                    .await?;
                PlanOutcome::Success { container_id }
            }
            Ok(Err(err)) => self.fail(&request, err).await?,
            Err(_elapsed) => {
                let err = AppError::generation_failed(format!(
                    "workflow exceeded its {}s wall-clock budget",
                    budget.as_secs()
                ));
                self.fail(&request, err).await?
            }
        };

        Ok(outcome)
    }

    /// Re-run generation and balancing for one day unit and every other unit
    /// sharing its logical identity, leaving the rest of the container
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown containers/units and
    /// `GenerationFailed` when the replacement content cannot be produced.
    pub async fn regenerate_single_unit(
        &self,
        container_id: Uuid,
        unit_id: Uuid,
    ) -> Result<Vec<DayUnit>, AppError> {
        let container = self
            .store
            .get_container(container_id)
            .await?
            .ok_or_else(|| AppError::not_found("plan container"))?;
        let profile = self
            .store
            .get_profile(container.profile_id)
            .await?
            .ok_or_else(|| AppError::not_found("profile"))?;

        let units = self.store.day_units_for_container(container_id).await?;
        let target_unit = units
            .iter()
            .find(|u| u.id == unit_id)
            .ok_or_else(|| AppError::not_found("day unit"))?
            .clone();

        // Names from the rest of the container feed the avoid-list so the
        // replacement is actually new content
        let avoid_names = existing_names(&units, &target_unit.template_key);
        let dedup = DedupCache::new(self.store.clone());

        let (content, totals) = match &target_unit.content {
            DayContent::Workout(_) => {
                let spec = self.workout_spec(&profile, &target_unit.template_key, avoid_names);
                let template = expect_workout(self.generator.generate(&spec).await?)?;
                let day = self.resolve_workout(&dedup, &template).await?;
                let totals = workout_totals(&day);
                (DayContent::Workout(day), totals)
            }
            DayContent::Meals(_) => {
                let targets = compute_targets(&profile, &self.config.nutrition)?;
                let templates = self
                    .generate_meal_templates(&profile, &targets, &avoid_names)
                    .await?;
                let day = self.resolve_meals(&dedup, templates).await?;
                let balanced = balance_day(day.meals, &targets, &self.config.balancing);
                let totals = meal_totals(&balanced.meals);
                (
                    DayContent::Meals(MealDay {
                        meals: balanced.meals,
                    }),
                    totals,
                )
            }
        };

        let mut replacements = Vec::new();
        for unit in units {
            if unit.template_key == target_unit.template_key {
                let mut updated = unit;
                updated.content = content.clone();
                updated.totals = totals;
                self.store.update_day_unit(&updated).await?;
                replacements.push(updated);
            }
        }

        Ok(replacements)
    }

    // ========================================================================
    // Workflow
    // ========================================================================

    async fn run_workflow(&self, request: &PlanRequest) -> Result<Uuid, AppError> {
        let dedup = DedupCache::new(self.store.clone());

        let profile: Profile = self
            .step("validate-profile", self.validate_profile(request))
            .await?;
        info!(state = %WorkflowState::ProfileValidated, profile_id = %profile.id, "workflow advanced");

        let targets: NutritionTargets = self
            .step("compute-targets", async {
                compute_targets(&profile, &self.config.nutrition)
            })
            .await?;
        info!(state = %WorkflowState::TargetsComputed, calories = targets.calories_per_day, "workflow advanced");

        let templates: TemplateSet = self
            .step(
                "generate-templates",
                self.generate_templates(request, &profile, &targets),
            )
            .await?;
        info!(state = %WorkflowState::TemplatesGenerated, "workflow advanced");

        // Entity resolution is serialized per run: the session tier of the
        // deduplication cache has a single-writer discipline
        let resolved: ResolvedSet = self
            .step("resolve-entities", self.resolve_entities(&dedup, templates))
            .await?;
        info!(state = %WorkflowState::EntitiesResolved, "workflow advanced");

        let container_id: Uuid = self
            .step("persist", self.persist(request, &resolved))
            .await?;
        info!(state = %WorkflowState::Persisted, %container_id, "workflow advanced");

        if request.kind == PlanKind::Meal {
            let _: u32 = self
                .step("balance", self.balance_units(container_id, &targets))
                .await?;
            info!(state = %WorkflowState::Balanced, "workflow advanced");
        }

        // Activation comes last so a failed run never leaves a half-populated
        // active container behind
        self.store
            .activate_container(container_id, request.profile_id, request.kind)
            .await?;

        Ok(container_id)
    }

    async fn validate_profile(&self, request: &PlanRequest) -> Result<Profile, AppError> {
        let profile = self
            .store
            .get_profile(request.profile_id)
            .await?
            .ok_or_else(|| AppError::not_found("profile"))?;

        if request.kind == PlanKind::Workout && profile.available_days.is_empty() {
            return Err(AppError::invalid_input(
                "at least one available training day is required for a workout plan",
            ));
        }
        if request.duration.days() == 0 {
            return Err(AppError::invalid_input("plan duration must be positive"));
        }

        Ok(profile)
    }

    /// Generate one template per day-type, concurrently. Day-types share no
    /// mutable state beyond read access to the profile.
    async fn generate_templates(
        &self,
        request: &PlanRequest,
        profile: &Profile,
        targets: &NutritionTargets,
    ) -> Result<TemplateSet, AppError> {
        match request.kind {
            PlanKind::Workout => {
                let mut days = profile.available_days.clone();
                days.sort_unstable();
                days.dedup();

                let generations = days.iter().map(|day| {
                    let spec = self.workout_spec(profile, day.label(), Vec::new());
                    async move {
                        let content = self.generator.generate(&spec).await?;
                        Ok::<_, AppError>((day.label().to_owned(), expect_workout(content)?))
                    }
                });
                Ok(TemplateSet::Workout(try_join_all(generations).await?))
            }
            PlanKind::Meal => {
                let templates = self
                    .generate_meal_templates(profile, targets, &[])
                    .await?;
                Ok(TemplateSet::Meal(templates))
            }
        }
    }

    async fn generate_meal_templates(
        &self,
        profile: &Profile,
        targets: &NutritionTargets,
        avoid_names: &[String],
    ) -> Result<Vec<(MealSlot, MealTemplate)>, AppError> {
        let split = &self.config.nutrition.meal_split;
        let generations = MealSlot::ALL.into_iter().map(|slot| {
            let share = match slot {
                MealSlot::Breakfast => split.breakfast,
                MealSlot::Lunch => split.lunch,
                MealSlot::Snack => split.snack,
                MealSlot::Dinner => split.dinner,
            };
            let slot_targets = targets.share(share);
            let spec = PromptSpec {
                kind: ContentKind::Meal,
                subject: slot.label().to_owned(),
                equipment: Vec::new(),
                injuries: None,
                dietary_restrictions: profile
                    .dietary_restrictions
                    .iter()
                    .map(crate::models::DietaryRestriction::label)
                    .collect(),
                cuisine_preferences: profile.cuisine_preferences.clone(),
                experience: None,
                avoid_names: avoid_names.to_vec(),
                meal_targets: Some(MealTargetHint {
                    calories: f64::from(slot_targets.calories_per_day),
                    protein_g: slot_targets.protein_per_day_g,
                    carbs_g: slot_targets.carbs_per_day_g,
                    fat_g: slot_targets.fat_per_day_g,
                }),
                prep_time_budget_mins: profile.prep_time_budget_mins,
            };
            async move {
                let content = self.generator.generate(&spec).await?;
                Ok::<_, AppError>((slot, expect_meal(content)?))
            }
        });
        try_join_all(generations).await
    }

    fn workout_spec(
        &self,
        profile: &Profile,
        day_label: &str,
        avoid_names: Vec<String>,
    ) -> PromptSpec {
        PromptSpec {
            kind: ContentKind::Workout,
            subject: format!("{day_label} workout"),
            equipment: profile.equipment.clone(),
            injuries: profile.injuries.clone(),
            dietary_restrictions: Vec::new(),
            cuisine_preferences: Vec::new(),
            experience: Some(profile.experience),
            avoid_names,
            meal_targets: None,
            prep_time_budget_mins: None,
        }
    }

    async fn resolve_entities(
        &self,
        dedup: &DedupCache,
        templates: TemplateSet,
    ) -> Result<ResolvedSet, AppError> {
        match templates {
            TemplateSet::Workout(days) => {
                let mut resolved = Vec::with_capacity(days.len());
                for (key, template) in days {
                    let day = self.resolve_workout(dedup, &template).await?;
                    resolved.push((key, day));
                }
                Ok(ResolvedSet::Workout(resolved))
            }
            TemplateSet::Meal(slots) => {
                let day = self.resolve_meals(dedup, slots).await?;
                Ok(ResolvedSet::Meal(day))
            }
        }
    }

    async fn resolve_workout(
        &self,
        dedup: &DedupCache,
        template: &WorkoutTemplate,
    ) -> Result<WorkoutDay, AppError> {
        let mut exercises = Vec::with_capacity(template.exercises.len());
        for exercise in &template.exercises {
            let entity = self.resolve_exercise(dedup, exercise).await?;
            exercises.push(ExerciseUse {
                exercise_id: entity.id,
                name: entity.canonical_name,
                sets: exercise.sets,
                reps: exercise.reps,
                duration_secs: exercise.duration_secs,
                weight_kg: exercise.weight_kg,
                rest_secs: exercise.rest_secs,
            });
        }
        Ok(WorkoutDay {
            name: template.name.clone(),
            description: template.description.clone(),
            exercises,
        })
    }

    async fn resolve_exercise(
        &self,
        dedup: &DedupCache,
        template: &ExerciseTemplate,
    ) -> Result<CachedEntity, AppError> {
        if let Some(existing) = dedup
            .resolve(
                EntityKind::Exercise,
                &template.name,
                template.alternate_name.as_deref(),
            )
            .await?
        {
            // Already-known entities were validated when first created;
            // skipping the link check here is the cache's main cost saving
            return Ok(existing);
        }

        // Definitive miss: create the record, validating external resources
        // exactly once
        let video_validated = match &template.video_url {
            Some(url) => match self.links.validate(url).await {
                Ok(live) => live,
                Err(err) => {
                    warn!(url = %url, error = %err, "link check failed; keeping link unvalidated");
                    false
                }
            },
            None => false,
        };
        let video_url = template
            .video_url
            .clone()
            .filter(|_| video_validated);

        let exercise = Exercise {
            id: Uuid::new_v4(),
            name: template.name.clone(),
            alternate_name: template.alternate_name.clone(),
            description: template.description.clone().unwrap_or_default(),
            difficulty: template.difficulty.unwrap_or(Difficulty::Intermediate),
            video_url,
            video_validated,
            created_at: chrono::Utc::now(),
        };
        self.store.insert_exercise(&exercise).await?;

        let entity = CachedEntity {
            id: exercise.id,
            canonical_name: exercise.name.clone(),
            validated: true,
        };
        dedup
            .remember(EntityKind::Exercise, &template.name, entity.clone())
            .await;
        Ok(entity)
    }

    async fn resolve_meals(
        &self,
        dedup: &DedupCache,
        templates: Vec<(MealSlot, MealTemplate)>,
    ) -> Result<MealDay, AppError> {
        let mut meals = Vec::with_capacity(templates.len());
        for (slot, template) in templates {
            let detail = RecipeDetail {
                ingredients: template
                    .ingredients
                    .iter()
                    .map(|i| Ingredient {
                        name: i.name.clone(),
                        amount: i.amount,
                        unit: i.unit,
                    })
                    .collect(),
                instructions: template.instructions.clone(),
                tags: template.tags.clone(),
            };

            let recipe_id = match dedup.resolve(EntityKind::Recipe, &template.name, None).await? {
                Some(existing) => existing.id,
                None => {
                    let record = RecipeRecord {
                        id: Uuid::new_v4(),
                        name: template.name.clone(),
                        detail: detail.clone(),
                        created_at: chrono::Utc::now(),
                    };
                    self.store.insert_recipe(&record).await?;
                    dedup
                        .remember(
                            EntityKind::Recipe,
                            &template.name,
                            CachedEntity {
                                id: record.id,
                                canonical_name: record.name.clone(),
                                validated: true,
                            },
                        )
                        .await;
                    record.id
                }
            };

            meals.push(Meal {
                name: template.name,
                description: template.description,
                slot,
                recipe_id: Some(recipe_id),
                recipe: detail,
                nutrition: MealNutrition {
                    calories: template.calories,
                    protein_g: template.protein_g,
                    carbs_g: template.carbs_g,
                    fat_g: template.fat_g,
                },
                supplement: None,
            });
        }
        Ok(MealDay { meals })
    }

    /// Create the container (inactive) and stamp day units across the plan.
    /// Unit writes are issued concurrently; references are already resolved.
    async fn persist(
        &self,
        request: &PlanRequest,
        resolved: &ResolvedSet,
    ) -> Result<Uuid, AppError> {
        let container = PlanContainer {
            id: Uuid::new_v4(),
            profile_id: request.profile_id,
            kind: request.kind,
            duration: request.duration,
            active: false,
            created_at: chrono::Utc::now(),
        };
        self.store.insert_container(&container).await?;

        let mut units = Vec::new();
        match resolved {
            ResolvedSet::Workout(days) => {
                for week in 1..=request.duration.weeks() {
                    for (index, (key, day)) in days.iter().enumerate() {
                        units.push(DayUnit {
                            id: Uuid::new_v4(),
                            container_id: container.id,
                            week_number: week,
                            day_index: index as u32,
                            template_key: key.clone(),
                            content: DayContent::Workout(day.clone()),
                            totals: workout_totals(day),
                        });
                    }
                }
            }
            ResolvedSet::Meal(day) => {
                for offset in 0..request.duration.days() {
                    units.push(DayUnit {
                        id: Uuid::new_v4(),
                        container_id: container.id,
                        week_number: offset / 7 + 1,
                        day_index: offset % 7,
                        template_key: MEAL_DAY_KEY.to_owned(),
                        content: DayContent::Meals(day.clone()),
                        totals: meal_totals(&day.meals),
                    });
                }
            }
        }

        try_join_all(units.iter().map(|unit| self.store.insert_day_unit(unit))).await?;
        Ok(container.id)
    }

    /// Balance each distinct meal day-type once, then stamp the result onto
    /// every unit sharing that template. Returns the number of updated units.
    async fn balance_units(
        &self,
        container_id: Uuid,
        targets: &NutritionTargets,
    ) -> Result<u32, AppError> {
        let units = self.store.day_units_for_container(container_id).await?;

        let Some(sample) = units.iter().find_map(|unit| match &unit.content {
            DayContent::Meals(day) => Some(day.clone()),
            DayContent::Workout(_) => None,
        }) else {
            return Ok(0);
        };

        let balanced = balance_day(sample.meals, targets, &self.config.balancing);
        if !balanced.unmatched_ingredients.is_empty() {
            warn!(
                unmatched = balanced.unmatched_ingredients.len(),
                "day balanced with unmatched ingredients"
            );
        }
        let content = DayContent::Meals(MealDay {
            meals: balanced.meals,
        });
        let totals = match &content {
            DayContent::Meals(day) => meal_totals(&day.meals),
            DayContent::Workout(_) => UnitTotals::default(),
        };

        let updated: Vec<DayUnit> = units
            .into_iter()
            .map(|mut unit| {
                unit.content = content.clone();
                unit.totals = totals;
                unit
            })
            .collect();
        try_join_all(updated.iter().map(|unit| self.store.update_day_unit(unit))).await?;

        Ok(updated.len() as u32)
    }

    async fn fail(
        &self,
        request: &PlanRequest,
        err: AppError,
    ) -> Result<PlanOutcome, AppError> {
        let reason = err.user_message();
        error!(
            state = %WorkflowState::Failed,
            profile_id = %request.profile_id,
            error = %err,
            diagnostic = err.diagnostic.as_deref().unwrap_or(""),
            "plan generation failed"
        );
        self.store
            .record_generation_failure(request.profile_id, &reason)
            .await?;
        self.steps
            .send_event(
                "plan.failed",
                json!({ "profile_id": request.profile_id, "reason": reason }),
            )
            .await?;
        Ok(PlanOutcome::Failure { reason })
    }

    /// Run a future as a named durable step, serializing its result through
    /// the substrate so a durable implementation can persist and replay it.
    async fn step<T, Fut>(&self, name: &str, fut: Fut) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned + Send,
        Fut: Future<Output = Result<T, AppError>> + Send,
    {
        let boxed: BoxFuture<'_, Result<Value, AppError>> = Box::pin(async move {
            let output = fut.await?;
            serde_json::to_value(output).map_err(AppError::from)
        });
        let value = self.steps.run_step(name, boxed).await?;
        serde_json::from_value(value).map_err(AppError::from)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn expect_workout(content: GeneratedContent) -> Result<WorkoutTemplate, AppError> {
    match content {
        GeneratedContent::Workout(template) => Ok(template),
        GeneratedContent::Meal(_) => Err(AppError::internal(
            "generator returned a meal where a workout was requested",
        )),
    }
}

fn expect_meal(content: GeneratedContent) -> Result<MealTemplate, AppError> {
    match content {
        GeneratedContent::Meal(template) => Ok(template),
        GeneratedContent::Workout(_) => Err(AppError::internal(
            "generator returned a workout where a meal was requested",
        )),
    }
}

/// Names already present in the container, excluding the regenerated key
fn existing_names(units: &[DayUnit], exclude_key: &str) -> Vec<String> {
    let mut names = Vec::new();
    for unit in units {
        if unit.template_key == exclude_key {
            continue;
        }
        match &unit.content {
            DayContent::Workout(day) => names.push(day.name.clone()),
            DayContent::Meals(day) => names.extend(day.meals.iter().map(|m| m.name.clone())),
        }
    }
    names.sort_unstable();
    names.dedup();
    names
}

/// Rough session length: explicit durations, or sets x (reps + rest)
fn workout_totals(day: &WorkoutDay) -> UnitTotals {
    let mut seconds: u32 = 0;
    for exercise in &day.exercises {
        if let Some(duration) = exercise.duration_secs {
            seconds += duration;
        } else {
            let sets = exercise.sets.unwrap_or(3);
            let reps = exercise.reps.unwrap_or(10);
            let rest = exercise.rest_secs.unwrap_or(60);
            // ~4 seconds per repetition
            seconds += sets * (reps * 4 + rest);
        }
    }
    UnitTotals {
        duration_mins: Some(seconds.div_ceil(60)),
        ..UnitTotals::default()
    }
}

fn meal_totals(meals: &[Meal]) -> UnitTotals {
    let mut totals = UnitTotals::default();
    for meal in meals {
        totals.calories += meal.nutrition.calories;
        totals.protein_g += meal.nutrition.protein_g;
        totals.carbs_g += meal.nutrition.carbs_g;
        totals.fat_g += meal.nutrition.fat_g;
    }
    totals
}
