// ABOUTME: Main library entry point for the Fitplan generation engine
// ABOUTME: Wires nutrition science, LLM generation, deduplication and plan orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

#![deny(unsafe_code)]

//! # Fitplan Generation Engine
//!
//! The machinery behind personalized fitness plans: turns a user's assessment
//! answers into a multi-week workout plan and a calorie/macro-accurate meal
//! plan by repeatedly calling a generative text completion service, validating
//! and repairing its output, reconciling it against numeric nutrition targets,
//! and deduplicating recurring entities (exercises, recipes).
//!
//! ## Architecture
//!
//! - **`intelligence`**: deterministic nutrition science — BMR/TDEE targets
//!   and the portion balancing pipeline
//! - **`llm`**: structured generation — prompt construction, JSON extraction
//!   and repair, schema validation, bounded retry with refusal escalation
//! - **`dedup`**: two-tier entity resolution (session map + persistent store)
//! - **`storage`**: persistent store seam with SQLite and in-memory backends
//! - **`orchestrator`**: the workflow that sequences validation, generation,
//!   resolution, persistence and balancing into durable, replayable steps
//!
//! ## Example
//!
//! ```rust,no_run
//! use fitplan::models::Profile;
//! use fitplan::config::PlanConfig;
//! use fitplan::intelligence::compute_targets;
//!
//! fn preflight(profile: &Profile) {
//!     let config = PlanConfig::default();
//!     match compute_targets(profile, &config.nutrition) {
//!         Ok(targets) => println!("{} kcal/day", targets.calories_per_day),
//!         Err(err) => eprintln!("complete your assessment: {err}"),
//!     }
//! }
//! ```

/// Layered configuration: nutrition coefficients, balancing thresholds,
/// generation retry and temperature settings
pub mod config;

/// Orchestration-run-scoped deduplication cache for exercises and recipes
pub mod dedup;

/// Unified error handling with a closed error-code taxonomy
pub mod errors;

/// External collaborator seams (resource liveness checking)
pub mod external;

/// Nutrition target calculation and portion balancing
pub mod intelligence;

/// Structured generation client over the text-completion capability
pub mod llm;

/// Domain models: profiles, targets, plans, day units, exercises
pub mod models;

/// Plan workflow orchestration over durable job steps
pub mod orchestrator;

/// Persistent store seam with SQLite and in-memory implementations
pub mod storage;
