// ABOUTME: Durable job-step substrate seam
// ABOUTME: run_step/send_event trait plus an inline single-attempt runner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Step Substrate
//!
//! The orchestrator shapes its workflow as named, independently retryable
//! steps executed by an external durable-job substrate with at-least-once
//! semantics. That substrate is consumed through [`StepRunner`], never
//! implemented here: [`InlineStepRunner`] simply awaits each step once, which
//! is the correct behavior when no durable substrate is wired in. Step
//! results are JSON values so a durable implementation can persist and replay
//! them.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;

/// Seam over the external durable-step substrate
#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Run one named workflow step to completion and return its
    /// JSON-serialized result
    async fn run_step(
        &self,
        name: &str,
        step: BoxFuture<'_, Result<Value, AppError>>,
    ) -> Result<Value, AppError>;

    /// Emit a workflow event for asynchronous subscribers
    async fn send_event(&self, name: &str, payload: Value) -> Result<(), AppError>;
}

/// Single-attempt runner used when no durable substrate is attached
pub struct InlineStepRunner;

#[async_trait]
impl StepRunner for InlineStepRunner {
    async fn run_step(
        &self,
        name: &str,
        step: BoxFuture<'_, Result<Value, AppError>>,
    ) -> Result<Value, AppError> {
        debug!(step = name, "running workflow step inline");
        step.await
    }

    async fn send_event(&self, name: &str, payload: Value) -> Result<(), AppError> {
        debug!(event = name, %payload, "workflow event emitted");
        Ok(())
    }
}
