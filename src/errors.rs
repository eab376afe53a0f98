// ABOUTME: Unified error handling for the plan generation engine
// ABOUTME: Defines error codes, the AppError type and classification helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Unified Error Handling
//!
//! Every fallible operation in the engine returns [`AppError`]. Inner
//! components catch, classify and re-raise into the closed [`ErrorCode`]
//! taxonomy; raw parse or transport errors never cross a workflow-step
//! boundary unclassified. Only the orchestrator terminates a workflow and
//! writes user-visible failure records.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A required biometric (age, height, weight) is absent or non-positive
    #[serde(rename = "MISSING_BIOMETRICS")]
    MissingBiometrics,
    /// Generation retries exhausted or persistent refusal from the text service
    #[serde(rename = "GENERATION_FAILED")]
    GenerationFailed,
    /// Structural or enum violation in generated content (retried internally)
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Racing updates detected at the persistent store
    #[serde(rename = "CONCURRENCY_CONFLICT")]
    ConcurrencyConflict,
    /// Caller-supplied input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A referenced record does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// An external service call failed (transport, rate limit, auth)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Persistent store operation failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Short human-readable description of this error class
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MissingBiometrics => "Required biometric data is missing",
            Self::GenerationFailed => "Content generation failed",
            Self::Validation => "Generated content failed validation",
            Self::ConcurrencyConflict => "Conflicting concurrent update",
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ConfigError => "Configuration error encountered",
            Self::DatabaseError => "Database operation failed",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable message, safe for operator logs
    pub message: String,
    /// Operator-facing diagnostic payload (e.g. a raw model response);
    /// never shown to end users
    pub diagnostic: Option<String>,
    /// Source error for chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            diagnostic: None,
            source: None,
        }
    }

    /// Attach an operator-facing diagnostic payload
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Message suitable for end users.
    ///
    /// User-data faults are surfaced verbatim; external-service faults are
    /// collapsed to a generic retry prompt with diagnostics kept in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::MissingBiometrics | ErrorCode::InvalidInput => self.message.clone(),
            ErrorCode::GenerationFailed | ErrorCode::ExternalServiceError => {
                "Plan generation did not succeed. Please try again in a moment.".to_owned()
            }
            _ => self.code.description().to_owned(),
        }
    }

    /// Missing or non-positive biometric; never defaulted downstream
    pub fn missing_biometrics(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingBiometrics, message)
    }

    /// Generation retries exhausted
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// Contract violation in generated content
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Racing persistent-store updates
    pub fn concurrency_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrencyConflict, message)
    }

    /// Invalid caller input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing record
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// External service failure
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Persistent store failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for the engine
pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("serialization failed: {error}")).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_hides_external_diagnostics() {
        let err = AppError::generation_failed("retries exhausted after 3 attempts")
            .with_diagnostic("raw model output here");
        assert!(!err.user_message().contains("raw model output"));
        assert!(!err.user_message().contains("retries exhausted"));
    }

    #[test]
    fn user_message_surfaces_biometrics_verbatim() {
        let err = AppError::missing_biometrics("weight is required for target calculation");
        assert_eq!(
            err.user_message(),
            "weight is required for target calculation"
        );
    }

    #[test]
    fn error_code_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::MissingBiometrics).unwrap();
        assert_eq!(json, "\"MISSING_BIOMETRICS\"");
    }
}
