// ABOUTME: Structured generation client with bounded retry and refusal escalation
// ABOUTME: Classifies each attempt outcome explicitly instead of nesting error handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Structured Generation Client
//!
//! One `generate` call wraps up to `max_attempts` completion calls. Each
//! attempt is classified into an explicit [`AttemptOutcome`]; a refusal
//! escalates once to a terser fallback instruction at lower temperature
//! before the retry budget runs out. Exhaustion raises `GenerationFailed`
//! carrying the last raw response for operator diagnostics.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::extraction::extract_and_repair;
use super::prompts::PromptSpec;
use super::schema::{self, ContentKind, GeneratedContent};
use super::{CompletionProvider, CompletionRequest};
use crate::config::GenerationConfig;
use crate::errors::AppError;

/// Classified result of a single generation attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Content extracted, repaired and validated
    Ok(GeneratedContent),
    /// Structural or enum violation in the response
    ValidationFailed(String),
    /// The model deflected with an apology/refusal
    Refused,
    /// The completion call itself failed (includes provider timeouts, which
    /// count against the retry budget like validation failures)
    TransportError(String),
    /// The model returned no usable text
    Empty,
}

/// One generation attempt. Ephemeral: exists for logging and diagnostics
/// during a single `generate` call, never persisted.
#[derive(Debug)]
pub struct GenerationAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Raw response text, empty when the call failed in transport
    pub raw_response: String,
    /// Classified outcome
    pub outcome: AttemptOutcome,
}

/// Client turning prompt specs into validated typed content
pub struct StructuredGenerationClient {
    provider: Arc<dyn CompletionProvider>,
    config: GenerationConfig,
}

impl StructuredGenerationClient {
    /// Create a client over the given completion provider
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, config: GenerationConfig) -> Self {
        Self { provider, config }
    }

    /// Generate and validate content for the given spec.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` once the retry budget is exhausted. The
    /// error carries the last raw response as an operator diagnostic; the
    /// user-facing message stays generic.
    pub async fn generate(&self, spec: &PromptSpec) -> Result<GeneratedContent, AppError> {
        let mut escalated = false;
        let mut last_raw = String::new();

        for attempt_number in 1..=self.config.max_attempts {
            let request = self.build_request(spec, escalated);
            let attempt = self.run_attempt(attempt_number, spec.kind, &request).await;

            if !attempt.raw_response.is_empty() {
                last_raw.clone_from(&attempt.raw_response);
            }

            match attempt.outcome {
                AttemptOutcome::Ok(content) => {
                    debug!(attempt = attempt_number, "generation succeeded");
                    return Ok(content);
                }
                AttemptOutcome::Refused => {
                    if escalated {
                        warn!(attempt = attempt_number, "refusal persisted after escalation");
                    } else {
                        info!(
                            attempt = attempt_number,
                            "refusal detected, escalating to fallback instruction"
                        );
                        escalated = true;
                    }
                }
                AttemptOutcome::ValidationFailed(reason) => {
                    warn!(attempt = attempt_number, %reason, "generated content failed validation");
                }
                AttemptOutcome::TransportError(reason) => {
                    warn!(attempt = attempt_number, %reason, "completion call failed");
                }
                AttemptOutcome::Empty => {
                    warn!(attempt = attempt_number, "empty response from completion call");
                }
            }
        }

        error!(
            attempts = self.config.max_attempts,
            raw_response = %last_raw,
            "generation retries exhausted"
        );
        Err(AppError::generation_failed(format!(
            "no valid content after {} attempts",
            self.config.max_attempts
        ))
        .with_diagnostic(last_raw))
    }

    fn build_request(&self, spec: &PromptSpec, escalated: bool) -> CompletionRequest {
        let mut messages = spec.build_messages();
        let temperature = if escalated {
            messages.push(spec.fallback_instruction());
            self.config.fallback_temperature
        } else {
            match spec.kind {
                ContentKind::Workout => self.config.creative_temperature,
                ContentKind::Meal => self.config.precise_temperature,
            }
        };

        CompletionRequest::new(messages)
            .with_temperature(temperature)
            .with_max_tokens(self.config.max_output_tokens)
    }

    async fn run_attempt(
        &self,
        attempt: u32,
        kind: ContentKind,
        request: &CompletionRequest,
    ) -> GenerationAttempt {
        match self.provider.complete(request).await {
            Err(err) => GenerationAttempt {
                attempt,
                raw_response: String::new(),
                outcome: AttemptOutcome::TransportError(err.to_string()),
            },
            Ok(response) => {
                let outcome = self.classify(kind, &response.content);
                GenerationAttempt {
                    attempt,
                    raw_response: response.content,
                    outcome,
                }
            }
        }
    }

    /// Classify a raw response without touching the retry state
    fn classify(&self, kind: ContentKind, content: &str) -> AttemptOutcome {
        if content.trim().is_empty() {
            return AttemptOutcome::Empty;
        }

        if self.is_deflection(content) {
            return AttemptOutcome::Refused;
        }

        let value = match extract_and_repair(content) {
            Ok(value) => value,
            Err(err) => return AttemptOutcome::ValidationFailed(err.message),
        };

        match schema::validate(kind, &value) {
            Ok(content) => AttemptOutcome::Ok(content),
            Err(err) => AttemptOutcome::ValidationFailed(err.message),
        }
    }

    fn is_deflection(&self, content: &str) -> bool {
        let lowered = content.to_lowercase();
        self.config
            .deflection_phrases
            .iter()
            .any(|phrase| lowered.contains(phrase.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, MessageRole};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: plays back canned responses in order
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<String, ()>>>,
        requests_seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String, ()>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, AppError> {
            self.requests_seen.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(AppError::external_service("scripted", "out of responses"));
            }
            match responses.remove(0) {
                Ok(content) => Ok(CompletionResponse {
                    content,
                    model: "scripted".to_owned(),
                    finish_reason: Some("stop".to_owned()),
                }),
                Err(()) => Err(AppError::external_service("scripted", "transport failure")),
            }
        }

        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    fn workout_spec() -> PromptSpec {
        PromptSpec {
            kind: ContentKind::Workout,
            subject: "monday workout".to_owned(),
            equipment: vec![],
            injuries: None,
            dietary_restrictions: vec![],
            cuisine_preferences: vec![],
            experience: None,
            avoid_names: vec![],
            meal_targets: None,
            prep_time_budget_mins: None,
        }
    }

    fn valid_workout_json() -> String {
        r#"{"name": "Full Body A", "description": "Compound focus",
            "exercises": [{"name": "Squat", "sets": 3, "reps": 8}]}"#
            .to_owned()
    }

    fn client(responses: Vec<Result<String, ()>>) -> (StructuredGenerationClient, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(responses));
        let client =
            StructuredGenerationClient::new(provider.clone(), GenerationConfig::default());
        (client, provider)
    }

    #[tokio::test]
    async fn first_valid_response_wins() {
        let (client, _) = client(vec![Ok(valid_workout_json())]);
        let content = client.generate(&workout_spec()).await.unwrap();
        assert!(matches!(content, GeneratedContent::Workout(_)));
    }

    #[tokio::test]
    async fn malformed_then_valid_recovers() {
        let (client, _) = client(vec![
            Ok("definitely not json".to_owned()),
            Ok(valid_workout_json()),
        ]);
        assert!(client.generate(&workout_spec()).await.is_ok());
    }

    #[tokio::test]
    async fn refusal_escalates_to_fallback_before_failing() {
        let (client, provider) = client(vec![
            Ok("Omlouvám se, ale nemohu vám s tímto pomoci.".to_owned()),
            Ok(valid_workout_json()),
        ]);
        assert!(client.generate(&workout_spec()).await.is_ok());

        // Second request must carry the terser fallback instruction at the
        // escalation temperature
        let requests = provider.requests_seen.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(
            second.temperature,
            Some(GenerationConfig::default().fallback_temperature)
        );
        assert!(second
            .messages
            .iter()
            .any(|m| m.role == MessageRole::User && m.content.contains("JSON object only")));
    }

    #[tokio::test]
    async fn exhaustion_carries_last_raw_response() {
        let (client, _) = client(vec![
            Ok("garbage one".to_owned()),
            Ok("garbage two".to_owned()),
            Ok("garbage three".to_owned()),
        ]);
        let err = client.generate(&workout_spec()).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::GenerationFailed);
        assert_eq!(err.diagnostic.as_deref(), Some("garbage three"));
    }

    #[tokio::test]
    async fn transport_errors_count_against_the_budget() {
        let (client, provider) = client(vec![Err(()), Err(()), Err(())]);
        let err = client.generate(&workout_spec()).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::GenerationFailed);
        assert_eq!(provider.requests_seen.lock().unwrap().len(), 3);
    }
}
