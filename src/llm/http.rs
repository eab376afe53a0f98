// ABOUTME: OpenAI-compatible HTTP completion provider
// ABOUTME: Works against any chat-completions endpoint (hosted or local)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # OpenAI-Compatible Provider
//!
//! Implements [`CompletionProvider`] over the `/chat/completions` wire format
//! shared by most hosted and local inference servers.
//!
//! ## Configuration
//!
//! - `FITPLAN_LLM_BASE_URL`: API endpoint (default `http://localhost:11434/v1`)
//! - `FITPLAN_LLM_MODEL`: model name (default `qwen2.5:14b-instruct`)
//! - `FITPLAN_LLM_API_KEY`: bearer token (optional for local servers)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse};
use crate::errors::AppError;

const BASE_URL_ENV: &str = "FITPLAN_LLM_BASE_URL";
const MODEL_ENV: &str = "FITPLAN_LLM_MODEL";
const API_KEY_ENV: &str = "FITPLAN_LLM_API_KEY";

const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for ApiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// Provider
// ============================================================================

/// Completion provider speaking the OpenAI-compatible chat API
pub struct OpenAiCompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a provider with explicit settings
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key,
            model: model.into(),
        }
    }

    /// Create a provider from environment configuration
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configured base URL is empty.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        if base_url.trim().is_empty() {
            return Err(AppError::config(format!("{BASE_URL_ENV} must not be empty")));
        }
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());

        Ok(Self::new(base_url, api_key, model))
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<ApiErrorResponse>(body)
            .map_or_else(|_| body.to_owned(), |e| e.error.message);

        match status.as_u16() {
            401 | 403 => {
                AppError::external_service("completion", format!("authentication failed: {detail}"))
            }
            429 => {
                AppError::external_service("completion", format!("rate limit exceeded: {detail}"))
            }
            400 => AppError::invalid_input(format!("completion request rejected: {detail}")),
            _ => AppError::external_service("completion", format!("{status}: {detail}")),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        let api_request = ApiRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: request.messages.iter().map(ApiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&api_request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|err| {
            AppError::external_service("completion", format!("request failed: {err}"))
                .with_source(err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            AppError::external_service("completion", format!("reading response failed: {err}"))
                .with_source(err)
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: ApiResponse = serde_json::from_str(&body).map_err(|err| {
            AppError::external_service("completion", format!("malformed response body: {err}"))
                .with_source(err)
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service("completion", "response contained no choices")
        })?;

        debug!(
            model = %parsed.model,
            finish_reason = ?choice.finish_reason,
            "completion received"
        );

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: parsed.model,
            finish_reason: choice.finish_reason,
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let mut builder = self.client.get(self.api_url("models"));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|err| {
            AppError::external_service("completion", format!("health check failed: {err}"))
                .with_source(err)
        })?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let provider = OpenAiCompatibleProvider::new("http://localhost:1234/v1/", None, "m");
        assert_eq!(
            provider.api_url("chat/completions"),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn auth_errors_are_classified_as_external() {
        let err = OpenAiCompatibleProvider::parse_error_response(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"bad key"}}"#,
        );
        assert_eq!(err.code, crate::errors::ErrorCode::ExternalServiceError);
        assert!(err.message.contains("bad key"));
    }
}
