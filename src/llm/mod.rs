// ABOUTME: Text-completion capability seam and structured generation stack
// ABOUTME: Defines the provider trait, message types and the generation client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Structured Generation
//!
//! The external text-generation capability is a black box: given a prompt it
//! returns unstructured text, fallibly, with no guaranteed schema adherence.
//! This module wraps it into something the rest of the engine can trust:
//!
//! - [`CompletionProvider`]: the async seam over the external capability
//! - [`extraction`]: fence stripping, balanced-brace JSON candidate location
//!   and the idempotent syntactic repair pass
//! - [`schema`]: per-kind validation of the parsed candidate into typed
//!   templates
//! - [`client::StructuredGenerationClient`]: the bounded retry loop with
//!   classified attempt outcomes and refusal escalation

pub mod client;
pub mod extraction;
mod http;
pub mod prompts;
pub mod schema;

pub use client::StructuredGenerationClient;
pub use http::OpenAiCompatibleProvider;
pub use prompts::{MealTargetHint, PromptSpec};
pub use schema::{ContentKind, ExerciseTemplate, GeneratedContent, MealTemplate, WorkoutTemplate};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// String representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the sender
    pub role: MessageRole,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Configuration for one completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Output size bound
    pub max_tokens: Option<u32>,
    /// Model override (provider-specific)
    pub model: Option<String>,
}

impl CompletionRequest {
    /// Create a request from messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
            model: None,
        }
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output size bound
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from a completion call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Finish reason if reported (stop, length, ...)
    pub finish_reason: Option<String>,
}

/// Seam over the external text-generation capability.
///
/// Implementations must not write to the persistent store; their only side
/// effect is the external call itself.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Perform a completion
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError>;

    /// Check that the provider is reachable and credentials are valid
    async fn health_check(&self) -> Result<bool, AppError>;
}
