// ABOUTME: Structured generation configuration
// ABOUTME: Retry budget, per-task temperatures, deflection markers and timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Structured generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum attempts per generation call (re-sending the same prompt)
    pub max_attempts: u32,
    /// Temperature for creative content (workout naming and structure)
    pub creative_temperature: f32,
    /// Temperature for numerically constrained content (meal macros)
    pub precise_temperature: f32,
    /// Temperature used after refusal escalation
    pub fallback_temperature: f32,
    /// Output size bound passed to the completion capability
    pub max_output_tokens: u32,
    /// Substrings marking a refusal/apology response; matched case-insensitively
    pub deflection_phrases: Vec<String>,
    /// Overall wall-clock budget for one plan generation run (seconds)
    pub workflow_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            creative_temperature: 0.8,
            precise_temperature: 0.2,
            fallback_temperature: 0.1,
            max_output_tokens: 1600,
            deflection_phrases: vec![
                "omlouvám se".to_owned(),
                "bohužel nemohu".to_owned(),
                "nemohu vám pomoci".to_owned(),
                "i'm sorry".to_owned(),
                "i am sorry".to_owned(),
                "i cannot help".to_owned(),
                "as an ai".to_owned(),
            ],
            workflow_timeout_secs: 600,
        }
    }
}

impl GenerationConfig {
    /// Validate retry and temperature ranges
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero attempt budget or temperatures
    /// outside [0, 2].
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_attempts == 0 {
            return Err(AppError::config("max_attempts must be at least 1"));
        }
        for (name, temp) in [
            ("creative_temperature", self.creative_temperature),
            ("precise_temperature", self.precise_temperature),
            ("fallback_temperature", self.fallback_temperature),
        ] {
            if !(0.0..=2.0).contains(&temp) {
                return Err(AppError::config(format!(
                    "{name} must be within [0.0, 2.0], got {temp}"
                )));
            }
        }
        if self.workflow_timeout_secs == 0 {
            return Err(AppError::config("workflow_timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deflection_set_covers_target_language() {
        let config = GenerationConfig::default();
        assert!(config
            .deflection_phrases
            .iter()
            .any(|p| p == "omlouvám se"));
    }
}
