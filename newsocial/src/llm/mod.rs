use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Core trait for model providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a system + user prompt pair
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}

/// Request structure for LLM generation
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub system_prompt: Option<String>,
    pub prompt: String,
    /// Overrides the provider's default model
    pub model: Option<String>,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

impl LlmRequest {
    pub fn new(system_prompt: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(system_prompt.into()),
            prompt: prompt.into(),
            model: None,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }

    /// Apply a model profile (model, temperature, max tokens)
    pub fn with_profile(mut self, profile: &ModelProfile) -> Self {
        self.model = Some(profile.model.clone());
        self.temperature = Some(profile.temperature);
        self.max_tokens = Some(profile.max_tokens);
        self
    }
}

/// Response from LLM generation
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

/// Token usage metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Model parameters used by one operation
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl ModelProfile {
    pub fn new(model: impl Into<String>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    /// Overlay the fields present in a config section
    pub fn overridden_by(mut self, cfg: Option<&common::ModelProfileConfig>) -> Self {
        if let Some(cfg) = cfg {
            if let Some(model) = &cfg.model {
                self.model = model.clone();
            }
            if let Some(temperature) = cfg.temperature {
                self.temperature = temperature;
            }
            if let Some(max_tokens) = cfg.max_tokens {
                self.max_tokens = max_tokens;
            }
        }
        self
    }
}

/// One profile per orchestration operation
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfiles {
    pub news: ModelProfile,
    pub social: ModelProfile,
    pub series: ModelProfile,
    pub analysis: ModelProfile,
}

impl Default for ModelProfiles {
    fn default() -> Self {
        Self {
            // News is a short structured listing; a small model is enough
            news: ModelProfile::new("gpt-4.1-nano", 0.5, 600),
            social: ModelProfile::new("gpt-4.1", 0.7, 400),
            series: ModelProfile::new("gpt-4.1", 0.7, 900),
            analysis: ModelProfile::new("gpt-4.1", 0.6, 900),
        }
    }
}

impl ModelProfiles {
    pub fn from_config(llm: &common::LlmConfig) -> Self {
        let defaults = Self::default();
        Self {
            news: defaults.news.overridden_by(llm.news.as_ref()),
            social: defaults.social.overridden_by(llm.social.as_ref()),
            series: defaults.series.overridden_by(llm.series.as_ref()),
            analysis: defaults.analysis.overridden_by(llm.analysis.as_ref()),
        }
    }
}

pub mod remote;
