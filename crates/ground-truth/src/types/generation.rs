//! Answer generation types

use serde::{Deserialize, Serialize};

use super::Document;

/// Body of `POST /generation/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub question: String,

    /// Reference documents to ground the answer on
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Model requested by the client (default: gpt-4)
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (default: 0.7)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion budget (default: 1000)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub custom_rules: Vec<String>,

    /// Prompt template to render the question through
    #[serde(default)]
    pub template_id: Option<String>,
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl GenerationRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            documents: Vec::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            custom_rules: Vec::new(),
            template_id: None,
        }
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Sampling options passed through to the generation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Raw provider output
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub answer: String,
    pub model: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub finish_reason: String,
}

/// Token accounting for one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl TokenUsage {
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Response of `POST /generation/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub answer: String,
    pub model_used: String,
    pub token_usage: TokenUsage,
}

/// A model offered by a generation provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl ModelInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"question": "What is a filter?"}"#).unwrap();

        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.max_tokens, 1000);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!(request.custom_rules.is_empty());
        assert!(request.template_id.is_none());
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 30);
        assert_eq!(usage.total_tokens, 150);
    }
}
