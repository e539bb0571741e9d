//! Answer generation orchestration

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{GenerationProvider, TemplateProvider};
use crate::types::{GenerationRequest, GenerationResponse, ModelInfo, TokenUsage};

/// Renders templates, delegates to the generation provider and reports usage
#[derive(Clone)]
pub struct GenerationManager {
    generator: Arc<dyn GenerationProvider>,
    templates: Arc<dyn TemplateProvider>,
}

impl GenerationManager {
    pub fn new(
        generator: Arc<dyn GenerationProvider>,
        templates: Arc<dyn TemplateProvider>,
    ) -> Self {
        Self {
            generator,
            templates,
        }
    }

    /// Generate an answer for a request
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(Error::validation("Question must not be empty"));
        }

        let question = match &request.template_id {
            Some(template_id) => self.templates.get_template(template_id).await?.render(question),
            None => question.to_string(),
        };

        let generation = self
            .generator
            .generate_answer(
                &question,
                &request.documents,
                &request.custom_rules,
                &request.options(),
            )
            .await?;

        tracing::info!(
            "Generated answer with {} ({} prompt + {} completion tokens)",
            generation.model,
            generation.prompt_tokens,
            generation.completion_tokens
        );

        Ok(GenerationResponse {
            answer: generation.answer,
            model_used: generation.model,
            token_usage: TokenUsage::new(generation.prompt_tokens, generation.completion_tokens),
        })
    }

    /// Models offered by the active generator
    pub fn available_models(&self) -> Vec<ModelInfo> {
        self.generator.available_models()
    }

    /// Name of the active generator
    pub fn provider_name(&self) -> &str {
        self.generator.name()
    }
}
