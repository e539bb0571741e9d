//! Placeholder generator returning lorem ipsum markdown

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Document, Generation, GenerationOptions, ModelInfo};

use super::generation::GenerationProvider;

/// Model name reported for every demo answer
pub const DEMO_MODEL: &str = "demo-model";

const LOREM_IPSUM: &str = "# Demo Generator Lorem Ipsum Text

The answer is formatted in markdown

## Lorem Ipsum

Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor
incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud
exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute
irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur.";

/// Generator that ignores sampling options and returns placeholder text
///
/// The answer echoes the question, lists any custom rules and numbers the
/// reference documents. Token counts are character counts.
#[derive(Debug, Default)]
pub struct DemoGenerator;

impl DemoGenerator {
    pub fn new() -> Self {
        Self
    }

    fn compose(question: &str, documents: &[Document], custom_rules: &[String]) -> String {
        let mut body = LOREM_IPSUM.to_string();

        if !documents.is_empty() {
            body.push_str("\n\nReferences:\n");
            for (i, doc) in documents.iter().enumerate() {
                body.push_str(&format!("{}. {}\n", i + 1, doc.display_title()));
            }
        }

        if !custom_rules.is_empty() {
            body = format!(
                "Based on the following rules: {}\n\n{}",
                custom_rules.join(", "),
                body
            );
        }

        format!("Answer to the question: '{}'\n\n{}", question, body)
    }
}

#[async_trait]
impl GenerationProvider for DemoGenerator {
    async fn generate_answer(
        &self,
        question: &str,
        documents: &[Document],
        custom_rules: &[String],
        options: &GenerationOptions,
    ) -> Result<Generation> {
        tracing::debug!(
            "Demo generation for {} documents, {} rules (requested model {})",
            documents.len(),
            custom_rules.len(),
            options.model
        );

        let answer = Self::compose(question, documents, custom_rules);
        let prompt_tokens = question.chars().count()
            + documents
                .iter()
                .map(|doc| doc.content.chars().count())
                .sum::<usize>();
        let completion_tokens = answer.chars().count();

        Ok(Generation {
            answer,
            model: DEMO_MODEL.to_string(),
            prompt_tokens,
            completion_tokens,
            finish_reason: "stop".to_string(),
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo::new(
                DEMO_MODEL,
                "Demo Model",
                "Placeholder generator returning lorem ipsum markdown",
            ),
            ModelInfo::new(
                "gpt-4",
                "GPT-4",
                "Most capable model, best for complex tasks",
            ),
            ModelInfo::new(
                "gpt-35-turbo",
                "GPT-3.5 Turbo",
                "Fast and cost-effective for simpler tasks",
            ),
        ]
    }

    fn name(&self) -> &str {
        "demo"
    }
}
