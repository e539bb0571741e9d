//! Prompt template provider

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::Template;

/// Trait for prompt template lookup
///
/// Implementations:
/// - `InMemoryTemplates`: the three built-in templates
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    /// List every template
    async fn list_templates(&self) -> Result<Vec<Template>>;

    /// Get a template by ID
    async fn get_template(&self, id: &str) -> Result<Template>;
}

/// Fixed list of templates held in memory
pub struct InMemoryTemplates {
    templates: Vec<Template>,
}

impl Default for InMemoryTemplates {
    fn default() -> Self {
        Self::new(builtin_templates())
    }
}

impl InMemoryTemplates {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }
}

fn template(id: &str, name: &str, description: &str, prompt: &str) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        prompt: prompt.to_string(),
        fields: vec!["question".to_string()],
    }
}

fn builtin_templates() -> Vec<Template> {
    vec![
        template(
            "template1",
            "General Question",
            "A general question template for most inquiries",
            "Based on the following documents, please answer the question: {question}",
        ),
        template(
            "template2",
            "Technical Explanation",
            "A template for technical explanations with detailed context",
            "Using the technical documentation provided, explain in detail: {question}",
        ),
        template(
            "template3",
            "Step-by-Step Guide",
            "A template for procedural instructions",
            "Based on the provided documentation, explain the step-by-step process to: {question}",
        ),
    ]
}

#[async_trait]
impl TemplateProvider for InMemoryTemplates {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        Ok(self.templates.clone())
    }

    async fn get_template(&self, id: &str) -> Result<Template> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .cloned()
            .ok_or_else(|| Error::TemplateNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_templates() {
        let templates = InMemoryTemplates::default();

        let all = templates.list_templates().await.unwrap();
        let names: Vec<&str> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["General Question", "Technical Explanation", "Step-by-Step Guide"]
        );
        assert!(all.iter().all(|t| t.prompt.contains("{question}")));
    }

    #[tokio::test]
    async fn test_get_template() {
        let templates = InMemoryTemplates::default();

        let step = templates.get_template("template3").await.unwrap();
        assert_eq!(
            step.render("replace a filter"),
            "Based on the provided documentation, explain the step-by-step process to: replace a filter"
        );
        assert!(matches!(
            templates.get_template("template9").await,
            Err(Error::TemplateNotFound(_))
        ));
    }
}
