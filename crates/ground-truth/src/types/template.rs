//! Prompt templates

use serde::{Deserialize, Serialize};

/// A prompt template with a `{question}` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Template {
    /// Substitute the question into the prompt
    pub fn render(&self, question: &str) -> String {
        self.prompt.replace("{question}", question)
    }
}
