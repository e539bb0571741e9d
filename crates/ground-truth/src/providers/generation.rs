//! Answer generation provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Document, Generation, GenerationOptions, ModelInfo};

/// Trait for answer generation
///
/// Implementations:
/// - `DemoGenerator`: fixed markdown placeholder text
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate an answer to `question` grounded on `documents`
    async fn generate_answer(
        &self,
        question: &str,
        documents: &[Document],
        custom_rules: &[String],
        options: &GenerationOptions,
    ) -> Result<Generation>;

    /// Models this provider can serve
    fn available_models(&self) -> Vec<ModelInfo>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
