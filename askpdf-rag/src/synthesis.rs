//! Answer synthesis from retrieved context.
//!
//! The [`Synthesizer`] turns a question and its retrieved passages into a
//! single prompt and hands it to a [`TextGenerator`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::error::Result;

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on the length of the reply, in tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.3, max_output_tokens: 512 }
    }
}

impl From<&RagConfig> for GenerationParams {
    fn from(config: &RagConfig) -> Self {
        Self { temperature: config.temperature, max_output_tokens: config.max_output_tokens }
    }
}

/// A generative model that completes a text prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String>;

    /// The model name, for logging.
    fn model(&self) -> &str;
}

/// Build the answer prompt.
///
/// Passage texts are joined by newlines in the order given, which for search
/// results is descending similarity.
pub fn build_prompt(question: &str, context: &[SearchResult]) -> String {
    let context = context.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n");

    format!(
        "Use the context below to answer the user's question.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n"
    )
}

/// Combines the fixed prompt template with a [`TextGenerator`].
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Answer `question` from `context`, returning the trimmed model output.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error unchanged.
    pub async fn synthesize(&self, question: &str, context: &[SearchResult]) -> Result<String> {
        let prompt = build_prompt(question, context);
        debug!(
            model = self.generator.model(),
            context_count = context.len(),
            prompt_len = prompt.len(),
            "synthesizing answer"
        );

        let answer = self.generator.generate(&prompt, self.params).await.map_err(|e| {
            error!(model = self.generator.model(), error = %e, "generation failed");
            e
        })?;

        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(text: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: "id".into(),
                text: text.into(),
                embedding: vec![],
                document_id: "doc".into(),
                file_name: "a.pdf".into(),
            },
            score,
        }
    }

    #[test]
    fn prompt_joins_context_in_given_order() {
        let prompt = build_prompt("Why?", &[result("first", 0.9), result("second", 0.5)]);
        assert_eq!(
            prompt,
            "Use the context below to answer the user's question.\n\n\
             Context:\nfirst\nsecond\n\nQuestion:\nWhy?\n"
        );
    }

    #[test]
    fn prompt_with_empty_context_still_has_question() {
        let prompt = build_prompt("Anything?", &[]);
        assert!(prompt.contains("Context:\n\n"));
        assert!(prompt.ends_with("Question:\nAnything?\n"));
    }

    #[test]
    fn params_follow_config() {
        let config = RagConfig::builder().temperature(0.7).max_output_tokens(64).build().unwrap();
        let params = GenerationParams::from(&config);
        assert_eq!(params, GenerationParams { temperature: 0.7, max_output_tokens: 64 });
    }
}
