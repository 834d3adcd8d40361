//! Configuration for the question-answering pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Collection shared by every session unless overridden.
pub const DEFAULT_COLLECTION: &str = "session_docs";

/// Configuration parameters for ingestion, retrieval and synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Chunk length limit in characters.
    pub chunk_size: usize,
    /// Number of passages retrieved per question.
    pub top_k: usize,
    /// Name of the vector index collection.
    pub collection: String,
    /// Sampling temperature for answer generation.
    pub temperature: f32,
    /// Maximum number of tokens in a generated answer.
    pub max_output_tokens: u32,
    /// Delete a document's index records when it is pruned from the session.
    pub purge_on_remove: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            top_k: 3,
            collection: DEFAULT_COLLECTION.to_string(),
            temperature: 0.3,
            max_output_tokens: 512,
            purge_on_remove: true,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the chunk length limit in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the number of passages retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the vector index collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the answer token cap.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Choose whether pruned documents have their index records deleted.
    pub fn purge_on_remove(mut self, purge: bool) -> Self {
        self.config.purge_on_remove = purge;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0`
    /// - `top_k == 0`
    /// - `collection` is blank
    /// - `temperature` is negative or not finite
    /// - `max_output_tokens == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.config.collection.trim().is_empty() {
            return Err(RagError::ConfigError("collection name must not be empty".to_string()));
        }
        if !self.config.temperature.is_finite() || self.config.temperature < 0.0 {
            return Err(RagError::ConfigError(format!(
                "temperature ({}) must be a non-negative number",
                self.config.temperature
            )));
        }
        if self.config.max_output_tokens == 0 {
            return Err(RagError::ConfigError(
                "max_output_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_deployment() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.collection, "session_docs");
        assert_eq!(config.max_output_tokens, 512);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert!(config.purge_on_remove);
    }

    #[test]
    fn builder_rejects_zero_values() {
        assert!(matches!(RagConfig::builder().chunk_size(0).build(), Err(RagError::ConfigError(_))));
        assert!(matches!(RagConfig::builder().top_k(0).build(), Err(RagError::ConfigError(_))));
        assert!(matches!(
            RagConfig::builder().max_output_tokens(0).build(),
            Err(RagError::ConfigError(_))
        ));
    }

    #[test]
    fn builder_rejects_blank_collection_and_bad_temperature() {
        assert!(RagConfig::builder().collection("  ").build().is_err());
        assert!(RagConfig::builder().temperature(-0.1).build().is_err());
        assert!(RagConfig::builder().temperature(f32::NAN).build().is_err());
    }

    #[test]
    fn builder_applies_overrides() {
        let config = RagConfig::builder()
            .chunk_size(200)
            .top_k(5)
            .collection("papers")
            .purge_on_remove(false)
            .build()
            .unwrap();
        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.collection, "papers");
        assert!(!config.purge_on_remove);
    }
}
