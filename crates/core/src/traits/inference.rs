//! Hosted inference backend trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EntitySpan, GenerationParams, LabelScore, SummaryParams, TranslationParams};

/// Client interface for a hosted inference API.
///
/// One method per task family. Every call is bounded by the configured
/// per-attempt timeout and returns an error rather than blocking a chain;
/// callers decide whether an error means "try the next candidate" or "serve
/// the fallback".
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Free-form text generation. Returns the raw generated text, prompt
    /// echo and all; callers post-process.
    async fn text_generation(
        &self,
        model: &str,
        inputs: &str,
        params: &GenerationParams,
    ) -> Result<String>;

    /// Translation. `params` carries language tags for multilingual models;
    /// pair-encoded models take `None`.
    async fn translation(
        &self,
        model: &str,
        inputs: &str,
        params: Option<&TranslationParams>,
    ) -> Result<String>;

    /// Summarization with length bounds.
    async fn summarization(
        &self,
        model: &str,
        inputs: &str,
        params: &SummaryParams,
    ) -> Result<String>;

    /// Text classification. Returns label/score pairs, best first.
    async fn classification(&self, model: &str, inputs: &str) -> Result<Vec<LabelScore>>;

    /// Named-entity recognition over a span of text.
    async fn token_classification(&self, model: &str, inputs: &str) -> Result<Vec<EntitySpan>>;
}
