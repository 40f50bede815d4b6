use serde::{Deserialize, Serialize};

// =============================================================================
// Inference Request/Response Types
// =============================================================================

/// Sampling parameters for one text-generation attempt.
///
/// The primary and backup models carry separate parameter sets; the backup's
/// are looser so a smaller model still produces something usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 120,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.2,
        }
    }
}

/// Length bounds for one summarization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryParams {
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 130,
        }
    }
}

/// Language hints for multilingual translation models. Pair-encoded models
/// take none; multilingual ones need the pair spelled out in their own
/// tagging dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationParams {
    pub src_lang: String,
    pub tgt_lang: String,
}

/// One label/score pair from a classification model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// One named entity extracted by a token-classification model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Surface text of the entity.
    pub text: String,
    /// Entity class, e.g. `PER`, `ORG`, `LOC`.
    pub label: String,
    pub score: f64,
}
