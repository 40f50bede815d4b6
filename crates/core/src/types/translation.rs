use serde::{Deserialize, Serialize};

// =============================================================================
// Translation Chain Types
// =============================================================================

/// A translation job. Source and target are whatever the caller supplied,
/// full names or short codes; the chain normalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source: String,
    pub target: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Outcome of the translation chain. Always well-formed: when every candidate
/// failed, `text` carries an explanatory placeholder naming the models tried
/// and `model_used` is `"fallback"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub text: String,
    pub model_used: String,
    /// Whether the pair got specialized lower-resource handling.
    pub specialized: bool,
}

/// A normalized language pair, keyed as `"<src>-<tgt>"` with short codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Lookup key used by the specialized override table.
    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

/// How language information is encoded for a candidate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelDialect {
    /// The pair is baked into the model name; no language parameters sent.
    PairEncoded,
    /// mBART-50 tagging: `en` becomes `en_XX`, `hi` becomes `hi_IN`.
    Mbart50,
    /// Plain ISO 639-1 codes in `src_lang`/`tgt_lang` parameters.
    Iso639,
}

/// One entry in a fallback chain's attempt order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    /// Model identifier as the inference provider knows it.
    pub model: String,
    /// Request-shaping rules this model needs.
    pub dialect: ModelDialect,
}

impl ModelCandidate {
    pub fn new(model: impl Into<String>, dialect: ModelDialect) -> Self {
        Self {
            model: model.into(),
            dialect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_src_dash_tgt() {
        let pair = LanguagePair::new("en", "hi");
        assert_eq!(pair.key(), "en-hi");
    }

    #[test]
    fn dialect_deserializes_snake_case() {
        let d: ModelDialect = serde_json::from_str("\"pair_encoded\"").unwrap();
        assert_eq!(d, ModelDialect::PairEncoded);
        let d: ModelDialect = serde_json::from_str("\"mbart50\"").unwrap();
        assert_eq!(d, ModelDialect::Mbart50);
    }
}
