//! Translation fallback chain.
//!
//! Candidate order for a pair:
//! 1. the pair-encoded model — an exact override for specialized pairs,
//!    otherwise `<prefix>-<src>-<tgt>`;
//! 2. for specialized pairs only, one multilingual model with mBART tagging;
//! 3. the configured general-purpose backups.
//!
//! Like the generation chain, this is total: when every candidate fails the
//! caller gets an explanatory placeholder naming the models tried, never an
//! error.

use std::sync::Arc;

use omniboard_core::{
    config::TranslationConfig,
    traits::InferenceBackend,
    types::{
        LanguagePair, ModelCandidate, ModelDialect, TranslationOutcome, TranslationParams,
        TranslationRequest,
    },
    Error, Result,
};

use crate::generation::FALLBACK_MODEL;
use crate::languages;

pub struct TranslationChain {
    backend: Arc<dyn InferenceBackend>,
    config: TranslationConfig,
}

impl TranslationChain {
    pub fn new(backend: Arc<dyn InferenceBackend>, config: TranslationConfig) -> Self {
        Self { backend, config }
    }

    /// Run the chain. Total: always produces a well-formed outcome.
    pub async fn translate(&self, request: &TranslationRequest) -> TranslationOutcome {
        let pair = LanguagePair::new(
            languages::normalize(&request.source),
            languages::normalize(&request.target),
        );
        let specialized =
            languages::is_specialized(&pair.source) || languages::is_specialized(&pair.target);

        let candidates = self.candidates(&pair, specialized);
        let mut tried = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            tried.push(candidate.model.clone());
            match self.attempt(candidate, &request.text, &pair).await {
                Ok(text) => {
                    return TranslationOutcome {
                        text,
                        model_used: candidate.model.clone(),
                        specialized,
                    }
                }
                Err(e) => {
                    tracing::warn!(model = %candidate.model, error = %e, "translation attempt failed");
                }
            }
        }

        metrics::counter!("translation_fallback_total").increment(1);
        TranslationOutcome {
            text: format!(
                "Translation from {} to {} is unavailable right now (tried {}).",
                request.source.trim(),
                request.target.trim(),
                tried.join(", ")
            ),
            model_used: FALLBACK_MODEL.to_string(),
            specialized,
        }
    }

    fn candidates(&self, pair: &LanguagePair, specialized: bool) -> Vec<ModelCandidate> {
        let mut list = Vec::with_capacity(2 + self.config.backups.len());

        // The override table wins for specialized pairs; some of its entries
        // are deliberately approximate, a neighbouring language's model being
        // the only thing hosted.
        let primary = if specialized {
            self.config
                .specialized
                .get(&pair.key())
                .cloned()
                .unwrap_or_else(|| self.pair_model(pair))
        } else {
            self.pair_model(pair)
        };
        list.push(ModelCandidate::new(primary, ModelDialect::PairEncoded));

        if specialized {
            list.push(ModelCandidate::new(
                self.config.specialized_multilingual.clone(),
                ModelDialect::Mbart50,
            ));
        }

        for backup in &self.config.backups {
            list.push(ModelCandidate::new(backup.model.clone(), backup.dialect));
        }
        list
    }

    fn pair_model(&self, pair: &LanguagePair) -> String {
        format!("{}-{}-{}", self.config.pair_prefix, pair.source, pair.target)
    }

    async fn attempt(
        &self,
        candidate: &ModelCandidate,
        text: &str,
        pair: &LanguagePair,
    ) -> Result<String> {
        let params = params_for(candidate.dialect, pair)?;
        let outcome = self
            .backend
            .translation(&candidate.model, text, params.as_ref())
            .await;
        metrics::counter!(
            "inference_attempts_total",
            "task" => "translation",
            "model" => candidate.model.clone(),
            "outcome" => if outcome.is_ok() { "ok" } else { "err" }
        )
        .increment(1);

        let translated = outcome?;
        let translated = translated.trim();
        if translated.is_empty() {
            return Err(Error::data_shape("empty translation"));
        }
        Ok(translated.to_string())
    }
}

/// Language parameters in the dialect a candidate expects. A code outside a
/// dialect's coverage fails the attempt, advancing the chain.
fn params_for(dialect: ModelDialect, pair: &LanguagePair) -> Result<Option<TranslationParams>> {
    match dialect {
        ModelDialect::PairEncoded => Ok(None),
        ModelDialect::Iso639 => Ok(Some(TranslationParams {
            src_lang: pair.source.clone(),
            tgt_lang: pair.target.clone(),
        })),
        ModelDialect::Mbart50 => {
            let src = languages::mbart_tag(&pair.source)
                .ok_or_else(|| Error::data_shape(format!("no mBART tag for {}", pair.source)))?;
            let tgt = languages::mbart_tag(&pair.target)
                .ok_or_else(|| Error::data_shape(format!("no mBART tag for {}", pair.target)))?;
            Ok(Some(TranslationParams {
                src_lang: src.to_string(),
                tgt_lang: tgt.to_string(),
            }))
        }
    }
}
