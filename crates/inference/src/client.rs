//! HTTP client for the hosted inference API.
//!
//! Every model is exposed at `<api_base>/<model-id>` and takes a JSON body of
//! `{"inputs": ..., "parameters": ...}`. Responses are only loosely shaped:
//! most models answer with a single-element array of objects, some with a bare
//! object, classification models with a nested array. The decoding helpers
//! here accept all of those and turn anything else into a `DataShape` error.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use std::time::Duration;

use omniboard_core::{
    config::InferenceConfig,
    traits::InferenceBackend,
    types::{EntitySpan, GenerationParams, LabelScore, SummaryParams, TranslationParams},
    Error, Result,
};

/// Client for a hosted inference API, one HTTPS POST per model call.
pub struct HostedInferenceClient {
    http: reqwest::Client,
    api_base: String,
    api_token: Option<Secret<String>>,
    timeout: Duration,
}

impl HostedInferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}", self.api_base, model)
    }

    /// One bounded attempt against one model. Never retries; the fallback
    /// chains own the decision of what to do with a failure.
    async fn post(&self, model: &str, body: &Value) -> Result<Value> {
        let token = self
            .api_token
            .as_ref()
            .ok_or(Error::MissingApiKey("inference"))?;

        let response = self
            .http
            .post(self.endpoint(model))
            .bearer_auth(token.expose_secret())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(format!(
                        "{} did not answer within {} ms",
                        model,
                        self.timeout.as_millis()
                    ))
                } else {
                    Error::transport(format!("{model}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!("{model} returned HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("{model}: {e}")))
    }
}

#[async_trait]
impl InferenceBackend for HostedInferenceClient {
    async fn text_generation(
        &self,
        model: &str,
        inputs: &str,
        params: &GenerationParams,
    ) -> Result<String> {
        let body = json!({ "inputs": inputs, "parameters": params });
        let value = self.post(model, &body).await?;
        text_field(&value, "generated_text")
    }

    async fn translation(
        &self,
        model: &str,
        inputs: &str,
        params: Option<&TranslationParams>,
    ) -> Result<String> {
        let body = match params {
            Some(p) => json!({ "inputs": inputs, "parameters": p }),
            None => json!({ "inputs": inputs }),
        };
        let value = self.post(model, &body).await?;
        text_field(&value, "translation_text")
    }

    async fn summarization(
        &self,
        model: &str,
        inputs: &str,
        params: &SummaryParams,
    ) -> Result<String> {
        let body = json!({ "inputs": inputs, "parameters": params });
        let value = self.post(model, &body).await?;
        text_field(&value, "summary_text")
    }

    async fn classification(&self, model: &str, inputs: &str) -> Result<Vec<LabelScore>> {
        let body = json!({ "inputs": inputs });
        let value = self.post(model, &body).await?;
        label_scores(&value)
    }

    async fn token_classification(&self, model: &str, inputs: &str) -> Result<Vec<EntitySpan>> {
        let body = json!({
            "inputs": inputs,
            "parameters": { "aggregation_strategy": "simple" }
        });
        let value = self.post(model, &body).await?;
        entity_spans(&value)
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Unwrap the usual single-element array wrapper, if present.
fn first_object(value: &Value) -> Result<&Value> {
    match value {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| Error::data_shape("empty response array")),
        other => Ok(other),
    }
}

/// Extract a string field from `[{field: ...}]` or `{field: ...}`.
fn text_field(value: &Value, field: &str) -> Result<String> {
    let object = first_object(value)?;
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::data_shape(format!("missing `{field}` in response")))
}

/// Classification models answer `[[{label, score}, ...]]` for a single input,
/// or occasionally the flat `[{label, score}, ...]` form.
fn label_scores(value: &Value) -> Result<Vec<LabelScore>> {
    let outer = value
        .as_array()
        .ok_or_else(|| Error::data_shape("classification response is not an array"))?;

    let items = match outer.first() {
        Some(Value::Array(inner)) => inner.as_slice(),
        Some(_) => outer.as_slice(),
        None => return Err(Error::data_shape("empty classification response")),
    };

    let mut scores: Vec<LabelScore> = items
        .iter()
        .filter_map(|item| {
            Some(LabelScore {
                label: item.get("label")?.as_str()?.to_string(),
                score: item.get("score")?.as_f64()?,
            })
        })
        .collect();

    if scores.is_empty() {
        return Err(Error::data_shape("no label/score pairs in response"));
    }

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scores)
}

/// Token-classification models answer a flat array of entity objects. The
/// entity class key depends on whether the provider aggregated spans.
fn entity_spans(value: &Value) -> Result<Vec<EntitySpan>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::data_shape("entity response is not an array"))?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let label = item
                .get("entity_group")
                .or_else(|| item.get("entity"))?
                .as_str()?
                .to_string();
            Some(EntitySpan {
                text: item.get("word")?.as_str()?.trim().to_string(),
                label,
                score: item.get("score")?.as_f64()?,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_unwraps_array_and_object_forms() {
        let wrapped = json!([{ "generated_text": "hello" }]);
        assert_eq!(text_field(&wrapped, "generated_text").unwrap(), "hello");

        let bare = json!({ "translation_text": "bonjour" });
        assert_eq!(text_field(&bare, "translation_text").unwrap(), "bonjour");
    }

    #[test]
    fn text_field_rejects_missing_and_empty() {
        let err = text_field(&json!([]), "generated_text").unwrap_err();
        assert!(matches!(err, Error::DataShape(_)));

        let err = text_field(&json!([{ "other": 1 }]), "generated_text").unwrap_err();
        assert!(matches!(err, Error::DataShape(_)));
    }

    #[test]
    fn label_scores_handles_nested_and_flat_forms() {
        let nested = json!([[
            { "label": "NEGATIVE", "score": 0.2 },
            { "label": "POSITIVE", "score": 0.8 }
        ]]);
        let scores = label_scores(&nested).unwrap();
        assert_eq!(scores[0].label, "POSITIVE");
        assert_eq!(scores[0].score, 0.8);

        let flat = json!([{ "label": "POSITIVE", "score": 0.9 }]);
        let scores = label_scores(&flat).unwrap();
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn entity_spans_accepts_both_entity_keys() {
        let aggregated = json!([
            { "entity_group": "ORG", "word": "Acme Corp", "score": 0.97 },
            { "entity": "LOC", "word": " Paris ", "score": 0.91 }
        ]);
        let spans = entity_spans(&aggregated).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "ORG");
        assert_eq!(spans[1].text, "Paris");
    }

    #[test]
    fn malformed_entity_items_are_skipped() {
        let mixed = json!([
            { "entity_group": "PER", "word": "Ada", "score": 0.99 },
            { "word": "no label" }
        ]);
        let spans = entity_spans(&mixed).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Ada");
    }
}
