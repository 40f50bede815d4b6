//! Sentiment widget service.
//!
//! One classification call, one verdict. When the model is unreachable the
//! verdict is a flagged neutral, never an error.

use std::sync::Arc;

use omniboard_core::{traits::InferenceBackend, types::SentimentVerdict};

pub struct SentimentService {
    backend: Arc<dyn InferenceBackend>,
    model: String,
}

impl SentimentService {
    pub fn new(backend: Arc<dyn InferenceBackend>, model: String) -> Self {
        Self { backend, model }
    }

    /// Verdict for one piece of text. Total.
    pub async fn analyze(&self, text: &str) -> SentimentVerdict {
        match self.backend.classification(&self.model, text).await {
            Ok(scores) if !scores.is_empty() => SentimentVerdict {
                label: scores[0].label.to_lowercase(),
                score: scores[0].score,
                mock: false,
            },
            Ok(_) => neutral(),
            Err(e) => {
                tracing::debug!(error = %e, "sentiment model unavailable, serving neutral verdict");
                metrics::counter!("widget_mock_serves_total", "widget" => "sentiment")
                    .increment(1);
                neutral()
            }
        }
    }
}

fn neutral() -> SentimentVerdict {
    SentimentVerdict {
        label: "neutral".into(),
        score: 0.0,
        mock: true,
    }
}
