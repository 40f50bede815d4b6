//! Document summarization service.
//!
//! Long documents are split into chunks at sentence boundaries, every chunk
//! is summarized concurrently, and the partial summaries are stitched back
//! together in chunk order. Named entities from the document head are
//! extracted first and fed to the first chunk as context.
//!
//! Degradation is per piece: a failed chunk is dropped from the stitching, a
//! failed entity pass yields no entities, and a fully failed fan-out falls
//! back to an extractive head of the document. The service never errors.

use futures::future::join_all;
use std::sync::Arc;

use omniboard_core::{
    config::SummarizerConfig,
    traits::InferenceBackend,
    types::{DocumentSummary, EntitySpan, SummaryParams},
    Result,
};

/// Longest extractive fallback, in characters.
const EXTRACTIVE_FALLBACK_CHARS: usize = 400;

/// Most entities fed forward as summarization context.
const MAX_SEED_ENTITIES: usize = 8;

pub struct SummarizerService {
    backend: Arc<dyn InferenceBackend>,
    model: String,
    ner_model: String,
    config: SummarizerConfig,
    params: SummaryParams,
}

impl SummarizerService {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        model: String,
        ner_model: String,
        config: SummarizerConfig,
    ) -> Self {
        Self {
            backend,
            model,
            ner_model,
            config,
            params: SummaryParams::default(),
        }
    }

    /// Summarize one document. Total: partial failures shrink the output,
    /// a complete failure produces an extractive head instead.
    pub async fn summarize(&self, text: &str, pages: Option<u32>) -> DocumentSummary {
        let text = text.trim();
        if text.is_empty() {
            return DocumentSummary {
                summary: String::new(),
                entities: Vec::new(),
                chunks: 0,
                pages,
            };
        }

        let entities = self.extract_entities(text).await;
        let chunks = chunk_text(text, self.config.chunk_chars);
        let inputs = seeded_inputs(&chunks, &entities);

        // One summarization call per chunk, in flight together. join_all
        // returns results in input order, which keeps the stitching stable
        // no matter which call finishes first.
        let results = join_all(
            inputs
                .iter()
                .map(|input| self.summarize_chunk(input)),
        )
        .await;

        let mut parts = Vec::with_capacity(results.len());
        for (idx, result) in results.into_iter().enumerate() {
            match result {
                Ok(part) => parts.push(part),
                Err(e) => {
                    tracing::warn!(chunk = idx, error = %e, "chunk summarization failed, dropping chunk");
                }
            }
        }

        let summary = if parts.is_empty() {
            metrics::counter!("widget_mock_serves_total", "widget" => "summarize").increment(1);
            extractive_head(text)
        } else {
            parts.join(" ")
        };

        DocumentSummary {
            summary,
            entities,
            chunks: chunks.len(),
            pages,
        }
    }

    async fn summarize_chunk(&self, input: &str) -> Result<String> {
        let summary = self
            .backend
            .summarization(&self.model, input, &self.params)
            .await?;
        Ok(summary.trim().to_string())
    }

    /// Entities from the document head. Empty when the model can't answer.
    async fn extract_entities(&self, text: &str) -> Vec<EntitySpan> {
        let head = char_prefix(text, self.config.ner_head_chars);
        match self.backend.token_classification(&self.ner_model, head).await {
            Ok(spans) => spans,
            Err(e) => {
                tracing::debug!(error = %e, "entity extraction unavailable");
                Vec::new()
            }
        }
    }
}

/// The per-chunk model inputs: the first chunk gets the entity list as
/// leading context, the rest go in as-is.
fn seeded_inputs(chunks: &[String], entities: &[EntitySpan]) -> Vec<String> {
    let mut names: Vec<&str> = Vec::new();
    for span in entities {
        if !names.contains(&span.text.as_str()) {
            names.push(&span.text);
        }
        if names.len() == MAX_SEED_ENTITIES {
            break;
        }
    }

    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            if idx == 0 && !names.is_empty() {
                format!("Key entities: {}.\n\n{}", names.join(", "), chunk)
            } else {
                chunk.clone()
            }
        })
        .collect()
}

/// Split at sentence boundaries where possible, whitespace otherwise, with a
/// hard cut as the last resort. Chunks never exceed `chunk_chars` characters.
fn chunk_text(text: &str, chunk_chars: usize) -> Vec<String> {
    let chunk_chars = chunk_chars.max(200);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if rest.chars().count() <= chunk_chars {
            chunks.push(rest.to_string());
            break;
        }

        let hard_end = rest
            .char_indices()
            .nth(chunk_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let window = &rest[..hard_end];

        // Sentence end past the halfway mark, else whitespace, else hard cut.
        let cut = window
            .rfind(['.', '!', '?', '\n'])
            .map(|idx| idx + 1)
            .filter(|idx| *idx > hard_end / 2)
            .or_else(|| {
                window
                    .rfind(char::is_whitespace)
                    .filter(|idx| *idx > hard_end / 2)
            })
            .unwrap_or(hard_end);

        chunks.push(window[..cut].trim().to_string());
        rest = rest[cut..].trim_start();
    }

    chunks.retain(|chunk| !chunk.is_empty());
    chunks
}

/// First words of the document, used when every chunk failed.
fn extractive_head(text: &str) -> String {
    let head = char_prefix(text, EXTRACTIVE_FALLBACK_CHARS);
    if head.len() == text.len() {
        head.to_string()
    } else {
        let trimmed = head
            .rfind(char::is_whitespace)
            .map(|idx| &head[..idx])
            .unwrap_or(head);
        format!("{}…", trimmed.trim_end())
    }
}

/// Longest prefix of at most `max_chars` characters, on a char boundary.
fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
