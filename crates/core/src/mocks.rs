//! Mock implementations of core traits for testing.
//!
//! The scripted [`MockBackend`] stands in for the hosted inference API so the
//! fallback chains and widget services can be exercised without a network:
//! tests queue a response (or a failure) per expected attempt and then assert
//! on call counts and the order of models tried.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{
    traits::InferenceBackend,
    types::{EntitySpan, GenerationParams, LabelScore, SummaryParams, TranslationParams},
    Error, Result,
};

// =============================================================================
// Mock Inference Backend
// =============================================================================

type Script<T> = Mutex<VecDeque<std::result::Result<T, String>>>;

/// Scripted mock inference backend.
///
/// Each task family has its own queue, consumed front to back. A queued
/// `Err` fails that attempt with a transport error; an exhausted queue fails
/// too, so a mock scripted for two attempts cannot silently absorb a third.
#[derive(Default)]
pub struct MockBackend {
    generation: Script<String>,
    translation: Script<String>,
    summarization: Script<String>,
    classification: Script<Vec<LabelScore>>,
    entities: Script<Vec<EntitySpan>>,
    call_count: Mutex<usize>,
    models_seen: Mutex<Vec<String>>,
    inputs_seen: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful generation reply.
    pub fn with_generation(self, reply: &str) -> Self {
        self.generation
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    /// Queue a failed generation attempt.
    pub fn with_generation_failure(self, reason: &str) -> Self {
        self.generation
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    /// Queue a successful translation reply.
    pub fn with_translation(self, reply: &str) -> Self {
        self.translation
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    /// Queue a failed translation attempt.
    pub fn with_translation_failure(self, reason: &str) -> Self {
        self.translation
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    /// Queue a successful summarization reply.
    pub fn with_summary(self, reply: &str) -> Self {
        self.summarization
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    /// Queue a failed summarization attempt.
    pub fn with_summary_failure(self, reason: &str) -> Self {
        self.summarization
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    /// Queue a successful classification result.
    pub fn with_classification(self, scores: Vec<LabelScore>) -> Self {
        self.classification.lock().unwrap().push_back(Ok(scores));
        self
    }

    /// Queue a failed classification attempt.
    pub fn with_classification_failure(self, reason: &str) -> Self {
        self.classification
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    /// Queue a successful entity-extraction result.
    pub fn with_entities(self, spans: Vec<EntitySpan>) -> Self {
        self.entities.lock().unwrap().push_back(Ok(spans));
        self
    }

    /// Queue a failed entity-extraction attempt.
    pub fn with_entities_failure(self, reason: &str) -> Self {
        self.entities
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    /// Total calls made across all task families.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Model names passed in, in call order.
    pub fn models_seen(&self) -> Vec<String> {
        self.models_seen.lock().unwrap().clone()
    }

    /// Input texts passed in, in call order.
    pub fn inputs_seen(&self) -> Vec<String> {
        self.inputs_seen.lock().unwrap().clone()
    }

    fn take<T>(&self, model: &str, inputs: &str, script: &Script<T>) -> Result<T> {
        *self.call_count.lock().unwrap() += 1;
        self.models_seen.lock().unwrap().push(model.to_string());
        self.inputs_seen.lock().unwrap().push(inputs.to_string());

        match script.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(reason)) => Err(Error::transport(reason)),
            None => Err(Error::transport("mock: no scripted response left")),
        }
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn text_generation(
        &self,
        model: &str,
        inputs: &str,
        _params: &GenerationParams,
    ) -> Result<String> {
        self.take(model, inputs, &self.generation)
    }

    async fn translation(
        &self,
        model: &str,
        inputs: &str,
        _params: Option<&TranslationParams>,
    ) -> Result<String> {
        self.take(model, inputs, &self.translation)
    }

    async fn summarization(
        &self,
        model: &str,
        inputs: &str,
        _params: &SummaryParams,
    ) -> Result<String> {
        self.take(model, inputs, &self.summarization)
    }

    async fn classification(&self, model: &str, inputs: &str) -> Result<Vec<LabelScore>> {
        self.take(model, inputs, &self.classification)
    }

    async fn token_classification(&self, model: &str, inputs: &str) -> Result<Vec<EntitySpan>> {
        self.take(model, inputs, &self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queues_are_consumed_in_order() {
        let backend = MockBackend::new()
            .with_generation("first")
            .with_generation_failure("down")
            .with_generation("third");

        let params = GenerationParams::default();
        assert_eq!(
            backend
                .text_generation("m1", "hi", &params)
                .await
                .unwrap(),
            "first"
        );
        assert!(backend.text_generation("m2", "hi", &params).await.is_err());
        assert_eq!(
            backend
                .text_generation("m3", "hi", &params)
                .await
                .unwrap(),
            "third"
        );
        assert_eq!(backend.call_count(), 3);
        assert_eq!(backend.models_seen(), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn exhausted_queue_fails() {
        let backend = MockBackend::new();
        let err = backend
            .translation("any", "text", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
