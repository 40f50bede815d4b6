//! Text-generation fallback chain.
//!
//! Order of attempts: the primary chat model, then a single smaller backup
//! with looser sampling, then a canned reply pool. The chain is total: it
//! never returns an error, and always attributes the reply to whichever rung
//! produced it.

use rand::seq::SliceRandom;
use std::sync::Arc;

use omniboard_core::{
    config::GenerationConfig,
    traits::InferenceBackend,
    types::{ChatTurn, GenerationParams, Speaker},
    Error, Result,
};

/// Attribution used when the canned pool answered.
pub const FALLBACK_MODEL: &str = "fallback";

/// Generic replies served when every model attempt failed. Vague on purpose:
/// they have to fit any utterance that reached the model path.
const FALLBACK_REPLIES: &[&str] = &[
    "I'm having trouble reaching my language models right now, but I'm still here. Try asking about the weather, news, or stocks.",
    "That one's beyond me at the moment. Could you rephrase it, or ask me for the time, a joke, or today's headlines?",
    "My smarter half isn't answering right now. I can still help with weather, stocks, news, and translations.",
    "I didn't quite manage to come up with a good answer there. Ask me something else, or type 'help' to see what I can do.",
    "Let me get back to you on that. In the meantime, I can fetch headlines, weather, or a stock quote.",
    "I'm not sure how to answer that right now. Type 'help' if you'd like to see everything I can do.",
];

/// Reply text plus the attribution the dashboard displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    pub model_used: String,
}

/// Primary-then-backup-then-pool chain for conversational replies.
pub struct GenerationChain {
    backend: Arc<dyn InferenceBackend>,
    config: GenerationConfig,
    /// Shortest cleaned reply accepted from the backup model.
    min_reply_chars: usize,
}

impl GenerationChain {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        config: GenerationConfig,
        min_reply_chars: usize,
    ) -> Self {
        Self {
            backend,
            config,
            min_reply_chars,
        }
    }

    /// Flatten recent transcript turns plus the new utterance into a prompt.
    /// The trailing bare assistant marker is what the model completes.
    pub fn build_prompt(history: &[ChatTurn], user_text: &str, max_turns: usize) -> String {
        let start = history.len().saturating_sub(max_turns);
        let mut prompt = String::new();
        for turn in &history[start..] {
            prompt.push_str(turn.speaker.marker());
            prompt.push(' ');
            prompt.push_str(&turn.text);
            prompt.push('\n');
        }
        prompt.push_str(Speaker::Human.marker());
        prompt.push(' ');
        prompt.push_str(user_text);
        prompt.push('\n');
        prompt.push_str(Speaker::Assistant.marker());
        prompt
    }

    /// Run the chain. Total: always produces a usable reply.
    pub async fn reply(
        &self,
        history: &[ChatTurn],
        user_text: &str,
        max_turns: usize,
    ) -> GeneratedReply {
        let prompt = Self::build_prompt(history, user_text, max_turns);

        // Primary: any non-empty cleaned output is accepted.
        match self
            .attempt(&self.config.primary, &self.config.primary_params, &prompt, 1)
            .await
        {
            Ok(text) => {
                return GeneratedReply {
                    text,
                    model_used: self.config.primary.clone(),
                }
            }
            Err(e) => {
                tracing::warn!(model = %self.config.primary, error = %e, "primary generation attempt failed");
            }
        }

        // Backup: held to the minimum-length bar as well, since small models
        // like to answer with a lone punctuation mark.
        match self
            .attempt(
                &self.config.backup,
                &self.config.backup_params,
                &prompt,
                self.min_reply_chars,
            )
            .await
        {
            Ok(text) => {
                return GeneratedReply {
                    text,
                    model_used: self.config.backup.clone(),
                }
            }
            Err(e) => {
                tracing::warn!(model = %self.config.backup, error = %e, "backup generation attempt failed");
            }
        }

        metrics::counter!("generation_fallback_total").increment(1);
        GeneratedReply {
            text: canned_reply(),
            model_used: FALLBACK_MODEL.to_string(),
        }
    }

    async fn attempt(
        &self,
        model: &str,
        params: &GenerationParams,
        prompt: &str,
        min_chars: usize,
    ) -> Result<String> {
        let outcome = self.backend.text_generation(model, prompt, params).await;
        metrics::counter!(
            "inference_attempts_total",
            "task" => "generation",
            "model" => model.to_string(),
            "outcome" => if outcome.is_ok() { "ok" } else { "err" }
        )
        .increment(1);

        let cleaned = clean_reply(&outcome?);
        if cleaned.chars().count() < min_chars {
            return Err(Error::data_shape(format!(
                "cleaned reply shorter than {min_chars} chars"
            )));
        }
        Ok(cleaned)
    }
}

fn canned_reply() -> String {
    FALLBACK_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_REPLIES[0])
        .to_string()
}

/// Strip prompt echo and leaked turns from raw model output.
///
/// Base models tend to echo the whole prompt before answering, so everything
/// up to the last assistant marker goes. Anything the model invents for the
/// next human turn goes too.
pub fn clean_reply(raw: &str) -> String {
    let mut text = raw;
    if let Some(idx) = text.rfind(Speaker::Assistant.marker()) {
        text = &text[idx + Speaker::Assistant.marker().len()..];
    }
    if let Some(idx) = text.find(Speaker::Human.marker()) {
        text = &text[..idx];
    }
    text.trim().to_string()
}
