use serde::{Deserialize, Serialize};

use super::intent::Intent;

// =============================================================================
// Conversation State Types
// =============================================================================

/// How many transcript turns a context retains. Old turns age out; prompts
/// only ever fold in a suffix of this window anyway.
const MAX_RETAINED_TURNS: usize = 24;

/// Speaker tag for one transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Human,
    Assistant,
}

impl Speaker {
    /// Marker prefix used when the transcript is flattened into a prompt.
    pub fn marker(&self) -> &'static str {
        match self {
            Speaker::Human => "Human:",
            Speaker::Assistant => "Assistant:",
        }
    }
}

/// One line of conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Per-conversation state.
///
/// The server holds no session storage: the client sends the context with
/// every exchange and receives the updated copy back in the response. A
/// missing or empty context simply starts a fresh conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Exchanges completed so far.
    #[serde(default)]
    pub message_count: u32,

    /// Intent recognized on the previous exchange.
    #[serde(default)]
    pub last_intent: Option<Intent>,

    /// Loose topic hint carried over from the previous exchange.
    #[serde(default)]
    pub topic: Option<String>,

    /// Rolling transcript, oldest turn first.
    #[serde(default)]
    pub turns: Vec<ChatTurn>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed exchange: both transcript lines, the bumped
    /// counter, and the intent/topic hints for the next turn.
    pub fn record_exchange(&mut self, user_text: &str, reply: &str, intent: Intent) {
        self.turns.push(ChatTurn::human(user_text));
        self.turns.push(ChatTurn::assistant(reply));
        if self.turns.len() > MAX_RETAINED_TURNS {
            let excess = self.turns.len() - MAX_RETAINED_TURNS;
            self.turns.drain(..excess);
        }

        self.message_count += 1;
        self.last_intent = Some(intent);
        if intent != Intent::None {
            self.topic = Some(intent.label().to_string());
        }
    }

    /// The most recent turns, oldest first, at most `limit` of them.
    pub fn recent_turns(&self, limit: usize) -> &[ChatTurn] {
        let start = self.turns.len().saturating_sub(limit);
        &self.turns[start..]
    }
}

/// Result of one chat exchange, context included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// Reply text. Always non-empty.
    pub reply: String,

    /// Name of the model that produced the reply, `"fallback"` when the
    /// canned pool answered, or `"built-in"` for locally handled intents.
    pub model_used: String,

    /// Intent recognized for this utterance.
    pub intent: Intent,

    /// Updated context for the client to send on the next exchange.
    pub context: ConversationContext,
}
