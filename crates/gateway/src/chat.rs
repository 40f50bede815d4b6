//! Conversational engine: routing, built-in replies, and the model path.
//!
//! Every message goes through the router first. Matched intents are answered
//! locally (help text, clock, joke pool, panel pointers) with zero model
//! calls. Only the `None` sentinel reaches the generation chain, and even
//! then an exact-match greeting table gets a chance to answer first so that
//! "hello" never burns an inference request.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;

use omniboard_core::types::{ChatOutcome, ConversationContext, Intent, RoutedCommand};
use omniboard_inference::GenerationChain;

use crate::router::CommandRouter;

/// Attribution for replies produced without any model call.
pub const BUILT_IN_MODEL: &str = "built-in";

const HELP_TEXT: &str = "Here's what I can do:\n\
- Weather: \"What's the weather in Paris?\"\n\
- Stocks: \"Stock price of AAPL\"\n\
- News: \"Show me the news about markets\"\n\
- Translation: \"Translate 'hello' to French\"\n\
- Sentiment: \"Sentiment of 'I love this product'\"\n\
- Time, date, jokes, and open-ended chat: just ask.";

const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "I told my computer I needed a break, and it said \"no problem, I'll go to sleep.\"",
    "Why did the scarecrow win an award? He was outstanding in his field.",
    "There are only 10 kinds of people: those who understand binary and those who don't.",
    "Why don't scientists trust atoms? Because they make up everything.",
    "What do you call a fish with no eyes? A fsh.",
    "I'd tell you a UDP joke, but you might not get it.",
    "Why was the math book sad? It had too many problems.",
];

/// Exact-match greetings, compared after trimming and lowercasing.
const GREETINGS: &[(&str, &str)] = &[
    ("hello", "Hello! How can I help you today?"),
    ("hi", "Hi there! What can I do for you?"),
    ("hey", "Hey! What would you like to know?"),
    ("yo", "Yo! What can I do for you?"),
    ("howdy", "Howdy! What can I do for you?"),
    ("good morning", "Good morning! What can I help you with?"),
    ("good afternoon", "Good afternoon! What can I help you with?"),
    ("good evening", "Good evening! What can I help you with?"),
];

/// The chat engine owned by the gateway.
pub struct ChatEngine {
    router: CommandRouter,
    generation: Arc<GenerationChain>,
    /// Transcript turns flattened into the prompt on the model path.
    max_history_turns: usize,
}

impl ChatEngine {
    pub fn new(generation: Arc<GenerationChain>, max_history_turns: usize) -> Self {
        Self {
            router: CommandRouter::new(),
            generation,
            max_history_turns,
        }
    }

    /// Classify without replying. Backs the route-inspection endpoint.
    pub fn route(&self, text: &str) -> RoutedCommand {
        self.router.route(text)
    }

    /// Answer one message and fold the exchange into the context.
    pub async fn reply(&self, message: &str, mut context: ConversationContext) -> ChatOutcome {
        let routed = self.router.route(message);
        metrics::counter!(
            "chat_messages_total",
            "intent" => routed.intent.label().to_string()
        )
        .increment(1);

        let (reply, model_used) = match routed.intent {
            Intent::Help => (HELP_TEXT.to_string(), BUILT_IN_MODEL.to_string()),
            Intent::Time => (
                format!("It's {} UTC right now.", Utc::now().format("%H:%M")),
                BUILT_IN_MODEL.to_string(),
            ),
            Intent::Date => (
                format!("Today is {}.", Utc::now().format("%A, %B %-d, %Y")),
                BUILT_IN_MODEL.to_string(),
            ),
            Intent::Joke => (random_joke(), BUILT_IN_MODEL.to_string()),
            Intent::Weather
            | Intent::Stock
            | Intent::News
            | Intent::Translate
            | Intent::Sentiment => (panel_pointer(&routed), BUILT_IN_MODEL.to_string()),
            Intent::None => {
                if let Some(greeting) = greeting_reply(message) {
                    (greeting.to_string(), BUILT_IN_MODEL.to_string())
                } else {
                    let generated = self
                        .generation
                        .reply(&context.turns, message, self.max_history_turns)
                        .await;
                    (generated.text, generated.model_used)
                }
            }
        };

        context.record_exchange(message, &reply, routed.intent);
        ChatOutcome {
            reply,
            model_used,
            intent: routed.intent,
            context,
        }
    }
}

fn random_joke() -> String {
    JOKES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(JOKES[0])
        .to_string()
}

fn greeting_reply(message: &str) -> Option<&'static str> {
    let key = message
        .trim()
        .trim_end_matches(|c: char| matches!(c, '!' | '.' | ','))
        .to_lowercase();
    GREETINGS
        .iter()
        .find(|(greeting, _)| *greeting == key)
        .map(|(_, reply)| *reply)
}

/// Chat-side answer for intents the dashboard panels own. The data itself is
/// served by the widget endpoints; chat just points there.
fn panel_pointer(routed: &RoutedCommand) -> String {
    let subject = routed.params.first();
    match routed.intent {
        Intent::Weather => match subject {
            Some(place) => format!("The weather panel has the current conditions for {place}."),
            None => "The weather panel has the current conditions for your location.".to_string(),
        },
        Intent::Stock => match subject {
            Some(symbol) => {
                format!("The stocks panel tracks {symbol}, with price history and sentiment.")
            }
            None => "The stocks panel tracks quotes, price history, and sentiment.".to_string(),
        },
        Intent::News => match subject {
            Some(topic) => format!("The news panel has the latest headlines about {topic}."),
            None => "The news panel has the latest headlines.".to_string(),
        },
        Intent::Translate => match routed.params.as_slice() {
            [text, target] => {
                format!("Use the translator panel to turn \"{text}\" into {target}.")
            }
            _ => "Use the translator panel: pick a language pair and enter your text.".to_string(),
        },
        Intent::Sentiment => match subject {
            Some(text) => format!("The sentiment panel can score \"{text}\" for you."),
            None => "The sentiment panel scores any text you paste as positive or negative."
                .to_string(),
        },
        _ => "One of the dashboard panels covers that.".to_string(),
    }
}
