//! Command router for classifying chat utterances.
//!
//! A fixed, ordered table of patterns. The first match wins, which is the
//! whole contract: meta-queries ("help", "what time is it") sit above the
//! topic intents so "tell me a joke about the weather" is a joke, not a
//! forecast. Anything that matches nothing becomes the `None` sentinel and
//! gets handed to the generation chain.
//!
//! Routing is total and pure: no I/O, no state, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use omniboard_core::types::{Intent, RoutedCommand};

/// One row of the routing table.
struct Rule {
    intent: Intent,
    pattern: Regex,
}

fn rule(intent: Intent, pattern: &str) -> Rule {
    Rule {
        intent,
        pattern: Regex::new(pattern).expect("routing pattern must compile"),
    }
}

/// The table, in priority order.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(Intent::Help, r"(?i)\bhelp\b|\bwhat can you do\b"),
        rule(
            Intent::Time,
            r"(?i)what(?:'s|\s+is)?\s+(?:the\s+)?time\b|\bcurrent\s+time\b|\btime\s+now\b",
        ),
        rule(
            Intent::Date,
            r"(?i)what(?:'s|\s+is)?\s+(?:today'?s\s+date|the\s+date)|\bwhat\s+day\s+is\s+(?:it|today)\b|\btoday'?s\s+date\b|\bcurrent\s+date\b",
        ),
        rule(
            Intent::Joke,
            r"(?i)\bjokes?\b|\bmake\s+me\s+laugh\b|\bsomething\s+funny\b",
        ),
        rule(
            Intent::Weather,
            r"(?i)\b(?:weather|forecast)\b(?:.*?\b(?:in|at|for)\b\s*(.+?)\s*[?!.]*$)?",
        ),
        rule(
            Intent::Stock,
            r"(?i:\b(?:stocks?|shares?|ticker)\b)(?:.*?\b([A-Z]{1,5})\b)?",
        ),
        rule(
            Intent::News,
            r"(?i)\b(?:news|headlines?)\b(?:.*?\b(?:about|on|regarding)\b\s*(.+?)\s*[?!.]*$)?",
        ),
        rule(
            Intent::Translate,
            r#"(?i)\btranslate\b(?:\s*[:,]?\s*["'“”]([^"'“”]+)["'“”]\s+(?:in)?to\s+([a-zA-Z]+))?"#,
        ),
        rule(
            Intent::Sentiment,
            r#"(?i)\bsentiment\b(?:.*?\b(?:of|for)\b\s*["'“”]?(.+?)["'“”]?\s*[?!.]*$)?|(?i)\bhow\s+(?:positive|negative)\b"#,
        ),
    ]
});

/// Ordered-pattern command router.
pub struct CommandRouter;

impl CommandRouter {
    pub fn new() -> Self {
        Self
    }

    /// Classify one utterance. First matching rule wins.
    pub fn route(&self, text: &str) -> RoutedCommand {
        let text = text.trim();
        if text.is_empty() {
            return RoutedCommand::none();
        }

        for rule in RULES.iter() {
            if let Some(captures) = rule.pattern.captures(text) {
                let params = captures
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| clean_param(m.as_str()))
                    .filter(|p| !p.is_empty())
                    .collect();
                return RoutedCommand::with_params(rule.intent, params);
            }
        }
        RoutedCommand::none()
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the noise a loose capture drags along: outer whitespace, quotes,
/// stray punctuation.
fn clean_param(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '?' | '!' | '.' | ',' | ':'))
        .trim()
        .to_string()
}
