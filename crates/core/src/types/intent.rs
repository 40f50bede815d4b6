use serde::{Deserialize, Serialize};

// =============================================================================
// Intent Types (Command Router Output)
// =============================================================================

/// Classified purpose of one user utterance.
///
/// Variants are listed in routing priority order; the router checks patterns
/// in exactly this order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Capability listing.
    Help,
    /// Current time.
    Time,
    /// Current date.
    Date,
    /// One joke from the built-in pool.
    Joke,
    /// Weather conditions, optionally for a named location.
    Weather,
    /// Stock quote for an uppercase ticker.
    Stock,
    /// Headlines, optionally for a topic.
    News,
    /// Translation of quoted text into a named language.
    Translate,
    /// Sentiment verdict for a piece of text.
    Sentiment,
    /// Sentinel: nothing matched, the utterance goes to the model chain.
    None,
}

impl Intent {
    /// Stable lowercase label, as carried in API payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Help => "help",
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::Joke => "joke",
            Intent::Weather => "weather",
            Intent::Stock => "stock",
            Intent::News => "news",
            Intent::Translate => "translate",
            Intent::Sentiment => "sentiment",
            Intent::None => "none",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Router output: the matched intent plus any extracted parameters.
///
/// Parameters are capture groups from the matched pattern, trimmed and with
/// trailing punctuation removed, in pattern order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedCommand {
    /// The matched intent, or [`Intent::None`].
    pub intent: Intent,
    /// Extracted parameters. Empty for parameterless intents.
    #[serde(default)]
    pub params: Vec<String>,
}

impl RoutedCommand {
    /// A command with no parameters.
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            params: Vec::new(),
        }
    }

    /// A command with parameters.
    pub fn with_params(intent: Intent, params: Vec<String>) -> Self {
        Self { intent, params }
    }

    /// The no-match sentinel.
    pub fn none() -> Self {
        Self::new(Intent::None)
    }
}
