use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::collections::HashMap;

use crate::types::{GenerationParams, ModelDialect};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub inference: InferenceConfig,
    pub widgets: WidgetsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Transcript turns folded into the generation prompt.
    pub max_history_turns: usize,
    /// Shortest cleaned reply accepted from a backup model.
    pub min_reply_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    pub api_base: String,
    /// Bearer token for the hosted inference API. Absent means every model
    /// call short-circuits and the chains serve their static fallbacks.
    pub api_token: Option<Secret<String>>,
    /// Budget for a single model attempt, not for a whole chain.
    pub request_timeout_ms: u64,
    pub generation: GenerationConfig,
    pub translation: TranslationConfig,
    pub summarization_model: String,
    pub sentiment_model: String,
    pub ner_model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub primary: String,
    pub backup: String,
    pub primary_params: GenerationParams,
    pub backup_params: GenerationParams,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Prefix for pair-encoded model names: `<prefix>-<src>-<tgt>`.
    pub pair_prefix: String,
    /// Exact overrides for language pairs the generic pattern serves badly.
    /// Some entries are deliberately approximate (a neighbouring language's
    /// model) because nothing better is hosted.
    pub specialized: HashMap<String, String>,
    /// Multilingual model attempted for specialized pairs.
    pub specialized_multilingual: String,
    /// General-purpose backups, attempted in order for every pair.
    pub backups: Vec<TranslationBackup>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationBackup {
    pub model: String,
    pub dialect: ModelDialect,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetsConfig {
    pub request_timeout_ms: u64,
    pub cache_ttl_secs: u64,
    pub news: NewsConfig,
    pub stocks: StocksConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    pub api_base: String,
    pub api_key: Option<Secret<String>>,
    pub default_country: String,
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StocksConfig {
    pub api_base: String,
    pub api_key: Option<Secret<String>>,
    pub history_days: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerConfig {
    /// Character budget per summarization chunk.
    pub chunk_chars: usize,
    /// How much of the document head is scanned for named entities.
    pub ner_head_chars: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("OMNIBOARD_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map OMNIBOARD__SERVER__PORT=8080 to server.port
            .add_source(Environment::with_prefix("OMNIBOARD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
            },
            chat: ChatConfig {
                max_history_turns: 10,
                min_reply_chars: 6,
            },
            inference: InferenceConfig {
                api_base: "https://api-inference.huggingface.co/models".into(),
                api_token: None,
                request_timeout_ms: 8000,
                generation: GenerationConfig {
                    primary: "mistralai/Mistral-7B-Instruct-v0.2".into(),
                    backup: "google/flan-t5-large".into(),
                    primary_params: GenerationParams {
                        max_new_tokens: 120,
                        temperature: 0.7,
                        top_p: 0.9,
                        repetition_penalty: 1.2,
                    },
                    backup_params: GenerationParams {
                        max_new_tokens: 80,
                        temperature: 0.9,
                        top_p: 0.95,
                        repetition_penalty: 1.1,
                    },
                },
                translation: TranslationConfig {
                    pair_prefix: "Helsinki-NLP/opus-mt".into(),
                    specialized: [
                        ("en-hi", "Helsinki-NLP/opus-mt-en-hi"),
                        ("hi-en", "Helsinki-NLP/opus-mt-hi-en"),
                        ("en-ur", "Helsinki-NLP/opus-mt-en-ur"),
                        // No hosted Telugu pair model; the Tamil one is the
                        // closest thing and is known to be approximate.
                        ("en-te", "Helsinki-NLP/opus-mt-en-ta"),
                        ("en-ml", "Helsinki-NLP/opus-mt-en-dra"),
                        ("en-kn", "Helsinki-NLP/opus-mt-en-dra"),
                    ]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                    specialized_multilingual: "facebook/mbart-large-50-many-to-many-mmt".into(),
                    backups: vec![
                        TranslationBackup {
                            model: "facebook/m2m100_418M".into(),
                            dialect: ModelDialect::Iso639,
                        },
                        TranslationBackup {
                            model: "facebook/m2m100_1.2B".into(),
                            dialect: ModelDialect::Iso639,
                        },
                    ],
                },
                summarization_model: "facebook/bart-large-cnn".into(),
                sentiment_model: "distilbert-base-uncased-finetuned-sst-2-english".into(),
                ner_model: "dslim/bert-base-NER".into(),
            },
            widgets: WidgetsConfig {
                request_timeout_ms: 6000,
                cache_ttl_secs: 300,
                news: NewsConfig {
                    api_base: "https://newsapi.org/v2".into(),
                    api_key: None,
                    default_country: "us".into(),
                    page_size: 12,
                },
                stocks: StocksConfig {
                    api_base: "https://www.alphavantage.co/query".into(),
                    api_key: None,
                    history_days: 30,
                },
                summarizer: SummarizerConfig {
                    chunk_chars: 2800,
                    ner_head_chars: 1500,
                },
            },
        }
    }
}
