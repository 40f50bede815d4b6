use serde::{Deserialize, Serialize};

use super::model::EntitySpan;

// =============================================================================
// Widget Payload Types
// =============================================================================

/// One news article as the dashboard renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<String>,
}

/// A page of headlines. `mock` flags the built-in sample feed served when the
/// provider is unreachable or unconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeed {
    pub articles: Vec<Article>,
    pub mock: bool,
}

/// Current conditions plus a short forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    /// One friendly sentence about the conditions.
    pub description: String,
    /// Icon code in the usual `01d`..`13d` scheme.
    pub icon: String,
    pub forecast: Vec<ForecastDay>,
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub high_c: f64,
    pub low_c: f64,
    pub icon: String,
}

/// Latest quote plus recent closes for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    /// Absolute change since the previous close.
    pub change: f64,
    pub change_pct: f64,
    /// Daily closes, newest first.
    pub closes: Vec<DailyClose>,
    pub sentiment: QuoteSentiment,
    pub mock: bool,
}

/// One daily close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub close: f64,
}

/// Model-read sentiment over a templated price summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSentiment {
    pub label: String,
    pub score: f64,
}

impl QuoteSentiment {
    /// Verdict used when the sentiment model is unavailable.
    pub fn neutral() -> Self {
        Self {
            label: "neutral".into(),
            score: 0.0,
        }
    }
}

/// Output of the chunked document summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub summary: String,
    /// Entities found in the document head.
    pub entities: Vec<EntitySpan>,
    /// How many chunks the document was split into.
    pub chunks: usize,
    /// Page count as reported by the client, if any.
    pub pages: Option<u32>,
}

/// Sentiment verdict for one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    /// Lowercase label, e.g. `positive`, `negative`, `neutral`.
    pub label: String,
    pub score: f64,
    /// True when the model was unavailable and this is the neutral stand-in.
    pub mock: bool,
}
