//! Stock quote widget service.
//!
//! Wraps an Alpha Vantage-style daily-series endpoint. A quote is the latest
//! close, the change against the previous close, and a window of recent
//! closes for the sparkline. Whatever the data source, a sentiment model
//! reads a templated one-line price summary and its verdict rides along;
//! when that model is unreachable the verdict is neutral.
//!
//! No provider key, or a failed call, produces a deterministic mock series
//! seeded from the ticker, so the same symbol always draws the same chart.

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

use omniboard_core::{
    config::StocksConfig,
    traits::InferenceBackend,
    types::{DailyClose, QuoteSentiment, StockQuote},
    Error, Result,
};

use crate::cache::ResponseCache;

pub struct StockService {
    http: reqwest::Client,
    config: StocksConfig,
    cache: Arc<ResponseCache>,
    backend: Arc<dyn InferenceBackend>,
    sentiment_model: String,
}

impl StockService {
    pub fn new(
        http: reqwest::Client,
        config: StocksConfig,
        cache: Arc<ResponseCache>,
        backend: Arc<dyn InferenceBackend>,
        sentiment_model: String,
    ) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("stocks API key not configured, the quotes widget will serve mock series");
        }
        Self {
            http,
            config,
            cache,
            backend,
            sentiment_model,
        }
    }

    /// Quote for one ticker. Total: a mock series stands in whenever the
    /// provider can't.
    pub async fn quote(&self, symbol: &str) -> StockQuote {
        let key = cache_key(symbol);
        if let Some(quote) = self.cache.get::<StockQuote>(&key) {
            return quote;
        }

        let (closes, mock) = if self.config.api_key.is_none() {
            metrics::counter!("widget_mock_serves_total", "widget" => "stocks").increment(1);
            (mock_series(symbol, self.config.history_days), true)
        } else {
            match self.fetch_series(symbol).await {
                Ok(closes) => (closes, false),
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "stocks provider unavailable, serving mock series");
                    metrics::counter!("widget_mock_serves_total", "widget" => "stocks")
                        .increment(1);
                    (mock_series(symbol, self.config.history_days), true)
                }
            }
        };

        let mut quote = assemble_quote(symbol, closes, mock);
        quote.sentiment = self.read_sentiment(&quote).await;

        if !quote.mock {
            self.cache.put(&key, &quote);
        }
        quote
    }

    async fn fetch_series(&self, symbol: &str) -> Result<Vec<DailyClose>> {
        let api_key = match self.config.api_key.as_ref() {
            Some(k) => k,
            None => return Err(Error::MissingApiKey("stocks")),
        };

        let response = self
            .http
            .get(&self.config.api_base)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(format!("stocks provider: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "stocks provider returned HTTP {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("stocks provider: {e}")))?;
        parse_daily_closes(&body, self.config.history_days)
    }

    /// Ask the sentiment model to read a templated price summary. Neutral
    /// when the model is unreachable or answers nothing usable.
    async fn read_sentiment(&self, quote: &StockQuote) -> QuoteSentiment {
        let summary = price_summary(quote);
        match self
            .backend
            .classification(&self.sentiment_model, &summary)
            .await
        {
            Ok(scores) if !scores.is_empty() => QuoteSentiment {
                label: scores[0].label.to_lowercase(),
                score: scores[0].score,
            },
            Ok(_) => QuoteSentiment::neutral(),
            Err(e) => {
                tracing::debug!(error = %e, "quote sentiment model unavailable");
                QuoteSentiment::neutral()
            }
        }
    }
}

fn cache_key(symbol: &str) -> String {
    format!("stocks:{symbol}")
}

/// One line the sentiment model can read without seeing raw numbers arrays.
fn price_summary(quote: &StockQuote) -> String {
    let direction = if quote.change >= 0.0 { "up" } else { "down" };
    let (low, high) = quote
        .closes
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), c| {
            (lo.min(c.close), hi.max(c.close))
        });

    format!(
        "{} is trading at {:.2}, {} {:.2} ({:.2}%) over the last session, \
         with a {}-day range of {:.2} to {:.2}.",
        quote.symbol,
        quote.price,
        direction,
        quote.change.abs(),
        quote.change_pct.abs(),
        quote.closes.len(),
        low,
        high
    )
}

/// Turn a close series (newest first) into a quote. Change falls back to
/// zero when the series is too short to compare.
fn assemble_quote(symbol: &str, closes: Vec<DailyClose>, mock: bool) -> StockQuote {
    let price = closes.first().map(|c| c.close).unwrap_or(0.0);
    let previous = closes.get(1).map(|c| c.close);

    let (change, change_pct) = match previous {
        Some(prev) if prev != 0.0 => {
            let change = round2(price - prev);
            (change, round2(change / prev * 100.0))
        }
        _ => (0.0, 0.0),
    };

    StockQuote {
        symbol: symbol.to_string(),
        price,
        change,
        change_pct,
        closes,
        sentiment: QuoteSentiment::neutral(),
        mock,
    }
}

/// Decode the provider payload: a `"Time Series (Daily)"` object keyed by
/// ISO date, each day an object of stringified prices. Rate-limit notes and
/// unknown-symbol errors arrive as different top-level keys, so a missing
/// series object covers those too.
fn parse_daily_closes(body: &Value, history_days: usize) -> Result<Vec<DailyClose>> {
    let series = body
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            let note = body
                .get("Note")
                .or_else(|| body.get("Error Message"))
                .and_then(Value::as_str)
                .unwrap_or("missing daily series");
            Error::data_shape(format!("stocks provider: {note}"))
        })?;

    let mut closes: Vec<DailyClose> = series
        .iter()
        .filter_map(|(date, day)| {
            let close = day.get("4. close")?.as_str()?.parse::<f64>().ok()?;
            Some(DailyClose {
                date: date.clone(),
                close: round2(close),
            })
        })
        .collect();

    if closes.is_empty() {
        return Err(Error::data_shape("stocks provider: empty daily series"));
    }

    // ISO dates sort lexicographically; newest first.
    closes.sort_by(|a, b| b.date.cmp(&a.date));
    closes.truncate(history_days);
    Ok(closes)
}

/// Deterministic mock series seeded from the ticker: a base price from the
/// symbol plus a bounded daily walk, on calendar days back from today.
fn mock_series(symbol: &str, history_days: usize) -> Vec<DailyClose> {
    let mut seed = 0xcbf2_9ce4_8422_2325u64;
    for byte in symbol.as_bytes() {
        seed ^= u64::from(*byte);
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let days = history_days.max(2);
    let mut price = rng.gen_range(25.0..480.0);
    let mut walk = Vec::with_capacity(days);
    for _ in 0..days {
        walk.push(round2(price));
        price *= 1.0 + rng.gen_range(-0.025..0.025);
    }
    // The walk ran oldest to newest; the series is served newest first.
    walk.reverse();

    let today = Utc::now().date_naive();
    walk.into_iter()
        .enumerate()
        .filter_map(|(offset, close)| {
            let date = today.checked_sub_days(chrono::Days::new(offset as u64))?;
            Some(DailyClose {
                date: date.to_string(),
                close,
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniboard_core::mocks::MockBackend;
    use omniboard_core::types::LabelScore;
    use serde_json::json;
    use std::time::Duration;

    fn keyless_config() -> StocksConfig {
        StocksConfig {
            api_base: "https://stocks.invalid/query".into(),
            api_key: None,
            history_days: 30,
        }
    }

    fn service(backend: Arc<MockBackend>) -> StockService {
        StockService::new(
            reqwest::Client::new(),
            keyless_config(),
            Arc::new(ResponseCache::new(Duration::from_secs(60))),
            backend,
            "sentiment/model".into(),
        )
    }

    #[test]
    fn mock_series_is_deterministic_per_symbol() {
        assert_eq!(mock_series("AAPL", 30), mock_series("AAPL", 30));
        assert_ne!(
            mock_series("AAPL", 30)[0].close,
            mock_series("MSFT", 30)[0].close
        );
    }

    #[test]
    fn mock_series_is_newest_first_and_sized() {
        let series = mock_series("AAPL", 30);
        assert_eq!(series.len(), 30);
        assert!(series[0].date > series[1].date);
        assert!(series.iter().all(|c| c.close > 0.0));
    }

    #[test]
    fn assemble_quote_derives_change_from_top_two_closes() {
        let closes = vec![
            DailyClose {
                date: "2026-08-24".into(),
                close: 102.0,
            },
            DailyClose {
                date: "2026-08-23".into(),
                close: 100.0,
            },
        ];
        let quote = assemble_quote("TEST", closes, false);
        assert_eq!(quote.price, 102.0);
        assert!((quote.change - 2.0).abs() < 1e-9);
        assert!((quote.change_pct - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_close_means_zero_change() {
        let closes = vec![DailyClose {
            date: "2026-08-24".into(),
            close: 50.0,
        }];
        let quote = assemble_quote("TEST", closes, true);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_pct, 0.0);
    }

    #[test]
    fn parse_daily_closes_orders_and_truncates() {
        let body = json!({
            "Time Series (Daily)": {
                "2026-08-20": { "4. close": "100.00" },
                "2026-08-22": { "4. close": "104.50" },
                "2026-08-21": { "4. close": "102.25" }
            }
        });
        let closes = parse_daily_closes(&body, 2).unwrap();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[0].date, "2026-08-22");
        assert_eq!(closes[0].close, 104.5);
        assert_eq!(closes[1].date, "2026-08-21");
    }

    #[test]
    fn parse_daily_closes_surfaces_rate_limit_notes() {
        let body = json!({ "Note": "Thank you for using our API, slow down." });
        let err = parse_daily_closes(&body, 30).unwrap_err();
        assert!(err.to_string().contains("slow down"));
    }

    #[tokio::test]
    async fn keyless_quote_is_mock_with_neutral_sentiment() {
        let backend = Arc::new(MockBackend::new());
        let quote = service(backend.clone()).quote("AAPL").await;

        assert!(quote.mock);
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.closes.len(), 30);
        assert_eq!(quote.sentiment.label, "neutral");
        // The sentiment model was consulted even for mock data.
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn sentiment_verdict_rides_along_when_the_model_answers() {
        let backend = Arc::new(MockBackend::new().with_classification(vec![
            LabelScore {
                label: "POSITIVE".into(),
                score: 0.93,
            },
            LabelScore {
                label: "NEGATIVE".into(),
                score: 0.07,
            },
        ]));
        let quote = service(backend).quote("AAPL").await;

        assert_eq!(quote.sentiment.label, "positive");
        assert!((quote.sentiment.score - 0.93).abs() < 1e-9);
    }

    #[tokio::test]
    async fn cached_quote_short_circuits() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let seeded = assemble_quote(
            "AAPL",
            vec![DailyClose {
                date: "2026-08-24".into(),
                close: 200.0,
            }],
            false,
        );
        cache.put(&cache_key("AAPL"), &seeded);

        let backend = Arc::new(MockBackend::new());
        let served = StockService::new(
            reqwest::Client::new(),
            keyless_config(),
            cache,
            backend.clone(),
            "sentiment/model".into(),
        )
        .quote("AAPL")
        .await;

        assert_eq!(served, seeded);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn price_summary_reads_naturally() {
        let quote = assemble_quote(
            "AAPL",
            vec![
                DailyClose {
                    date: "2026-08-24".into(),
                    close: 98.0,
                },
                DailyClose {
                    date: "2026-08-23".into(),
                    close: 100.0,
                },
            ],
            false,
        );
        let summary = price_summary(&quote);
        assert!(summary.starts_with("AAPL is trading at 98.00, down 2.00"));
        assert!(summary.contains("2-day range of 98.00 to 100.00"));
    }
}
