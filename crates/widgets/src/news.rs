//! Headlines widget service.
//!
//! Wraps a NewsAPI-style provider: `GET <api_base>/top-headlines` with
//! country/category query parameters and a key. A missing key is reported
//! once at construction and the service then serves its built-in sample feed;
//! provider failures at call time degrade the same way. Live payloads are
//! cached for the configured TTL.

use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

use omniboard_core::{
    config::NewsConfig,
    types::{Article, NewsFeed},
    Error, Result,
};

use crate::cache::ResponseCache;

pub struct NewsService {
    http: reqwest::Client,
    config: NewsConfig,
    cache: Arc<ResponseCache>,
}

impl NewsService {
    pub fn new(http: reqwest::Client, config: NewsConfig, cache: Arc<ResponseCache>) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("news API key not configured, the headlines widget will serve sample data");
        }
        Self {
            http,
            config,
            cache,
        }
    }

    /// Current headlines. Total: the sample feed stands in whenever the
    /// provider can't.
    pub async fn top_headlines(&self, category: Option<&str>, country: Option<&str>) -> NewsFeed {
        let country = country.unwrap_or(&self.config.default_country);
        let category = category.unwrap_or("general");
        let key = cache_key(category, country);

        if let Some(feed) = self.cache.get::<NewsFeed>(&key) {
            return feed;
        }

        if self.config.api_key.is_none() {
            metrics::counter!("widget_mock_serves_total", "widget" => "news").increment(1);
            return sample_feed();
        }

        match self.fetch(category, country).await {
            Ok(articles) => {
                let feed = NewsFeed {
                    articles,
                    mock: false,
                };
                self.cache.put(&key, &feed);
                feed
            }
            Err(e) => {
                tracing::warn!(error = %e, "news provider unavailable, serving sample feed");
                metrics::counter!("widget_mock_serves_total", "widget" => "news").increment(1);
                sample_feed()
            }
        }
    }

    async fn fetch(&self, category: &str, country: &str) -> Result<Vec<Article>> {
        // Key presence is checked by the caller.
        let api_key = match self.config.api_key.as_ref() {
            Some(k) => k,
            None => return Err(Error::MissingApiKey("news")),
        };

        let url = format!("{}/top-headlines", self.config.api_base.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[
                ("country", country),
                ("category", category),
                ("pageSize", &self.config.page_size.to_string()),
                ("apiKey", api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(format!("news provider: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "news provider returned HTTP {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("news provider: {e}")))?;
        parse_articles(&body)
    }
}

fn cache_key(category: &str, country: &str) -> String {
    format!("news:{category}:{country}")
}

/// Decode the provider payload. The provider reports some errors inside an
/// HTTP 200 body, so the status field is checked too.
fn parse_articles(body: &Value) -> Result<Vec<Article>> {
    if let Some(status) = body.get("status").and_then(Value::as_str) {
        if status != "ok" {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            return Err(Error::data_shape(format!(
                "news provider status {status}: {message}"
            )));
        }
    }

    let items = body
        .get("articles")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::data_shape("missing `articles` in news response"))?;

    Ok(items
        .iter()
        .map(|item| {
            let text = |field: &str| {
                item.get(field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
            };
            Article {
                title: text("title").unwrap_or_else(|| "(untitled)".to_string()),
                description: text("description"),
                url: text("url"),
                image_url: text("urlToImage"),
                published_at: text("publishedAt"),
                source: item
                    .pointer("/source/name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        })
        .collect())
}

/// Fixed feed served when the provider can't be reached.
fn sample_feed() -> NewsFeed {
    let article = |title: &str, description: &str, source: &str| Article {
        title: title.to_string(),
        description: Some(description.to_string()),
        url: None,
        image_url: None,
        published_at: None,
        source: Some(source.to_string()),
    };

    NewsFeed {
        articles: vec![
            article(
                "Markets steady as investors weigh rate outlook",
                "Major indices held their ground through a quiet session while traders waited for fresh inflation data.",
                "Sample Business Desk",
            ),
            article(
                "New open-weight language models narrow the gap",
                "Community benchmarks show freely hosted models closing in on proprietary systems for everyday tasks.",
                "Sample Tech Desk",
            ),
            article(
                "City transit pilot expands to three more districts",
                "The on-demand shuttle program doubled its coverage area after a well-received first quarter.",
                "Sample Metro Desk",
            ),
            article(
                "Weekend forecast: mild with a chance of showers",
                "Meteorologists expect a mostly pleasant weekend, with brief showers moving through late on Sunday.",
                "Sample Weather Desk",
            ),
        ],
        mock: true,
    }
}
