#![deny(unused)]
//! Omniboard - Widget Dashboard Backend
//!
//! HTTP backend for a browser dashboard: a conversational command router with
//! a multi-model fallback chain, plus news, weather, stocks, summarization,
//! sentiment, and translation widget services.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use omniboard_core::{config::AppConfig, traits::InferenceBackend};
use omniboard_gateway::{AppState, ChatEngine, GatewayConfig, GatewayServer};
use omniboard_inference::{GenerationChain, HostedInferenceClient, TranslationChain};
use omniboard_widgets::{
    NewsService, ResponseCache, SentimentService, StockService, SummarizerService, WeatherService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Omniboard v{}", env!("CARGO_PKG_VERSION"));

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "no config files found, running on built-in defaults");
            AppConfig::default()
        }
    };

    // Key presence is reported once here; dependent calls short-circuit to
    // mock data instead of repeating the warning.
    tracing::info!(
        inference_key = config.inference.api_token.is_some(),
        news_key = config.widgets.news.api_key.is_some(),
        stocks_key = config.widgets.stocks.api_key.is_some(),
        "Provider key status"
    );

    // =========================================================================
    // Inference backend & fallback chains
    // =========================================================================
    let backend: Arc<dyn InferenceBackend> =
        Arc::new(HostedInferenceClient::new(&config.inference)?);

    let generation = Arc::new(GenerationChain::new(
        backend.clone(),
        config.inference.generation.clone(),
        config.chat.min_reply_chars,
    ));
    let translation = TranslationChain::new(backend.clone(), config.inference.translation.clone());

    tracing::info!(
        primary = %config.inference.generation.primary,
        backup = %config.inference.generation.backup,
        translation_backups = config.inference.translation.backups.len(),
        "Fallback chains initialized"
    );

    // =========================================================================
    // Widget services
    // =========================================================================
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.widgets.request_timeout_ms))
        .build()?;
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(
        config.widgets.cache_ttl_secs,
    )));

    let news = NewsService::new(http.clone(), config.widgets.news.clone(), cache.clone());
    let weather = WeatherService::new(backend.clone(), config.inference.generation.backup.clone());
    let stocks = StockService::new(
        http,
        config.widgets.stocks.clone(),
        cache,
        backend.clone(),
        config.inference.sentiment_model.clone(),
    );
    let summarizer = SummarizerService::new(
        backend.clone(),
        config.inference.summarization_model.clone(),
        config.inference.ner_model.clone(),
        config.widgets.summarizer.clone(),
    );
    let sentiment = SentimentService::new(backend, config.inference.sentiment_model.clone());

    tracing::info!("Widget services initialized");

    // =========================================================================
    // Gateway
    // =========================================================================
    let gateway_config = GatewayConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        enable_cors: true,
        enable_tracing: true,
    };

    let state = AppState {
        chat: ChatEngine::new(generation, config.chat.max_history_turns),
        translation,
        news,
        weather,
        stocks,
        summarizer,
        sentiment,
    };

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;
    let server = GatewayServer::new(gateway_config, state).with_metrics(metrics_handle);

    // =========================================================================
    // Print startup banner
    // =========================================================================
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Omniboard v{}                         ║", env!("CARGO_PKG_VERSION"));
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Widget Dashboard Backend                                    ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Endpoints:                                                  ║");
    println!("║    GET  /health          - Health check                      ║");
    println!("║    POST /v1/chat         - Chat with the assistant           ║");
    println!("║    POST /v1/route        - Classify intent only              ║");
    println!("║    POST /v1/translate    - Translate text                    ║");
    println!("║    GET  /v1/news         - Headlines                         ║");
    println!("║    GET  /v1/weather      - Conditions + forecast             ║");
    println!("║    GET  /v1/stocks/:sym  - Quote + history + sentiment       ║");
    println!("║    POST /v1/summarize    - Summarize document text           ║");
    println!("║    POST /v1/sentiment    - Score text sentiment              ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Server: http://{}:{}                              ║", config.server.host, config.server.port);
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    // =========================================================================
    // Start the server
    // =========================================================================
    server.run().await?;

    Ok(())
}
