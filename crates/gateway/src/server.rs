//! Axum-based HTTP server for the dashboard gateway.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use omniboard_core::{
    types::{ConversationContext, Intent, TranslationRequest},
    Result,
};
use omniboard_inference::{TranslationChain, FALLBACK_MODEL};
use omniboard_widgets::{
    NewsService, SentimentService, StockService, SummarizerService, WeatherService,
};

use crate::chat::ChatEngine;

/// Coordinates served when the client sends none (central London).
const DEFAULT_LATITUDE: f64 = 51.5074;
const DEFAULT_LONGITUDE: f64 = -0.1278;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Shared application state: one instance of every service.
pub struct AppState {
    /// Conversational engine.
    pub chat: ChatEngine,
    /// Translation fallback chain.
    pub translation: TranslationChain,
    /// Headline feed.
    pub news: NewsService,
    /// Synthesized weather.
    pub weather: WeatherService,
    /// Quotes and price history.
    pub stocks: StockService,
    /// Document summarization.
    pub summarizer: SummarizerService,
    /// Standalone sentiment scoring.
    pub sentiment: SentimentService,
}

use metrics_exporter_prometheus::PrometheusHandle;

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(config: GatewayConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
            metrics_handle: None,
        }
    }

    /// Set metrics handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/chat", post(chat_handler))
            .route("/v1/route", post(route_handler))
            .route("/v1/translate", post(translate_handler))
            .route("/v1/news", get(news_handler))
            .route("/v1/weather", get(weather_handler))
            .route("/v1/stocks/:symbol", get(stocks_handler))
            .route("/v1/summarize", post(summarize_handler))
            .route("/v1/sentiment", post(sentiment_handler))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| omniboard_core::Error::internal(format!("Failed to bind: {}", e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| omniboard_core::Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Message content.
    pub message: String,
    /// Conversation context from the previous exchange, if any.
    pub context: Option<ConversationContext>,
}

/// Chat response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Trace ID for this request.
    pub trace_id: String,
    /// Reply text.
    pub reply: String,
    /// Model that produced the reply.
    pub model_used: String,
    /// Classified intent.
    pub intent: Intent,
    /// Updated context to send back on the next exchange.
    pub context: ConversationContext,
}

/// Route-inspection request.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Message to classify.
    pub message: String,
}

/// Route-inspection response.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Trace ID.
    pub trace_id: String,
    /// Classified intent.
    pub intent: Intent,
    /// Extracted parameters.
    pub params: Vec<String>,
}

/// Translation request.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    /// Text to translate.
    pub text: String,
    /// Source language name or code.
    pub source: String,
    /// Target language name or code.
    pub target: String,
}

/// Translation response.
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    /// Trace ID.
    pub trace_id: String,
    /// Translated text, or the unavailability notice.
    pub translation: String,
    /// Model that produced the translation.
    pub model_used: String,
    /// Whether the pair took the specialized-model path.
    pub specialized: bool,
    /// True when every candidate failed and the notice was served.
    pub mock: bool,
}

/// News query parameters.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Headline category (business, technology, ...).
    pub category: Option<String>,
    /// Two-letter country code.
    pub country: Option<String>,
}

/// Weather query parameters.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Longitude in degrees.
    pub lon: Option<f64>,
}

/// Summarization request.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Extracted document text.
    pub text: String,
    /// Page count, when the caller extracted from a paged document.
    pub pages: Option<u32>,
}

/// Sentiment request.
#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    /// Text to score.
    pub text: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Trace ID.
    pub trace_id: Option<String>,
}

fn bad_request(trace_id: String, message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            code: "invalid_request".to_string(),
            message: message.into(),
            trace_id: Some(trace_id),
        }),
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Chat handler.
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "chat").increment(1);

    if payload.message.trim().is_empty() {
        return bad_request(trace_id, "message must not be empty");
    }

    tracing::info!(
        trace_id = %trace_id,
        message_len = payload.message.len(),
        "Processing chat request"
    );

    let context = payload.context.unwrap_or_default();
    let outcome = state.chat.reply(&payload.message, context).await;

    (
        StatusCode::OK,
        Json(ChatResponse {
            trace_id,
            reply: outcome.reply,
            model_used: outcome.model_used,
            intent: outcome.intent,
            context: outcome.context,
        }),
    )
        .into_response()
}

/// Route-inspection handler (for debugging/testing).
async fn route_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RouteRequest>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "route").increment(1);

    let routed = state.chat.route(&payload.message);
    (
        StatusCode::OK,
        Json(RouteResponse {
            trace_id,
            intent: routed.intent,
            params: routed.params,
        }),
    )
        .into_response()
}

/// Translation handler.
async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "translate").increment(1);

    if payload.text.trim().is_empty() {
        return bad_request(trace_id, "text must not be empty");
    }
    if payload.source.trim().is_empty() || payload.target.trim().is_empty() {
        return bad_request(trace_id, "source and target languages are required");
    }

    tracing::info!(
        trace_id = %trace_id,
        source = %payload.source,
        target = %payload.target,
        "Processing translation request"
    );

    let request = TranslationRequest::new(&payload.text, &payload.source, &payload.target);
    let outcome = state.translation.translate(&request).await;
    let mock = outcome.model_used == FALLBACK_MODEL;

    (
        StatusCode::OK,
        Json(TranslateResponse {
            trace_id,
            translation: outcome.text,
            model_used: outcome.model_used,
            specialized: outcome.specialized,
            mock,
        }),
    )
        .into_response()
}

/// News handler.
async fn news_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Response {
    metrics::counter!("http_requests_total", "route" => "news").increment(1);

    let feed = state
        .news
        .top_headlines(query.category.as_deref(), query.country.as_deref())
        .await;
    Json(feed).into_response()
}

/// Weather handler.
async fn weather_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "weather").increment(1);

    let lat = query.lat.unwrap_or(DEFAULT_LATITUDE);
    let lon = query.lon.unwrap_or(DEFAULT_LONGITUDE);
    if !(-90.0..=90.0).contains(&lat) {
        return bad_request(trace_id, "lat must be within -90..=90");
    }
    if !(-180.0..=180.0).contains(&lon) {
        return bad_request(trace_id, "lon must be within -180..=180");
    }

    let report = state.weather.report(lat, lon).await;
    Json(report).into_response()
}

/// Stock quote handler.
async fn stocks_handler(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "stocks").increment(1);

    if symbol.is_empty() || symbol.len() > 5 || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        return bad_request(trace_id, "symbol must be 1-5 letters");
    }

    let quote = state.stocks.quote(&symbol.to_ascii_uppercase()).await;
    Json(quote).into_response()
}

/// Summarization handler.
async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SummarizeRequest>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "summarize").increment(1);

    if payload.text.trim().is_empty() {
        return bad_request(trace_id, "text must not be empty");
    }

    tracing::info!(
        trace_id = %trace_id,
        text_len = payload.text.len(),
        pages = ?payload.pages,
        "Processing summarization request"
    );

    let summary = state.summarizer.summarize(&payload.text, payload.pages).await;
    Json(summary).into_response()
}

/// Sentiment handler.
async fn sentiment_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SentimentRequest>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    metrics::counter!("http_requests_total", "route" => "sentiment").increment(1);

    if payload.text.trim().is_empty() {
        return bad_request(trace_id, "text must not be empty");
    }

    let verdict = state.sentiment.analyze(&payload.text).await;
    Json(verdict).into_response()
}
