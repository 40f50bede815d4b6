//! End-to-end tests over the default configuration: the wiring `main` does,
//! with the scripted mock backend in place of the hosted inference API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use omniboard_core::{config::AppConfig, mocks::MockBackend, traits::InferenceBackend};
use omniboard_gateway::{AppState, ChatEngine, GatewayConfig, GatewayServer};
use omniboard_inference::{GenerationChain, TranslationChain};
use omniboard_widgets::{
    NewsService, ResponseCache, SentimentService, StockService, SummarizerService, WeatherService,
};

/// The production wiring on the default (keyless) config, backed by a mock.
fn system(backend: Arc<MockBackend>) -> Router {
    let config = AppConfig::default();
    let backend: Arc<dyn InferenceBackend> = backend;

    let http = reqwest::Client::new();
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(
        config.widgets.cache_ttl_secs,
    )));

    let state = AppState {
        chat: ChatEngine::new(
            Arc::new(GenerationChain::new(
                backend.clone(),
                config.inference.generation.clone(),
                config.chat.min_reply_chars,
            )),
            config.chat.max_history_turns,
        ),
        translation: TranslationChain::new(backend.clone(), config.inference.translation.clone()),
        news: NewsService::new(http.clone(), config.widgets.news.clone(), cache.clone()),
        weather: WeatherService::new(backend.clone(), config.inference.generation.backup.clone()),
        stocks: StockService::new(
            http,
            config.widgets.stocks.clone(),
            cache,
            backend.clone(),
            config.inference.sentiment_model.clone(),
        ),
        summarizer: SummarizerService::new(
            backend.clone(),
            config.inference.summarization_model.clone(),
            config.inference.ner_model.clone(),
            config.widgets.summarizer.clone(),
        ),
        sentiment: SentimentService::new(backend, config.inference.sentiment_model.clone()),
    };

    GatewayServer::new(GatewayConfig::default(), state).build_router()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn a_session_runs_from_greeting_to_model_path() {
    let backend = Arc::new(
        MockBackend::new()
            // One scripted reply for the one utterance that reaches a model.
            .with_generation("Rust is a systems programming language."),
    );
    let app = system(backend.clone());

    // Greeting: answered by the built-in table, zero inference calls.
    let (status, reply) = send(&app, post("/v1/chat", json!({ "message": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["model_used"], "built-in");
    assert_eq!(backend.call_count(), 0);

    // Help: local handler.
    let mut context = reply["context"].clone();
    let (_, reply) = send(
        &app,
        post("/v1/chat", json!({ "message": "help", "context": context })),
    )
    .await;
    assert_eq!(reply["intent"], "help");
    context = reply["context"].clone();

    // Widget intent on the chat path: the panel pointer, still no model.
    let (_, reply) = send(
        &app,
        post(
            "/v1/chat",
            json!({ "message": "what's the weather in Paris?", "context": context }),
        ),
    )
    .await;
    assert_eq!(reply["intent"], "weather");
    assert!(reply["reply"].as_str().unwrap().contains("Paris"));
    assert_eq!(backend.call_count(), 0);
    context = reply["context"].clone();

    // Unmatched utterance: the generation chain answers.
    let (_, reply) = send(
        &app,
        post(
            "/v1/chat",
            json!({ "message": "tell me about rust", "context": context }),
        ),
    )
    .await;
    assert_eq!(reply["intent"], "none");
    assert_eq!(reply["reply"], "Rust is a systems programming language.");
    assert_eq!(reply["context"]["message_count"], 4);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn default_translation_chain_walks_in_documented_order() {
    // Specialized pair, everything down: override, then mBART, then both
    // default backups, then the placeholder.
    let backend = Arc::new(
        MockBackend::new()
            .with_translation_failure("404")
            .with_translation_failure("503")
            .with_translation_failure("503")
            .with_translation_failure("503"),
    );
    let app = system(backend.clone());

    let (status, reply) = send(
        &app,
        post(
            "/v1/translate",
            json!({ "text": "greetings", "source": "english", "target": "telugu" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        backend.models_seen(),
        vec![
            // The documented approximation: Telugu served by the Tamil model.
            "Helsinki-NLP/opus-mt-en-ta",
            "facebook/mbart-large-50-many-to-many-mmt",
            "facebook/m2m100_418M",
            "facebook/m2m100_1.2B",
        ]
    );
    assert_eq!(reply["model_used"], "fallback");
    assert_eq!(reply["specialized"], true);
}

#[tokio::test]
async fn keyless_widgets_all_degrade_to_flagged_mock_data() {
    let backend = Arc::new(MockBackend::new());
    let app = system(backend);

    let (status, news) = send(
        &app,
        Request::builder()
            .uri("/v1/news")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(news["mock"], true);

    let (status, quote) = send(
        &app,
        Request::builder()
            .uri("/v1/stocks/MSFT")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["mock"], true);
    assert_eq!(quote["sentiment"]["label"], "neutral");

    let (status, weather) = send(
        &app,
        Request::builder()
            .uri("/v1/weather")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // No coordinates given: the default location answers.
    assert!(weather["temperature_c"].is_number());
    assert_eq!(weather["forecast"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn summarization_fans_out_and_rejoins_in_order() {
    let text = "The committee reviewed the annual report in detail. ".repeat(100);
    // Default chunking splits this into two chunks; entities seed the first.
    let backend = Arc::new(
        MockBackend::new()
            .with_entities(vec![omniboard_core::types::EntitySpan {
                text: "The Committee".into(),
                label: "ORG".into(),
                score: 0.95,
            }])
            .with_summary("First half.")
            .with_summary("Second half."),
    );
    let app = system(backend.clone());

    let (status, reply) = send(&app, post("/v1/summarize", json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["summary"], "First half. Second half.");
    assert_eq!(reply["chunks"], 2);
    assert_eq!(reply["entities"][0]["text"], "The Committee");
    assert!(backend.inputs_seen()[1].starts_with("Key entities: The Committee."));
}
