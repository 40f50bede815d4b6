use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use omniboard_core::{
    config::{
        GenerationConfig, NewsConfig, StocksConfig, SummarizerConfig, TranslationBackup,
        TranslationConfig,
    },
    mocks::MockBackend,
    types::{GenerationParams, ModelDialect},
};
use omniboard_gateway::{AppState, ChatEngine, GatewayConfig, GatewayServer};
use omniboard_inference::{GenerationChain, TranslationChain};
use omniboard_widgets::{
    NewsService, ResponseCache, SentimentService, StockService, SummarizerService, WeatherService,
};

/// Full router wired to one scripted backend and no provider keys, the same
/// shape `main` builds, minus the network.
fn app(backend: Arc<MockBackend>) -> Router {
    let generation_config = GenerationConfig {
        primary: "primary/model".into(),
        backup: "backup/model".into(),
        primary_params: GenerationParams::default(),
        backup_params: GenerationParams::default(),
    };
    let translation_config = TranslationConfig {
        pair_prefix: "Helsinki-NLP/opus-mt".into(),
        specialized: [("en-hi".to_string(), "Helsinki-NLP/opus-mt-en-hi".to_string())]
            .into_iter()
            .collect(),
        specialized_multilingual: "facebook/mbart-large-50-many-to-many-mmt".into(),
        backups: vec![TranslationBackup {
            model: "facebook/m2m100_418M".into(),
            dialect: ModelDialect::Iso639,
        }],
    };

    let http = reqwest::Client::new();
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
    let backend: Arc<dyn omniboard_core::traits::InferenceBackend> = backend;

    let state = AppState {
        chat: ChatEngine::new(
            Arc::new(GenerationChain::new(
                backend.clone(),
                generation_config,
                6,
            )),
            10,
        ),
        translation: TranslationChain::new(backend.clone(), translation_config),
        news: NewsService::new(
            http.clone(),
            NewsConfig {
                api_base: "https://newsapi.invalid/v2".into(),
                api_key: None,
                default_country: "us".into(),
                page_size: 12,
            },
            cache.clone(),
        ),
        weather: WeatherService::new(backend.clone(), "backup/model".into()),
        stocks: StockService::new(
            http,
            StocksConfig {
                api_base: "https://stocks.invalid/query".into(),
                api_key: None,
                history_days: 30,
            },
            cache,
            backend.clone(),
            "sentiment/model".into(),
        ),
        summarizer: SummarizerService::new(
            backend.clone(),
            "sum/model".into(),
            "ner/model".into(),
            SummarizerConfig {
                chunk_chars: 300,
                ner_head_chars: 200,
            },
        ),
        sentiment: SentimentService::new(backend, "sentiment/model".into()),
    };

    GatewayServer::new(GatewayConfig::default(), state).build_router()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn chat_greeting_short_circuits_without_inference() {
    let backend = Arc::new(MockBackend::new());
    let response = app(backend.clone())
        .oneshot(post("/v1/chat", json!({ "message": "Hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model_used"], "built-in");
    assert_eq!(json["intent"], "none");
    assert!(!json["reply"].as_str().unwrap().is_empty());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn chat_returns_the_updated_context() {
    let backend = Arc::new(MockBackend::new().with_generation("An answer."));
    let app = app(backend);

    let response = app
        .clone()
        .oneshot(post("/v1/chat", json!({ "message": "tell me about rust" })))
        .await
        .unwrap();
    let first = body_json(response).await;
    assert_eq!(first["context"]["message_count"], 1);
    assert_eq!(first["reply"], "An answer.");
    assert_eq!(first["model_used"], "primary/model");

    // Threading the returned context keeps the count moving.
    let response = app
        .oneshot(post(
            "/v1/chat",
            json!({ "message": "what time is it?", "context": first["context"] }),
        ))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["intent"], "time");
    assert_eq!(second["context"]["message_count"], 2);
}

#[tokio::test]
async fn chat_rejects_empty_messages() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(post("/v1/chat", json!({ "message": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "invalid_request");
}

#[tokio::test]
async fn chat_survives_a_fully_failed_chain() {
    let backend = Arc::new(
        MockBackend::new()
            .with_generation_failure("down")
            .with_generation_failure("down"),
    );
    let response = app(backend)
        .oneshot(post("/v1/chat", json!({ "message": "tell me about rust" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model_used"], "fallback");
    assert!(!json["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn route_classifies_without_replying() {
    let backend = Arc::new(MockBackend::new());
    let response = app(backend.clone())
        .oneshot(post(
            "/v1/route",
            json!({ "message": "What's the stock price of AAPL" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["intent"], "stock");
    assert_eq!(json["params"], json!(["AAPL"]));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn translate_reports_the_model_used() {
    let backend = Arc::new(MockBackend::new().with_translation("bonjour"));
    let response = app(backend)
        .oneshot(post(
            "/v1/translate",
            json!({ "text": "hello", "source": "english", "target": "french" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["translation"], "bonjour");
    assert_eq!(json["model_used"], "Helsinki-NLP/opus-mt-en-fr");
    assert_eq!(json["specialized"], false);
    assert_eq!(json["mock"], false);
}

#[tokio::test]
async fn translate_is_total_when_every_model_fails() {
    let backend = Arc::new(
        MockBackend::new()
            .with_translation_failure("down")
            .with_translation_failure("down"),
    );
    let response = app(backend)
        .oneshot(post(
            "/v1/translate",
            json!({ "text": "hello", "source": "en", "target": "fr" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model_used"], "fallback");
    assert_eq!(json["mock"], true);
    assert!(json["translation"]
        .as_str()
        .unwrap()
        .contains("unavailable"));
}

#[tokio::test]
async fn translate_rejects_missing_languages() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(post(
            "/v1/translate",
            json!({ "text": "hello", "source": "", "target": "fr" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn keyless_news_serves_the_flagged_sample_feed() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(get("/v1/news?category=technology"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["mock"], true);
    assert!(!json["articles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn weather_serves_a_report_with_forecast() {
    // One generation attempt for the description; let it fail to the canned
    // sentence.
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(get("/v1/weather?lat=48.85&lon=2.35"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["latitude"], 48.85);
    assert_eq!(json["forecast"].as_array().unwrap().len(), 5);
    assert!(!json["description"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn weather_rejects_out_of_range_coordinates() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(get("/v1/weather?lat=120.0&lon=0.0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn keyless_stock_quote_is_mock_and_uppercased() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(get("/v1/stocks/aapl"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["mock"], true);
    assert_eq!(json["closes"].as_array().unwrap().len(), 30);
    assert_eq!(json["sentiment"]["label"], "neutral");
}

#[tokio::test]
async fn stocks_rejects_malformed_tickers() {
    for bad in ["TOOLONG", "AB1"] {
        let response = app(Arc::new(MockBackend::new()))
            .oneshot(get(&format!("/v1/stocks/{bad}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "symbol: {bad}");
    }
}

#[tokio::test]
async fn summarize_stitches_chunks() {
    let backend = Arc::new(
        MockBackend::new()
            .with_entities_failure("ner down")
            .with_summary("A summary."),
    );
    let response = app(backend)
        .oneshot(post(
            "/v1/summarize",
            json!({ "text": "A short report about the quarter.", "pages": 2 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["summary"], "A summary.");
    assert_eq!(json["chunks"], 1);
    assert_eq!(json["pages"], 2);
}

#[tokio::test]
async fn sentiment_scores_text() {
    let backend = Arc::new(MockBackend::new().with_classification(vec![
        omniboard_core::types::LabelScore {
            label: "POSITIVE".into(),
            score: 0.97,
        },
    ]));
    let response = app(backend)
        .oneshot(post("/v1/sentiment", json!({ "text": "I love this" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["label"], "positive");
    assert_eq!(json["mock"], false);
}

#[tokio::test]
async fn sentiment_rejects_empty_text() {
    let response = app(Arc::new(MockBackend::new()))
        .oneshot(post("/v1/sentiment", json!({ "text": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
