use std::sync::Arc;

use answer_engine::{
    DocsAssistant, EmbeddingsProvider, EngineConfig, EngineError, EngineFuture, Generator,
    IngestionWriter, cfg::DEFAULT_FALLBACK,
};
use api::{AppState, router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use doc_store::{InMemoryDocStore, VectorStoreClient};
use serde_json::{Value, json};
use tower::ServiceExt;

/* ---------------------------- fakes ---------------------------- */

/// Maps "weather" questions away from every stored document.
struct TopicEmbedder;

impl EmbeddingsProvider for TopicEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EngineFuture<'a, Vec<f32>> {
        let v = if text.contains("weather") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![1.0, 0.0, 0.0]
        };
        Box::pin(async move { Ok(v) })
    }
}

struct ScriptedGenerator(&'static str);

impl Generator for ScriptedGenerator {
    fn generate<'a>(&'a self, _parts: &'a [String]) -> EngineFuture<'a, String> {
        let reply = self.0.to_string();
        Box::pin(async move { Ok(reply) })
    }
}

struct BrokenGenerator;

impl Generator for BrokenGenerator {
    fn generate<'a>(&'a self, _parts: &'a [String]) -> EngineFuture<'a, String> {
        Box::pin(async { Err(EngineError::Generation("upstream timeout at 10.0.0.7".into())) })
    }
}

const CURL_REPLY: &str = r#"```json
{
  "content": "Create an order with POST /orders.",
  "API": "POST /orders",
  "code": { "curl": "curl -X POST https://api.example.com/orders" }
}
```"#;

fn app(generator: Arc<dyn Generator>) -> Router {
    let cfg = EngineConfig::default();
    let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(TopicEmbedder);
    let store: Arc<dyn VectorStoreClient> = Arc::new(InMemoryDocStore::new(Some(3)));
    let state = AppState::new(
        DocsAssistant::new(&cfg, embedder.clone(), store.clone(), generator),
        IngestionWriter::new(embedder, store, cfg.namespace.clone()),
    );
    router(Arc::new(state))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn seed(app: &Router) {
    let (status, body) = send(
        app,
        post_json(
            "/api/embedding",
            json!({ "summary": "POST /orders creates an order. Requires a bearer token." }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Embedding stored successfully");
}

/* ---------------------------- search ---------------------------- */

#[tokio::test]
async fn search_returns_structured_answer() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));
    seed(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/search",
            json!({ "question": "Show me a curl example for creating an order", "prev": [] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Create an order with POST /orders.");
    assert_eq!(body["API"], "POST /orders");
    assert_eq!(body["code"]["curl"], "curl -X POST https://api.example.com/orders");
}

#[tokio::test]
async fn low_confidence_search_is_200_with_fallback() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));
    seed(&app).await;

    let (status, body) = send(
        &app,
        post_json("/api/search", json!({ "question": "what is the weather" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "content": DEFAULT_FALLBACK }));
}

#[tokio::test]
async fn missing_or_blank_question_is_400() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));

    for payload in [json!({}), json!({ "question": "  " }), json!({ "prev": ["hi"] })] {
        let (status, body) = send(&app, post_json("/api/search", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing query parameter");
    }
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));
    let req = Request::builder()
        .method("POST")
        .uri("/api/search")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn pipeline_failure_is_generic_500() {
    let app = app(Arc::new(BrokenGenerator));
    seed(&app).await;

    let (status, body) = send(
        &app,
        post_json("/api/search", json!({ "question": "How do I create an order?" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Server error" }));
}

/* --------------------------- embedding --------------------------- */

#[tokio::test]
async fn embedding_requires_summary() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));

    let (status, body) = send(&app, post_json("/api/embedding", json!({ "text": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn embedding_returns_record_id() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));

    let (status, body) = send(
        &app,
        post_json("/api/embedding", json!({ "summary": "GET /users lists users." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().map(str::len), Some(36));
}

/* ---------------------------- health ---------------------------- */

#[tokio::test]
async fn health_is_ok_without_providers() {
    let app = app(Arc::new(ScriptedGenerator(CURL_REPLY)));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "providers": [] }));
}
