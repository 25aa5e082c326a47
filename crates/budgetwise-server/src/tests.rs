//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use budgetwise_core::test_utils::{MockGeminiServer, MOCK_API_KEY};
use budgetwise_core::{ai::MOCK_BUDGET_NARRATIVE, ChatContext, GeminiBackend, MockBackend};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(ai: Option<AIClient>) -> Router {
    let state = AppState::new(
        ai,
        Glossary::builtin().unwrap(),
        GenerationConfig::default(),
    );
    create_router(Arc::new(state), None, &ServerConfig::default())
}

fn setup_test_app() -> Router {
    app_with(Some(AIClient::mock()))
}

fn setup_app_without_ai() -> Router {
    app_with(None)
}

async fn get_body_json(response: axum::response::Response) -> Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: Router, uri: &str, body: Value) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

fn scenario_budget() -> Value {
    json!({
        "monthly_income": 3000,
        "expenses": {"rent": 1000, "food": 400, "savings": 300},
        "goal": "emergency_fund"
    })
}

// ========== Health ==========

#[tokio::test]
async fn test_health_with_ai() {
    let response = get(setup_test_app(), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ai_configured"], true);
    assert_eq!(json["backend"], "mock");
    assert_eq!(json["model"], "mock");
}

#[tokio::test]
async fn test_health_without_ai() {
    let json = get_body_json(get(setup_app_without_ai(), "/api/health").await).await;
    assert_eq!(json["ai_configured"], false);
    assert!(json.get("backend").is_none());
}

// ========== Analyze ==========

#[tokio::test]
async fn test_analyze_without_ai_uses_fallback() {
    let response = post_json(setup_app_without_ai(), "/api/analyze", scenario_budget()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["goal"], "emergency_fund");
    assert!(json["financial_advice"]
        .as_str()
        .unwrap()
        .starts_with("Based on your income of $3000.00"));
    assert_eq!(json["saving_plan"]["months_1_3"].as_array().unwrap().len(), 3);
    assert_eq!(json["breakdown"][0]["category"], "Rent");
    assert_eq!(json["breakdown"][0]["percentage"], 33.3);
    assert_eq!(json["breakdown"][2]["percentage"], 10.0);
    assert!(json["insights"]
        .as_array()
        .unwrap()
        .contains(&json!("50/30/20 guideline: 50% needs, 30% wants, 20% savings")));
}

#[tokio::test]
async fn test_analyze_with_mock_ai() {
    let json = get_body_json(post_json(setup_test_app(), "/api/analyze", scenario_budget()).await).await;
    let tips = json["saving_tips"].as_array().unwrap();
    assert_eq!(tips[0], "Move leftover money to savings on payday.");
    assert_eq!(json["breakdown"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_analyze_goal_defaults_to_general() {
    let body = json!({"monthly_income": 0, "expenses": {"food": 200}});
    let json = get_body_json(post_json(setup_app_without_ai(), "/api/analyze", body).await).await;
    assert_eq!(json["goal"], "general");
    assert_eq!(json["breakdown"][0]["percentage"], 0.0);
    assert!(json["financial_advice"]
        .as_str()
        .unwrap()
        .contains("A budget plan needs income data"));
}

#[tokio::test]
async fn test_analyze_rejects_negative_amount() {
    let body = json!({"monthly_income": 3000, "expenses": {"rent": -5}});
    let response = post_json(setup_test_app(), "/api/analyze", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "invalid_request");
    assert!(json["message"].as_str().unwrap().contains("rent"));
}

#[tokio::test]
async fn test_analyze_rejects_unknown_goal() {
    let body = json!({"monthly_income": 3000, "expenses": {}, "goal": "yacht"});
    let response = post_json(setup_test_app(), "/api/analyze", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_through_gemini_wire_format() {
    let server = MockGeminiServer::start(MOCK_BUDGET_NARRATIVE).await;
    let backend = GeminiBackend::with_host(&server.url(), MOCK_API_KEY, "gemini-2.0-flash");
    let app = app_with(Some(AIClient::Gemini(backend)));

    let json = get_body_json(post_json(app, "/api/analyze", scenario_budget()).await).await;
    assert_eq!(json["saving_plan"]["months_4_6"][0], "Raise savings by another 3%");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let config = &requests[0]["generationConfig"];
    assert_eq!(config["maxOutputTokens"], 1500);
    assert_eq!(config["responseMimeType"], "application/json");
}

#[tokio::test]
async fn test_analyze_gemini_quota_exhausted_falls_back() {
    let server = MockGeminiServer::start_exhausted().await;
    let backend = GeminiBackend::with_host(&server.url(), MOCK_API_KEY, "gemini-2.0-flash");
    let app = app_with(Some(AIClient::Gemini(backend)));

    let response = post_json(app, "/api/analyze", scenario_budget()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["financial_advice"]
        .as_str()
        .unwrap()
        .starts_with("Based on your income"));
}

// ========== Chat ==========

#[tokio::test]
async fn test_chat_reply() {
    let body = json!({"message": "How do I save?", "context": {"monthly_income": 3000}});
    let response = post_json(setup_test_app(), "/api/chat", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(!json["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_empty_message_is_bad_request() {
    let response = post_json(setup_test_app(), "/api/chat", json!({"message": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "invalid_request");
    assert_eq!(json["message"], "message is required");
}

#[tokio::test]
async fn test_chat_without_ai_is_unavailable() {
    let response = post_json(setup_app_without_ai(), "/api/chat", json!({})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "unavailable");
}

#[tokio::test]
async fn test_chat_falls_back_when_generation_fails() {
    let app = app_with(Some(AIClient::Mock(MockBackend::failing("quota"))));
    let body = json!({"message": "help", "context": {"monthly_income": 2500}});
    let response = post_json(app, "/api/chat", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["reply"]
        .as_str()
        .unwrap()
        .contains("monthly income of $2500"));
}

#[tokio::test]
async fn test_chat_accepts_loosely_typed_context() {
    let body = json!({"message": "How do I save?", "context": {"monthly_income": "3000"}});
    let response = post_json(setup_test_app(), "/api/chat", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = app_with(Some(AIClient::Mock(MockBackend::failing("quota"))));
    let body = json!({"message": "How do I save?", "context": {"monthly_income": "3000", "goal": 7}});
    let json = get_body_json(post_json(app, "/api/chat", body).await).await;
    assert!(json["reply"]
        .as_str()
        .unwrap()
        .contains("monthly income of $3000"));
}

#[test]
fn test_chat_request_drops_bad_context_fields() {
    let request = handlers::ChatRequest::from_json(&json!({
        "message": "hi",
        "context": {"monthly_income": {"amount": 1}, "goal": "emergency_fund"}
    }));
    assert_eq!(request.message, "hi");
    assert_eq!(request.context.monthly_income, None);
    assert_eq!(request.context.goal.as_deref(), Some("emergency_fund"));

    let request = handlers::ChatRequest::from_json(&json!({"message": 42, "context": "x"}));
    assert!(request.message.is_empty());
    assert_eq!(request.context, ChatContext::default());
}

// ========== Glossary ==========

#[tokio::test]
async fn test_list_glossary() {
    let json = get_body_json(get(setup_app_without_ai(), "/api/glossary").await).await;
    assert_eq!(json["count"], 10);
    assert_eq!(json["terms"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_list_glossary_filtered() {
    let json = get_body_json(
        get(
            setup_app_without_ai(),
            "/api/glossary?category=investing&search=FUND",
        )
        .await,
    )
    .await;
    let terms = json["terms"].as_array().unwrap();
    assert!(!terms.is_empty());
    assert_eq!(json["count"], terms.len());
    for term in terms {
        assert_eq!(term["category"], "investing");
    }
}

#[tokio::test]
async fn test_get_glossary_term() {
    let response = get(setup_app_without_ai(), "/api/glossary/3").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["term"], "ETF");
}

#[tokio::test]
async fn test_get_missing_glossary_term() {
    let response = get(setup_app_without_ai(), "/api/glossary/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Not found");
    assert_eq!(json["message"], "Term with ID 999 not found");

    let response = get(setup_app_without_ai(), "/api/glossary/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explain_term() {
    let body = json!({"term": "ETF", "complexity": "ADVANCED"});
    let response = post_json(setup_test_app(), "/api/glossary/explain", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["term"], "ETF");
    assert_eq!(json["complexity"], "advanced");
    assert!(!json["explanation"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_explain_unknown_complexity_becomes_beginner() {
    let body = json!({"term": "Bond", "complexity": "guru"});
    let json = get_body_json(post_json(setup_test_app(), "/api/glossary/explain", body).await).await;
    assert_eq!(json["complexity"], "beginner");
}

#[tokio::test]
async fn test_explain_ignores_wrongly_typed_options() {
    let body = json!({"term": "ETF", "complexity": 5, "custom_prompt": ["why?"]});
    let response = post_json(setup_test_app(), "/api/glossary/explain", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["term"], "ETF");
    assert_eq!(json["complexity"], "beginner");

    let request = handlers::explain_request_from_json(&json!({"term": "Bond", "custom_prompt": 1}));
    assert_eq!(request.term.as_deref(), Some("Bond"));
    assert_eq!(request.custom_prompt, None);
}

#[tokio::test]
async fn test_explain_requires_term() {
    let response = post_json(setup_test_app(), "/api/glossary/explain", json!({"term": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_explain_without_ai_is_unavailable() {
    let body = json!({"term": "ETF"});
    let response = post_json(setup_app_without_ai(), "/api/glossary/explain", body).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_explain_falls_back_for_unknown_term() {
    let app = app_with(Some(AIClient::Mock(MockBackend::failing("down"))));
    let body = json!({"term": "Crypto"});
    let json = get_body_json(post_json(app, "/api/glossary/explain", body).await).await;
    assert!(json["explanation"]
        .as_str()
        .unwrap()
        .starts_with("Crypto is a financial term."));
}

// ========== Errors ==========

#[test]
fn test_core_errors_map_to_status() {
    let err: AppError = budgetwise_core::Error::InvalidRequest("bad".into()).into();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    let err: AppError = budgetwise_core::Error::ServiceUnavailable("off".into()).into();
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    let err: AppError = budgetwise_core::Error::Generation("boom".into()).into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" http://localhost:5173, ,https://app.example.com"),
        vec!["http://localhost:5173", "https://app.example.com"]
    );
}
