//! Budgetwise Web Server
//!
//! Axum-based REST API for Budgetwise budget guidance.
//!
//! - Budget analysis that always answers, with or without a narrative service
//! - Budgeting chat and glossary explanations (503 without a narrative service)
//! - Restrictive CORS policy and security headers
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use budgetwise_core::{AIBackend, AIClient, GenerationConfig, Glossary};

mod handlers;

/// Server configuration
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read `BUDGETWISE_ALLOWED_ORIGINS` (comma-separated)
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("BUDGETWISE_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
///
/// Read-only after startup. `ai` is `None` when no narrative service is
/// configured, which is the single switch between generated and fallback
/// behavior.
pub struct AppState {
    pub ai: Option<AIClient>,
    pub glossary: Glossary,
    pub generation: GenerationConfig,
}

impl AppState {
    pub fn new(ai: Option<AIClient>, glossary: Glossary, generation: GenerationConfig) -> Self {
        Self {
            ai,
            glossary,
            generation,
        }
    }

    /// Build state from the environment and the given generation settings
    pub fn from_env(generation: GenerationConfig) -> anyhow::Result<Self> {
        let ai = AIClient::from_env(generation.request_timeout);
        match ai {
            Some(ref client) => info!(
                "Narrative backend configured: {} (model: {}, host: {})",
                client.name(),
                client.model(),
                client.host()
            ),
            None => info!(
                "ℹ️  Narrative backend not configured (set GEMINI_API_KEY to enable chat and explanations)"
            ),
        }

        let glossary = Glossary::builtin()?;
        Ok(Self::new(ai, glossary, generation))
    }
}

/// Build the router around existing state
pub fn create_router(
    state: Arc<AppState>,
    static_dir: Option<&str>,
    config: &ServerConfig,
) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route("/chat", post(handlers::chat))
        .route("/glossary", get(handlers::list_terms))
        .route("/glossary/explain", post(handlers::explain))
        .route("/glossary/:id", get(handlers::get_term));

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
    generation: GenerationConfig,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_env(generation)?);
    check_ai_connection(&state).await;

    let app = create_router(state, static_dir, &config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log whether the configured narrative backend answers
async fn check_ai_connection(state: &AppState) {
    if let Some(ref client) = state.ai {
        if client.health_check().await {
            info!(
                "✅ Narrative backend reachable: {} ({})",
                client.name(),
                client.model()
            );
        } else {
            warn!(
                "⚠️  Narrative backend configured but not responding: {} ({})",
                client.host(),
                client.model()
            );
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_request",
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "unavailable",
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "Not found",
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.code,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        match err.downcast_ref::<budgetwise_core::Error>() {
            Some(budgetwise_core::Error::InvalidRequest(msg)) => Self::bad_request(msg),
            Some(budgetwise_core::Error::ServiceUnavailable(msg)) => Self::unavailable(msg),
            Some(budgetwise_core::Error::NotFound(msg)) => Self::not_found(msg),
            _ => Self {
                internal: Some(err),
                ..Self::internal("An internal error occurred")
            },
        }
    }
}

#[cfg(test)]
mod tests;
