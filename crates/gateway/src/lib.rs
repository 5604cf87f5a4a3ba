//! HTTP gateway for Concierge.
//!
//! Exposes the chat API (`/v1/chat`, `/v1/history`, `/v1/profile`,
//! `/v1/profile/resume`) plus a health check, and serves the embedded web
//! frontend. Built on Axum.
//!
//! One in-memory [`Session`] lives behind an async `RwLock`. The chat
//! handler holds the write guard for the whole turn, which serializes
//! turns the same way the original single-threaded UI callbacks did.

pub mod frontend;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Json;
use axum::{
    Router,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use concierge_assistant::{TurnOutcome, TurnProcessor};
use concierge_core::session::Session;

/// Profile summary length shown in the UI panel.
const SUMMARY_MAX_CHARS: usize = 2000;

/// Request body cap. Large enough for a resume PDF, nothing more.
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub processor: TurnProcessor,
    pub session: RwLock<Session>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: API routes, embedded frontend, layers.
pub fn build_router(state: SharedState) -> Router {
    // Same-origin only; the UI is served by this process.
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let rate_limiter = Arc::new(RateLimiter::new(60, std::time::Duration::from_secs(60)));

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/chat", post(chat_handler))
        .route("/v1/history", get(history_handler))
        .route("/v1/history", delete(clear_history_handler))
        .route("/v1/profile", get(profile_handler))
        .route("/v1/profile/resume", post(resume_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_middleware(limiter, req, next)
        }))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: concierge_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = concierge_providers::build_from_config(&config)?;
    let notifier = Arc::new(concierge_notify::PushoverNotifier::from_config(
        &config.pushover,
    ));
    let processor = TurnProcessor::from_config(provider, notifier, &config);

    let state = Arc::new(GatewayState {
        processor,
        session: RwLock::new(Session::new()),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Rate Limiter ---

/// Sliding-window rate limiter over all clients.
///
/// The gateway serves one local session; a shared window is enough to keep
/// a runaway script from hammering the LLM API.
struct RateLimiter {
    max_requests: usize,
    window: std::time::Duration,
    hits: std::sync::Mutex<Vec<std::time::Instant>>,
}

impl RateLimiter {
    fn new(max_requests: usize, window: std::time::Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Returns `true` if the request is allowed.
    fn check(&self) -> bool {
        let now = std::time::Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        hits.retain(|t| now.duration_since(*t) < self.window);

        if hits.len() >= self.max_requests {
            return false;
        }

        hits.push(now);
        true
    }
}

/// Rate limiting middleware. The health endpoint and static assets are
/// exempt so monitoring and page loads can't starve the API.
async fn rate_limit_middleware(
    limiter: Arc<RateLimiter>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    let path = req.uri().path();
    if path == "/health" || path == "/" || path.starts_with("/static/") {
        return Ok(next.run(req).await);
    }

    if !limiter.check() {
        warn!(path = %path, "Rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}

// --- Request / Response types ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct ChatRequest {
    /// The visitor's message.
    message: String,
    /// The name typed into the sender box; owner detection runs on it.
    #[serde(default)]
    sender_name: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    /// The reply, or null for an ignored blank submission.
    answer: Option<String>,
    /// Whether a push notification was delivered this turn.
    notified: bool,
    history_len: usize,
}

#[derive(Serialize)]
struct HistoryResponse {
    turns: Vec<TurnDto>,
}

#[derive(Serialize)]
struct TurnDto {
    user_message: String,
    answer: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
struct ProfileResponse {
    /// First 2000 chars of the grounding text, with an ellipsis beyond.
    summary: String,
    fact_count: usize,
    is_placeholder: bool,
}

// --- Handlers ---

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(message_len = payload.message.len(), "Chat request");

    // The write guard is held across the turn: turns are serialized, as
    // the contract requires.
    let mut session = state.session.write().await;

    let outcome = state
        .processor
        .process_turn(
            &payload.message,
            payload.sender_name.as_deref(),
            &mut session,
        )
        .await;

    let notified = outcome.notified();
    let answer = match outcome {
        TurnOutcome::Ignored => None,
        TurnOutcome::OwnerNote { reply } => Some(reply),
        TurnOutcome::Answered { answer, .. } => Some(answer),
    };

    Json(ChatResponse {
        answer,
        notified,
        history_len: session.transcript.len(),
    })
}

async fn history_handler(State(state): State<SharedState>) -> Json<HistoryResponse> {
    let session = state.session.read().await;
    let turns = session
        .transcript
        .turns()
        .iter()
        .map(|t| TurnDto {
            user_message: t.user_message.clone(),
            answer: t.answer.clone(),
            timestamp: t.timestamp,
        })
        .collect();
    Json(HistoryResponse { turns })
}

async fn clear_history_handler(State(state): State<SharedState>) -> StatusCode {
    let mut session = state.session.write().await;
    session.transcript.clear();
    info!("Chat history cleared");
    StatusCode::NO_CONTENT
}

async fn profile_handler(State(state): State<SharedState>) -> Json<ProfileResponse> {
    let session = state.session.read().await;
    Json(profile_response(&session))
}

/// Accepts a multipart upload with a `file` field holding the resume PDF.
/// Extraction failures become the documented error string in the profile
/// panel; the request itself always succeeds once a file is present.
async fn resume_handler(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let mut pdf_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid upload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid upload: {e}")))?;
            pdf_bytes = Some(bytes.to_vec());
            break;
        }
    }

    let Some(bytes) = pdf_bytes else {
        return Err((StatusCode::BAD_REQUEST, "Missing 'file' field".into()));
    };

    let text = match concierge_ingest::extract_text(&bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Resume ingestion failed");
            e.display_message()
        }
    };

    let mut session = state.session.write().await;
    session.profile.replace(text);
    info!(
        chars = session.profile.grounding_text().len(),
        "Profile context replaced from resume upload"
    );

    Ok(Json(profile_response(&session)))
}

fn profile_response(session: &Session) -> ProfileResponse {
    ProfileResponse {
        summary: session.profile.summary(SUMMARY_MAX_CHARS),
        fact_count: session.profile.fact_count(),
        is_placeholder: session.profile.is_placeholder(),
    }
}
