use crate::error::{AppError, AppResult};
use crate::secrets::{Secret, Token};
use crate::web::scheme::{request_host, request_scheme, secret_url};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Body of `POST /api/secret`.
#[derive(Debug, Deserialize)]
pub struct SubmitSecretRequest {
    pub secret: Secret,
}

/// Response for a stored secret.
#[derive(Debug, Serialize)]
pub struct SubmitSecretResponse {
    pub message: String,
    pub url: String,
}

/// Response for a retrieved secret.
#[derive(Debug, Serialize)]
pub struct RevealSecretResponse {
    pub secret: Secret,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pending_secrets: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pending_secrets: state.store.len().await,
    })
}

/// Handler: POST /api/secret
///
/// Stores the secret under a fresh token and returns its one-time URL.
pub async fn submit_secret(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    payload: Result<Json<SubmitSecretRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload?;
    if request.secret.is_empty() {
        return Err(AppError::validation("secret is required"));
    }

    let token = state.tokens.generate()?;
    let url = secret_url(
        request_scheme(&headers, &uri, state.trust_forwarded_proto),
        &request_host(&headers, &uri, &state.fallback_host),
        token.as_str(),
    );

    info!(token = %token.log_prefix(), "Secret stored");
    state.store.put(token, request.secret).await;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(SubmitSecretResponse {
            message: "Secret stored".to_string(),
            url,
        }),
    ))
}

/// Handler: GET /secret/{token}
///
/// Returns the secret and deletes it. Every later call gets 404.
pub async fn reveal_secret(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let token = Token::from(token);
    let secret = match state.store.take_and_delete(&token).await {
        Some(secret) => secret,
        None => {
            debug!(token = %token.log_prefix(), "Secret not found or already retrieved");
            return Err(AppError::NotFound);
        }
    };

    info!(token = %token.log_prefix(), "Secret retrieved and deleted");
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(RevealSecretResponse { secret }),
    ))
}

/// Create the web router
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/secret", post(submit_secret))
        .route("/secret/{token}", get(reveal_secret))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
