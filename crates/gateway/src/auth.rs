use std::sync::Arc;

use {
    axum::{
        extract::{Request, State},
        http::{StatusCode, header},
        middleware::Next,
        response::{IntoResponse, Json, Response},
    },
    tracing::warn,
};

use crate::state::GatewayState;

// ── Types ────────────────────────────────────────────────────────────────────

/// Resolved gateway auth configuration: one shared bearer secret.
#[derive(Debug, Clone)]
pub struct ResolvedAuth {
    pub token: String,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Constant-time string comparison (prevents timing attacks).
fn safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    // XOR each byte and accumulate; any difference makes result non-zero.
    let diff = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Global bearer-token gate. A missing or mismatched token aborts the
/// request before any handler runs.
pub async fn require_auth(
    State(state): State<Arc<GatewayState>>,
    request: Request,
    next: Next,
) -> Response {
    match bearer_token(&request) {
        Some(provided) if safe_equal(provided, &state.auth.token) => next.run(request).await,
        _ => {
            warn!(path = %request.uri().path(), "rejected request with invalid token");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "invalid token"})),
            )
                .into_response()
        },
    }
}
