//! The three send routes and their request/response mapping.
//!
//! Both media routes share one staging + dispatch path; the only
//! distinction a caller sees between a staging failure and a dispatch
//! failure is in the logs, never in the response code.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use {
    axum::{
        extract::{ConnectInfo, State, rejection::JsonRejection},
        http::StatusCode,
        response::{IntoResponse, Json, Response},
    },
    serde::Deserialize,
    tracing::{error, info},
};

use wasend_dispatch::OutboundRequest;

use crate::state::GatewayState;

// ── Bodies ───────────────────────────────────────────────────────────────────

/// Byte fields arrive base64-encoded in the JSON body.
mod base64_bytes {
    use {
        base64::{Engine as _, engine::general_purpose::STANDARD},
        serde::{Deserialize, Deserializer},
    };

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        STANDARD
            .decode(raw.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
pub struct SendTextBody {
    pub to: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SendImageBody {
    pub to: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct SendDocumentBody {
    pub to: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub filename: String,
    #[serde(with = "base64_bytes")]
    pub document: Vec<u8>,
}

// ── Response helpers ─────────────────────────────────────────────────────────

fn ok_message(message: &str) -> Response {
    (StatusCode::OK, Json(serde_json::json!({"message": message}))).into_response()
}

fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": "invalid request"})),
    )
        .into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn send_text(
    State(state): State<Arc<GatewayState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Result<Json<SendTextBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return bad_request();
    };
    info!(client = %addr.ip(), to = %body.to, "send-text request received");

    let request = OutboundRequest::Text {
        to: body.to.clone(),
        text: body.text,
    };
    match state.dispatcher.dispatch(request).await {
        Ok(()) => {
            info!(client = %addr.ip(), to = %body.to, "message sent");
            ok_message("message sent successfully")
        },
        Err(e) => {
            error!(client = %addr.ip(), to = %body.to, error = %e, "failed to send message");
            internal_error("failed to send message")
        },
    }
}

pub async fn send_image(
    State(state): State<Arc<GatewayState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Result<Json<SendImageBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return bad_request();
    };
    info!(client = %addr.ip(), to = %body.to, "send-image request received");

    let to = body.to.clone();
    let caption = body.caption;
    stage_and_dispatch(
        &state,
        addr,
        &body.to,
        &body.image,
        move |path| OutboundRequest::Image { to, caption, path },
        "image sent successfully",
        "failed to send image",
    )
    .await
}

pub async fn send_document(
    State(state): State<Arc<GatewayState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Result<Json<SendDocumentBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return bad_request();
    };
    info!(client = %addr.ip(), to = %body.to, filename = %body.filename, "send-document request received");

    let to = body.to.clone();
    let caption = body.caption;
    let filename = body.filename;
    stage_and_dispatch(
        &state,
        addr,
        &body.to,
        &body.document,
        move |path| OutboundRequest::Document {
            to,
            caption,
            filename,
            path,
        },
        "document sent successfully",
        "failed to send document",
    )
    .await
}

/// Shared media path: stage the payload, dispatch, then remove the artifact
/// this handler staged — success or failure, the handler owns the cleanup.
async fn stage_and_dispatch(
    state: &GatewayState,
    addr: SocketAddr,
    to: &str,
    payload: &[u8],
    build: impl FnOnce(PathBuf) -> OutboundRequest,
    success_message: &str,
    failure_message: &str,
) -> Response {
    let artifact = match state.staging.stage(payload).await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!(client = %addr.ip(), to = %to, error = %e, "failed to stage payload");
            return internal_error(failure_message);
        },
    };

    let request = build(artifact.path.clone());
    let result = state.dispatcher.dispatch(request).await;
    state.staging.remove(&artifact).await;

    match result {
        Ok(()) => {
            info!(client = %addr.ip(), to = %to, "media sent");
            ok_message(success_message)
        },
        Err(e) => {
            error!(client = %addr.ip(), to = %to, error = %e, "failed to dispatch media");
            internal_error(failure_message)
        },
    }
}
