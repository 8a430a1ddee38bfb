use std::{net::SocketAddr, sync::Arc};

use {
    axum::{Router, middleware, routing::post},
    tower_http::cors::{Any, CorsLayer},
    tracing::info,
};

use crate::{auth, routes, state::GatewayState};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sendtext", post(routes::send_text))
        .route("/senddoc", post(routes::send_document))
        .route("/sendimg", post(routes::send_image))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ))
        .layer(cors)
        .with_state(state)
}

/// Start the gateway HTTP server. Serves until the process exits; callers
/// that need shutdown-on-signal run this on its own task.
pub async fn start_gateway(state: Arc<GatewayState>, bind: &str, port: u16) -> anyhow::Result<()> {
    let app = build_gateway_app(Arc::clone(&state));

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, version = %state.version, "gateway listening");

    // ConnectInfo gives handlers the caller address for logging.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
