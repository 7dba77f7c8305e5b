use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::GeminiClient;
use crate::error::{Result, ShortError};
use crate::scene::{ScriptRequest, ShortScript};

pub type AppState = Arc<GeminiClient>;

pub fn router(client: GeminiClient) -> Router {
    Router::new()
        .route("/api/debug", get(list_models))
        .route("/api/short", post(generate_short))
        .with_state(Arc::new(client))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn start_server(addr: SocketAddr, client: GeminiClient) -> Result<()> {
    let app = router(client);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Short Architect API running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    shutdown_on(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. If the listener cannot be installed this
/// never resolves, so the server keeps running.
async fn shutdown_on<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal: {}", e);
        // 无法监听信号时一直运行，而不是立即退出
        std::future::pending::<()>().await;
    }
}

/// GET /api/debug
///
/// Diagnostic passthrough of the provider's model listing.
async fn list_models(State(client): State<AppState>) -> Json<Value> {
    match client.list_models().await {
        Ok(listing) => Json(listing),
        Err(e) => {
            error!("Model listing failed: {}", e);
            Json(json!({ "error": e.to_string() }))
        }
    }
}

/// POST /api/short
async fn generate_short(
    State(client): State<AppState>,
    payload: std::result::Result<Json<ScriptRequest>, JsonRejection>,
) -> Result<Json<ShortScript>> {
    let Json(request) = payload.map_err(|e| ShortError::RequestError(e.body_text()))?;

    let script = client.generate_script(&request.topic).await.map_err(|e| {
        error!("Script generation failed: {}", e);
        e
    })?;

    Ok(Json(script))
}
