//! HTTP server exposing the relay.
//!
//! `POST /query` takes `{"q": "..."}` and answers with a [`QueryResponse`];
//! `GET /health` reports liveness.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use homerelay::config::RelayConfig;
use homerelay::relay::{QueryResponse, Relay};

#[derive(Deserialize)]
struct QueryRequest {
    q: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/query", post(query_handler))
        .route("/health", get(health_handler))
        .with_state(relay)
}

async fn query_handler(
    State(relay): State<Arc<Relay>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    match relay.handle_query(&payload.q).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!(error = %e, "query failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Start the relay HTTP server and run until Ctrl-C.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let relay = Arc::new(Relay::from_config(&config)?);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "relay listening at http://{bind_addr}/query");

    axum::serve(listener, router(relay))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down relay server");
        })
        .await?;

    Ok(())
}
