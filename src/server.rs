use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use http::{header, StatusCode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::dispatcher::Gateway;
use crate::jsonrpc::Reply;
use crate::ledger::{LedgerClient, RemoteLedger};

/// Build the HTTP router: JSON-RPC on `POST /`, liveness on `GET /health`.
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(gateway))
}

/// Start the gateway against the ledger named in `config`.
pub async fn start_server(config: Config) -> Result<()> {
    let addr = config.listen_addr;

    info!("Starting gateway on {}", addr);
    info!("Chain ID: {}, network ID: {}", config.chain_id, config.network_id);
    info!("Ledger RPC: {}", config.ledger_rpc_url);

    if config.signer_key.is_none() {
        warn!("LEDGER_SIGNER_KEY not set; eth_sendTransaction will be rejected");
    }

    let ledger = RemoteLedger::new(&config.ledger_rpc_url)
        .with_contract_relay(&config.contract_relay)
        .with_signer_key(config.signer_key.clone());

    match ledger.max_block_height().await {
        Ok(height) => info!("Ledger reachable, latest block {}", height),
        Err(e) => warn!("Could not reach ledger RPC (will retry on requests): {}", e),
    }

    let gateway = Gateway::new(config, Arc::new(ledger));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind server to {}", addr))?;

    info!("Gateway listening on http://{}", addr);

    axum::serve(listener, router(gateway))
        .await
        .context("HTTP server failed")?;

    info!("Gateway stopped");
    Ok(())
}

async fn handle_rpc(State(gateway): State<Arc<Gateway>>, body: Bytes) -> Response {
    let reply = gateway.handle(&body).await;
    reply_response(reply)
}

async fn health() -> &'static str {
    "OK"
}

/// Every reply goes out as 200; raw error strings are plain text.
fn reply_response(reply: Reply) -> Response {
    let content_type = if reply.is_raw() {
        "text/plain; charset=utf-8"
    } else {
        "application/json"
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        reply.into_body(),
    )
        .into_response()
}
