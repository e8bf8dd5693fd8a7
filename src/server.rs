//! HTTP trigger surface. One axum server exposes the sync operations
//! behind a `{"success": ..}` envelope, serves the static dashboard,
//! and dispatches batch updates onto a detached background task.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::Method,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, info};

use crate::models::PortfolioSummary;
use crate::sync::{StockSync, tasks};

#[derive(Clone)]
struct AppState {
    sync: Arc<StockSync>,
}

pub async fn run(addr: SocketAddr, sync: Arc<StockSync>, static_dir: &str) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/stocks", get(get_stocks))
        .route("/api/stocks/update", post(update_stocks))
        .route("/api/stocks/add", post(add_stock))
        .route("/api/stocks/remove", post(remove_stock))
        .route("/api/portfolio/summary", get(portfolio_summary))
        .route("/api/portfolio/snapshot", post(create_snapshot))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(AppState { sync })
        .layer(cors);

    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().to_rfc3339(),
        "stores": {
            "stock_database": "configured",
            "portfolio_database": if state.sync.has_portfolio_database() {
                "configured"
            } else {
                "missing"
            },
        }
    }))
}

async fn get_stocks(State(state): State<AppState>) -> impl IntoResponse {
    let stocks = state.sync.tracked_symbols().await;
    Json(json!({ "success": true, "count": stocks.len(), "stocks": stocks }))
}

#[derive(Debug, Default, Deserialize)]
struct UpdateRequest {
    symbols: Option<Vec<String>>,
}

/// Dispatches the batch update and acknowledges immediately; the
/// outcome is only logged. A summary request arriving right after can
/// therefore still observe pre-update prices.
async fn update_stocks(
    State(state): State<AppState>,
    payload: Option<Json<UpdateRequest>>,
) -> impl IntoResponse {
    let symbols = payload
        .and_then(|Json(request)| request.symbols)
        .map(normalize_symbols);

    let sync = state.sync.clone();
    tasks::spawn(async move {
        let outcome = sync.update_stocks(symbols).await;
        info!(
            updated = outcome.updated,
            failed = outcome.failed,
            "background update finished"
        );
    })
    .detach();

    Json(json!({ "success": true, "message": "Update started" }))
}

#[derive(Debug, Deserialize)]
struct SymbolRequest {
    symbol: Option<String>,
}

async fn add_stock(
    State(state): State<AppState>,
    payload: Option<Json<SymbolRequest>>,
) -> impl IntoResponse {
    let Some(symbol) = requested_symbol(payload) else {
        return Json(json!({ "success": false, "error": "Stock symbol is required" }));
    };

    match state.sync.add_stock(&symbol).await {
        Ok(()) => Json(json!({
            "success": true,
            "message": format!("Successfully added {} to tracking", symbol)
        })),
        Err(err) => {
            error!(symbol = %symbol, "add failed: {:#}", err);
            Json(json!({ "success": false, "error": format!("{:#}", err) }))
        }
    }
}

async fn remove_stock(
    State(state): State<AppState>,
    payload: Option<Json<SymbolRequest>>,
) -> impl IntoResponse {
    let Some(symbol) = requested_symbol(payload) else {
        return Json(json!({ "success": false, "error": "Stock symbol is required" }));
    };

    match state.sync.remove_stock(&symbol).await {
        Ok(()) => Json(json!({
            "success": true,
            "message": format!("Successfully removed {}", symbol)
        })),
        Err(err) => {
            error!(symbol = %symbol, "remove failed: {:#}", err);
            Json(json!({ "success": false, "error": format!("{:#}", err) }))
        }
    }
}

/// A failed read never surfaces as a fault: the caller gets a zeroed
/// summary next to the error description.
async fn portfolio_summary(State(state): State<AppState>) -> impl IntoResponse {
    match state.sync.portfolio_summary().await {
        Ok(summary) => Json(json!({ "success": true, "portfolio": summary })),
        Err(err) => {
            error!("portfolio summary failed: {:#}", err);
            Json(json!({
                "success": false,
                "error": format!("{:#}", err),
                "portfolio": PortfolioSummary::default()
            }))
        }
    }
}

async fn create_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    match state.sync.create_snapshot().await {
        Ok(_) => Json(json!({
            "success": true,
            "message": "Portfolio snapshot created successfully"
        })),
        Err(err) => {
            error!("snapshot failed: {:#}", err);
            Json(json!({ "success": false, "error": format!("{:#}", err) }))
        }
    }
}

fn requested_symbol(payload: Option<Json<SymbolRequest>>) -> Option<String> {
    let symbol = payload?.0.symbol?;
    let symbol = symbol.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

fn normalize_symbols(symbols: Vec<String>) -> Vec<String> {
    symbols
        .iter()
        .map(|symbol| symbol.trim().to_uppercase())
        .filter(|symbol| !symbol.is_empty())
        .collect()
}
