//! HTTP front end: the dashboard page and a health check

use crate::data::Dataset;
use crate::page;
use crate::selection::SelectionQuery;
use crate::session::Session;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub rows: usize,
    pub columns: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, dataset: Dataset) -> crate::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "dashboard listening");
    axum::serve(listener, router(AppState::new(dataset))).await?;
    Ok(())
}

/// Full page for the current sidebar selection
pub async fn dashboard(State(state): State<AppState>, Query(query): Query<SelectionQuery>) -> (StatusCode, Html<String>) {
    let session = Session::new(&state.dataset, query);
    match session.render_page() {
        Ok(html) => (StatusCode::OK, Html(html)),
        Err(e) => {
            error!(error = %e, "failed to render dashboard");
            let body = format!(
                "<!DOCTYPE html>\n<html><head><title>{}</title></head><body><h1>Rendering failed</h1><p>{}</p></body></html>\n",
                page::escape(page::PAGE_TITLE),
                page::escape(&e.to_string())
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(body))
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse {
        status: "healthy".to_string(),
        rows: state.dataset.height(),
        columns: state.dataset.width(),
    };

    (StatusCode::OK, Json(health))
}
