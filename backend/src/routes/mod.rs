//! Route definitions for the Soil Health Advisory Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Score preview without persistence
        .route("/soil/score", post(handlers::preview_score))
        .nest("/reports", report_routes())
        .nest("/documents", document_routes())
}

/// Soil report submission and history
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_reports).post(handlers::analyze_soil))
        .route("/export", get(handlers::export_reports))
}

/// Report document rendering
fn document_routes() -> Router<AppState> {
    Router::new().route("/pdf", post(handlers::render_pdf))
}
