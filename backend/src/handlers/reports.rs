//! HTTP handlers for soil report submission and history

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::services::advisory::{AdvisoryService, AnalyzeSoilInput, SoilAnalysis};
use crate::services::ReportStore;
use crate::AppState;
use shared::{HistoryLimit, ReportRecord};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: i64,
    pub reports: Vec<ReportRecord>,
}

fn resolve_limit(state: &AppState, requested: Option<u32>) -> u32 {
    HistoryLimit::resolve(
        requested,
        state.config.history.default_limit,
        state.config.history.max_limit,
    )
    .limit
}

/// Analyse a soil sample and store the submission
pub async fn analyze_soil(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeSoilInput>,
) -> AppResult<Json<SoilAnalysis>> {
    let service = AdvisoryService::from_state(&state);
    let analysis = service.analyze(input).await?;
    Ok(Json(analysis))
}

/// List the most recent submissions
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<HistoryResponse>> {
    let limit = resolve_limit(&state, query.limit);
    let store = ReportStore::new(state.db);
    let reports = store.recent_reports(limit).await?;
    let total = store.count().await?;
    Ok(Json(HistoryResponse { total, reports }))
}

/// Download the most recent submissions as CSV
pub async fn export_reports(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = resolve_limit(&state, query.limit);
    let store = ReportStore::new(state.db);
    let csv = store.export_csv(limit).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"soil_reports.csv\""),
        ],
        csv,
    ))
}
