//! Report document downloads

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Largest report text accepted for rendering
const MAX_DOCUMENT_CHARS: usize = 100_000;

#[derive(Debug, Deserialize)]
pub struct RenderPdfInput {
    pub text: String,
    pub filename: Option<String>,
}

fn sanitize_filename(name: Option<&str>) -> String {
    let stem: String = name
        .unwrap_or("soil_report")
        .trim_end_matches(".pdf")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(64)
        .collect();
    if stem.is_empty() {
        "soil_report.pdf".to_string()
    } else {
        format!("{}.pdf", stem)
    }
}

/// Render report text as a PDF download
pub async fn render_pdf(
    State(state): State<AppState>,
    Json(input): Json<RenderPdfInput>,
) -> AppResult<impl IntoResponse> {
    if input.text.chars().count() > MAX_DOCUMENT_CHARS {
        return Err(AppError::validation(
            "text",
            "Report text is too long",
            "रिपोर्ट का पाठ बहुत लंबा है",
        ));
    }

    let bytes = state.pdf.render(&input.text);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        sanitize_filename(input.filename.as_deref())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
