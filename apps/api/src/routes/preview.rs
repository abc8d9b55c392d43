use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Response},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::export::{export_document, ExportFont};
use crate::handoff::PreviewHandoff;
use crate::models::resume::{ResumeDraft, ResumeRecord};
use crate::routes::blocking;
use crate::routes::extract::CurrentUser;
use crate::routes::resumes::{attachment, PreviewResponse};
use crate::state::AppState;

pub const NO_PREVIEW_MESSAGE: &str =
    "No resume data available. Please create or edit a resume first.";

fn missing_preview() -> AppError {
    AppError::NotFound(NO_PREVIEW_MESSAGE.to_string())
}

/// POST /api/v1/preview
/// Renders the builder state and parks it for the preview page.
pub async fn handle_put(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(draft): Json<ResumeDraft>,
) -> StatusCode {
    let markup = PreviewResponse::for_draft(&draft).markup;
    state.preview.put(PreviewHandoff { draft, markup });
    StatusCode::NO_CONTENT
}

/// GET /preview
pub async fn handle_page(State(state): State<AppState>, _user: CurrentUser) -> Html<String> {
    let body = match state.preview.peek() {
        Some(handoff) => handoff.markup,
        None => format!(
            r#"<p style="padding: 2rem; text-align: center; color: #999;">{NO_PREVIEW_MESSAGE}</p>"#
        ),
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Preview</title>
</head>
<body class="preview-page">
<div id="resumePreview">{body}</div>
</body>
</html>
"#
    ))
}

/// POST /api/v1/preview/save
/// Always stores a new resume, even if the draft came from an existing one.
pub async fn handle_save(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    let handoff = state.preview.peek().ok_or_else(missing_preview)?;
    let record = ResumeRecord::from_preview(&handoff.draft, Utc::now())?;
    let saved = blocking(move || Ok(state.resumes.upsert(&user.email, record)?)).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/preview/download
pub async fn handle_download(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Response, AppError> {
    let handoff = state.preview.peek().ok_or_else(missing_preview)?;
    let doc = export_document(&handoff.markup, &handoff.draft.name, ExportFont::SansSerif);
    Ok(attachment(doc))
}

/// DELETE /api/v1/preview
pub async fn handle_clear(State(state): State<AppState>, _user: CurrentUser) -> StatusCode {
    state.preview.clear();
    StatusCode::NO_CONTENT
}
