use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::binder::{bind_preview, PreviewBindings};
use crate::errors::AppError;
use crate::export::{export_document, ExportDocument, ExportFont};
use crate::models::resume::{ResumeDraft, ResumeRecord};
use crate::render::render_preview;
use crate::routes::blocking;
use crate::routes::extract::CurrentUser;
use crate::state::AppState;
use crate::templates::{self, TemplateCard, TemplateLevel};

pub const UNTITLED: &str = "Untitled Resume";

/// One dashboard row.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: i64,
    pub name: String,
    pub saved_on: Option<String>,
    pub template: String,
}

impl ResumeSummary {
    fn from_record(record: &ResumeRecord) -> Option<Self> {
        let id = record.id?;
        let name = match record.name.trim() {
            "" => UNTITLED.to_string(),
            name => name.to_string(),
        };
        Some(ResumeSummary {
            id,
            name,
            saved_on: DateTime::<Utc>::from_timestamp_millis(id)
                .map(|d| d.format("%Y-%m-%d").to_string()),
            template: record.template.clone(),
        })
    }
}

/// Bindings plus the markup they render to.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub bindings: PreviewBindings,
    pub markup: String,
}

impl PreviewResponse {
    pub fn for_draft(draft: &ResumeDraft) -> Self {
        let bindings = bind_preview(draft);
        let markup = render_preview(&bindings, templates::resolve(draft.template.as_deref()));
        PreviewResponse { bindings, markup }
    }
}

#[derive(Debug, Serialize)]
pub struct BuilderState {
    pub draft: ResumeDraft,
    #[serde(flatten)]
    pub preview: PreviewResponse,
}

#[derive(Deserialize)]
pub struct BuilderQuery {
    pub id: Option<String>,
    pub template: Option<String>,
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub level: Option<TemplateLevel>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverResponse {
    pub quarantined_to: Option<String>,
}

/// GET /api/v1/templates
pub async fn handle_templates(Query(q): Query<TemplateQuery>) -> Json<Vec<TemplateCard>> {
    Json(templates::filter(q.level))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let email = user.email.clone();
    let records = blocking(move || Ok(state.resumes.list(&email)?)).await?;

    let mut summaries = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        match ResumeSummary::from_record(record) {
            Some(summary) => summaries.push(summary),
            None => warn!(
                "Resume at position {position} for {} has no id and is not listed",
                user.email
            ),
        }
    }
    Ok(Json(summaries))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<Json<ResumeRecord>, AppError> {
    blocking(move || Ok(state.resumes.get(&user.email, id)?))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// POST /api/v1/resumes
pub async fn handle_save(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(draft): Json<ResumeDraft>,
) -> Result<Json<ResumeRecord>, AppError> {
    let record = ResumeRecord::from_draft(&draft, Utc::now())?;
    let saved = blocking(move || Ok(state.resumes.upsert(&user.email, record)?)).await?;
    Ok(Json(saved))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<StatusCode, AppError> {
    if blocking(move || Ok(state.resumes.delete(&user.email, id)?)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {id} not found")))
    }
}

/// POST /api/v1/resumes/recover
pub async fn handle_recover(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<RecoverResponse>, AppError> {
    let quarantined_to = blocking(move || Ok(state.resumes.recover(&user.email)?)).await?;
    Ok(Json(RecoverResponse { quarantined_to }))
}

/// GET /api/v1/builder
///
/// Loads a saved resume into builder state. An id that is missing, malformed
/// or no longer stored yields a blank builder rather than an error.
pub async fn handle_builder(
    State(state): State<AppState>,
    Query(q): Query<BuilderQuery>,
    user: CurrentUser,
) -> Result<Json<BuilderState>, AppError> {
    let stored = match q.id.as_deref().and_then(|id| id.trim().parse::<i64>().ok()) {
        Some(id) => blocking(move || Ok(state.resumes.get(&user.email, id)?)).await?,
        None => None,
    };

    let draft = match stored {
        Some(record) => record.to_draft(),
        None => {
            if q.id.is_some() {
                info!("Builder opened for unknown resume {:?}; starting blank", q.id);
            }
            ResumeDraft {
                template: Some(templates::resolve(q.template.as_deref()).to_string()),
                ..Default::default()
            }
        }
    };

    let preview = PreviewResponse::for_draft(&draft);
    Ok(Json(BuilderState { draft, preview }))
}

/// POST /api/v1/bind
pub async fn handle_bind(_user: CurrentUser, Json(draft): Json<ResumeDraft>) -> Json<PreviewResponse> {
    Json(PreviewResponse::for_draft(&draft))
}

/// POST /api/v1/export
pub async fn handle_export(_user: CurrentUser, Json(draft): Json<ResumeDraft>) -> Response {
    let preview = PreviewResponse::for_draft(&draft);
    let doc = export_document(&preview.markup, &draft.name, ExportFont::Serif);
    attachment(doc)
}

/// Serves an export as a file download.
pub fn attachment(doc: ExportDocument) -> Response {
    info!("Exporting {}", doc.filename);
    let disposition = format!("attachment; filename=\"{}\"", header_safe(&doc.filename));
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        doc.html,
    )
        .into_response()
}

fn header_safe(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
