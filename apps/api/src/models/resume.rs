use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ValidationError;
use crate::templates;

/// Name used when a resume is saved from the preview page without one.
pub const PREVIEW_FALLBACK_NAME: &str = "My Resume";

/// Raw builder form values, exactly as typed. Nothing is trimmed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDraft {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub experience: String,
    pub college_name: String,
    pub degree: String,
    pub graduation_year: String,
    pub percentage: String,
    pub skills: String,
    pub projects: String,
    pub certificates: String,
    pub template: Option<String>,
}

/// One persisted resume. Stored as camelCase JSON under `resumes:{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub graduation_year: String,
    #[serde(default)]
    pub percentage: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub certificates: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_template() -> String {
    templates::DEFAULT_TEMPLATE.to_string()
}

impl ResumeRecord {
    /// Builds a record from form values. Every write path goes through here.
    ///
    /// All fields are trimmed. `name` and `email` must be non-empty after
    /// trimming. An unknown template id falls back to the default layout.
    pub fn from_draft(draft: &ResumeDraft, saved_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let name = draft.name.trim();
        let email = draft.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::MissingResumeIdentity);
        }

        Ok(ResumeRecord {
            id: draft.id,
            name: name.to_string(),
            email: email.to_string(),
            phone: draft.phone.trim().to_string(),
            summary: draft.summary.trim().to_string(),
            experience: draft.experience.trim().to_string(),
            college_name: draft.college_name.trim().to_string(),
            degree: draft.degree.trim().to_string(),
            graduation_year: draft.graduation_year.trim().to_string(),
            percentage: draft.percentage.trim().to_string(),
            skills: draft.skills.trim().to_string(),
            projects: draft.projects.trim().to_string(),
            certificates: draft.certificates.trim().to_string(),
            template: templates::resolve(draft.template.as_deref()).to_string(),
            saved_at: Some(saved_at),
        })
    }

    /// Builds a record from a preview handoff. Always a new record; an empty
    /// name becomes [`PREVIEW_FALLBACK_NAME`].
    pub fn from_preview(draft: &ResumeDraft, saved_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut draft = draft.clone();
        draft.id = None;
        if draft.name.trim().is_empty() {
            draft.name = PREVIEW_FALLBACK_NAME.to_string();
        }
        Self::from_draft(&draft, saved_at)
    }

    /// Form values for reopening this record in the builder.
    pub fn to_draft(&self) -> ResumeDraft {
        ResumeDraft {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            summary: self.summary.clone(),
            experience: self.experience.clone(),
            college_name: self.college_name.clone(),
            degree: self.degree.clone(),
            graduation_year: self.graduation_year.clone(),
            percentage: self.percentage.clone(),
            skills: self.skills.clone(),
            projects: self.projects.clone(),
            certificates: self.certificates.clone(),
            template: Some(self.template.clone()),
        }
    }
}
