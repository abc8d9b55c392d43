//! Field-to-preview binding.
//!
//! Every function here is a pure mapping from raw form text to a [`Binding`]:
//! a structured fragment plus the visibility of the field's preview section.
//! Nothing is rendered to markup here; see [`crate::render`] for that.

pub mod placeholders;

use serde::Serialize;

use crate::models::resume::ResumeDraft;

/// Separator between joined parts of a composite line.
pub const JOIN_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    /// Default text shown while the field is empty.
    Placeholder(&'static str),
    Text(String),
    /// One entry per non-blank input line.
    Entries(Vec<String>),
    /// One badge per comma-separated segment.
    Badges(Vec<String>),
    Education(Vec<EducationLine>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum EducationLine {
    Title(String),
    Subtitle(String),
    Detail(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub fragment: Fragment,
    pub visible: bool,
}

impl Binding {
    fn placeholder(text: &'static str) -> Self {
        Binding {
            fragment: Fragment::Placeholder(text),
            visible: false,
        }
    }
}

/// Bindings for every section of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewBindings {
    pub name: Binding,
    pub contact: Binding,
    pub summary: Binding,
    pub experience: Binding,
    pub education: Binding,
    pub skills: Binding,
    pub projects: Binding,
    pub certificates: Binding,
}

/// Plain text: the trimmed value, or the placeholder when empty.
pub fn bind_text(raw: &str, placeholder: &'static str) -> Binding {
    let value = raw.trim();
    if value.is_empty() {
        return Binding::placeholder(placeholder);
    }
    Binding {
        fragment: Fragment::Text(value.to_string()),
        visible: true,
    }
}

/// Multi-line list: one entry per line that is not blank, in input order.
pub fn bind_lines(raw: &str, placeholder: &'static str) -> Binding {
    let entries: Vec<String> = raw
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if entries.is_empty() {
        return Binding::placeholder(placeholder);
    }
    Binding {
        fragment: Fragment::Entries(entries),
        visible: true,
    }
}

/// Comma-separated tags. A non-empty value always yields at least one badge;
/// empty segments between commas become empty badges.
pub fn bind_tags(raw: &str, placeholder: &'static str) -> Binding {
    let value = raw.trim();
    if value.is_empty() {
        return Binding::placeholder(placeholder);
    }
    let badges = value
        .split(',')
        .map(|segment| segment.trim().to_string())
        .collect();
    Binding {
        fragment: Fragment::Badges(badges),
        visible: true,
    }
}

/// Contact line: `email` or `email • phone`. Always visible.
pub fn bind_contact(email: &str, phone: &str) -> Binding {
    let email = match email.trim() {
        "" => placeholders::CONTACT,
        email => email,
    };
    let phone = phone.trim();

    let contact = if phone.is_empty() {
        email.to_string()
    } else {
        format!("{email}{JOIN_SEPARATOR}{phone}")
    };
    Binding {
        fragment: Fragment::Text(contact),
        visible: true,
    }
}

/// Raw education sub-fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EducationInput<'a> {
    pub college: &'a str,
    pub degree: &'a str,
    pub year: &'a str,
    pub percentage: &'a str,
}

/// Education block: degree line, college line, then one detail line holding
/// whichever of year and GPA are present.
pub fn bind_education(input: EducationInput<'_>) -> Binding {
    let college = input.college.trim();
    let degree = input.degree.trim();
    let year = input.year.trim();
    let percentage = input.percentage.trim();

    if [college, degree, year, percentage].iter().all(|s| s.is_empty()) {
        return Binding::placeholder(placeholders::EDUCATION);
    }

    let mut lines = Vec::new();
    if !degree.is_empty() {
        lines.push(EducationLine::Title(degree.to_string()));
    }
    if !college.is_empty() {
        lines.push(EducationLine::Subtitle(college.to_string()));
    }

    let mut details = Vec::new();
    if !year.is_empty() {
        details.push(format!("Graduated: {year}"));
    }
    if !percentage.is_empty() {
        details.push(format!("GPA: {percentage}"));
    }
    if !details.is_empty() {
        lines.push(EducationLine::Detail(details.join(JOIN_SEPARATOR)));
    }

    Binding {
        fragment: Fragment::Education(lines),
        visible: true,
    }
}

/// Binds every field of a draft.
pub fn bind_preview(draft: &ResumeDraft) -> PreviewBindings {
    PreviewBindings {
        name: bind_text(&draft.name, placeholders::NAME),
        contact: bind_contact(&draft.email, &draft.phone),
        summary: bind_text(&draft.summary, placeholders::SUMMARY),
        experience: bind_lines(&draft.experience, placeholders::EXPERIENCE),
        education: bind_education(EducationInput {
            college: &draft.college_name,
            degree: &draft.degree,
            year: &draft.graduation_year,
            percentage: &draft.percentage,
        }),
        skills: bind_tags(&draft.skills, placeholders::SKILLS),
        projects: bind_lines(&draft.projects, placeholders::PROJECTS),
        certificates: bind_lines(&draft.certificates, placeholders::CERTIFICATES),
    }
}
