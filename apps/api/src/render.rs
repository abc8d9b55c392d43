//! Applies [`PreviewBindings`] to HTML markup for the live preview.

use std::fmt::Write;

use crate::binder::{Binding, EducationLine, Fragment, PreviewBindings};

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders the full preview document fragment for one template.
pub fn render_preview(bindings: &PreviewBindings, template: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div id="templatePreview" class="resume template-{}">"#,
        escape_html(template)
    );

    let _ = write!(
        html,
        r#"<header class="r-header"><h1 id="rName">{}</h1><p id="rContact" class="r-contact">{}</p></header>"#,
        fragment_html(&bindings.name.fragment),
        fragment_html(&bindings.contact.fragment),
    );

    let sections = [
        ("summary", "Summary", "rSummary", &bindings.summary),
        ("experience", "Experience", "rExperience", &bindings.experience),
        ("education", "Education", "rEducation", &bindings.education),
        ("skills", "Skills", "rSkills", &bindings.skills),
        ("projects", "Projects", "rProjects", &bindings.projects),
        ("certificates", "Certificates", "rCertificates", &bindings.certificates),
    ];
    for (key, title, body_id, binding) in sections {
        render_section(&mut html, key, title, body_id, binding);
    }

    html.push_str("</div>");
    html
}

fn render_section(html: &mut String, key: &str, title: &str, body_id: &str, binding: &Binding) {
    let style = if binding.visible {
        ""
    } else {
        r#" style="display: none""#
    };
    let _ = write!(
        html,
        r#"<section id="{key}Section" class="r-section"{style}><h2>{title}</h2><div id="{body_id}" class="r-entry">{}</div></section>"#,
        fragment_html(&binding.fragment),
    );
}

fn fragment_html(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Placeholder(text) => escape_html(text),
        Fragment::Text(text) => escape_html(text),
        Fragment::Entries(entries) => entries
            .iter()
            .map(|e| format!(r#"<div class="r-entry-content">{}</div>"#, escape_html(e)))
            .collect(),
        Fragment::Badges(badges) => badges
            .iter()
            .map(|b| format!(r#"<span class="skill-badge">{}</span>"#, escape_html(b)))
            .collect(),
        Fragment::Education(lines) => lines
            .iter()
            .map(|line| {
                let (class, text) = match line {
                    EducationLine::Title(t) => ("r-entry-title", t),
                    EducationLine::Subtitle(t) => ("r-entry-subtitle", t),
                    EducationLine::Detail(t) => ("r-entry-content", t),
                };
                format!(r#"<div class="{class}">{}</div>"#, escape_html(text))
            })
            .collect(),
    }
}
