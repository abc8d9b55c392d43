//! Standalone, printable HTML export of a rendered preview.

use serde::Serialize;

use crate::render::escape_html;

pub const DEFAULT_FILE_STEM: &str = "resume";

/// Base font stack of the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFont {
    /// Used by downloads from the builder.
    Serif,
    /// Used by downloads from the preview page.
    SansSerif,
}

impl ExportFont {
    fn css(self) -> &'static str {
        match self {
            ExportFont::Serif => "'Georgia', serif",
            ExportFont::SansSerif => "Arial, sans-serif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub filename: String,
    pub title: String,
    pub html: String,
}

/// Filename stem for a display name: each whitespace run becomes one `_`.
pub fn file_stem(display_name: &str) -> String {
    let stem = display_name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem
    }
}

/// Wraps preview markup into a self-contained document.
///
/// The markup is embedded unchanged; no structural checks are made.
pub fn export_document(markup: &str, display_name: &str, font: ExportFont) -> ExportDocument {
    let stem = file_stem(display_name);
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ font-family: {font}; line-height: 1.6; color: #333; background: white; }}
.resume {{ max-width: 8.5in; margin: 0 auto; padding: 0.5in; }}
h1 {{ font-size: 1.8em; margin-bottom: 0.3em; }}
h2 {{ font-size: 1.1em; margin-top: 1em; margin-bottom: 0.5em; border-bottom: 2px solid #333; padding-bottom: 0.3em; }}
.r-entry {{ margin-bottom: 0.8em; }}
.skill-badge {{ display: inline-block; background: #f0f0f0; padding: 0.3em 0.6em; margin-right: 0.5em; border-radius: 3px; }}
@media print {{ body {{ margin: 0; padding: 0; }} .resume {{ padding: 0; margin: 0; }} }}
</style>
</head>
<body>
{markup}
</body>
</html>
"#,
        title = escape_html(&stem),
        font = font.css(),
    );

    ExportDocument {
        filename: format!("{stem}.html"),
        title: stem,
        html,
    }
}
