// Theme sanitizer
// Keeps stored colors legible when entries are shown on a dark background.

use super::structured_document::StructuredDocument;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme {0:?}, expected light or dark")]
pub struct ParseThemeError(String);

impl FromStr for ThemeMode {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => f.write_str("light"),
            ThemeMode::Dark => f.write_str("dark"),
        }
    }
}

struct MarkupRules {
    black_text: Regex,
    black_font_attr: Regex,
    white_background: Regex,
    empty_style: Regex,
}

// Inline CSS inside elements the document model keeps verbatim
fn markup_rules() -> &'static MarkupRules {
    static RULES: OnceLock<MarkupRules> = OnceLock::new();
    RULES.get_or_init(|| MarkupRules {
        black_text: Regex::new(
            r#"(?i)(^|[;"'\s])color\s*:\s*(?:#0{6}\b|#0{3}\b|black\b|rgb\(\s*0\s*,\s*0\s*,\s*0\s*\))\s*;?"#,
        )
        .expect("valid black text regex"),
        black_font_attr: Regex::new(
            r#"(?i)(<font\b[^>]*?)\s+color\s*=\s*["']?(?:#0{6}\b|#0{3}\b|black\b)["']?"#,
        )
        .expect("valid font color regex"),
        white_background: Regex::new(
            r#"(?i)(^|[;"'\s])background(?:-color)?\s*:\s*(?:#f{6}\b|#f{3}\b|white\b|rgb\(\s*255\s*,\s*255\s*,\s*255\s*\))\s*;?"#,
        )
        .expect("valid white background regex"),
        empty_style: Regex::new(r#"(?i)\s+style\s*=\s*(?:""|'')"#).expect("valid empty style regex"),
    })
}

fn clean_markup_once(markup: &str) -> String {
    let rules = markup_rules();
    let cleaned = rules.black_text.replace_all(markup, "${1}");
    let cleaned = rules.black_font_attr.replace_all(&cleaned, "${1}");
    let cleaned = rules.white_background.replace_all(&cleaned, "${1}");
    let cleaned = rules.empty_style.replace_all(&cleaned, "");
    cleaned.into_owned()
}

/// Remove black text and white backgrounds from raw markup
pub fn clean_markup(markup: &str) -> String {
    // adjacent declarations share a separator, so one pass can miss the second
    let mut current = clean_markup_once(markup);
    loop {
        let next = clean_markup_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Clear colors that disappear on a dark background, without merging runs.
/// Returns true if a run was touched.
pub fn strip_illegible_colors(doc: &mut StructuredDocument, mode: ThemeMode) -> bool {
    if !mode.is_dark() {
        return false;
    }
    let mut changed = false;
    for block in doc.blocks_mut() {
        for run in &mut block.runs {
            if run.style.text_color.is_some_and(|c| c.is_black()) {
                run.style.text_color = None;
                changed = true;
            }
            if run.style.highlight.is_some_and(|c| c.is_white()) {
                run.style.highlight = None;
                changed = true;
            }
            if let Some(raw) = run.raw.as_mut() {
                let cleaned = clean_markup(raw);
                if cleaned != *raw {
                    *raw = cleaned;
                    changed = true;
                }
            }
        }
    }
    changed
}

/// Full sanitizer pass: strip illegible colors for `mode`, then merge runs
/// that became identical. Light mode only normalizes.
/// Applying it twice gives the same document as applying it once.
pub fn sanitize(doc: &mut StructuredDocument, mode: ThemeMode) -> bool {
    let original = doc.clone();
    strip_illegible_colors(doc, mode);
    doc.normalize();
    *doc != original
}

pub fn sanitized(doc: &StructuredDocument, mode: ThemeMode) -> StructuredDocument {
    let mut doc = doc.clone();
    sanitize(&mut doc, mode);
    doc
}
