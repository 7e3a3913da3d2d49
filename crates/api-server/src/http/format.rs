use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Za-z][A-Za-z ]+):([ \t]*)").expect("valid heading pattern"));

static UNICODE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[•●○][ \t]*").expect("valid bullet pattern"));

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("valid paragraph pattern"));

/// Normalizes raw model output into display-ready markdown: section
/// labels become headings, unicode bullets become list markers, and
/// paragraph spacing is made consistent. Rendering to HTML is left to
/// the client.
pub(super) fn normalize_markdown(raw_text: &str) -> String {
    let processed = raw_text.replace("\r\n", "\n");
    let processed = SECTION_HEADING.replace_all(&processed, "## ${1}${2}");
    let processed = UNICODE_BULLET.replace_all(&processed, "* ");

    let paragraphs: Vec<String> = PARAGRAPH_BREAK
        .split(&processed)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if p.starts_with('#') || p.starts_with('*') || p.starts_with('-') {
                p.to_string()
            } else {
                format!("{p}\n")
            }
        })
        .collect();

    paragraphs.join("\n\n")
}
