use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Normalized outcome of one generateContent call.
#[derive(Debug, Clone, Default)]
pub struct GenerationResult {
    pub text: String,
    pub sources: Vec<Source>,
}

/// One grounding citation, unique by URL within a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
    #[serde(default)]
    grounding_supports: Vec<GroundingSupport>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingSupport {
    #[serde(default)]
    grounding_chunk_indices: Vec<usize>,
    segment: Option<SupportSegment>,
}

#[derive(Debug, Deserialize)]
struct SupportSegment {
    text: Option<String>,
}

/// Parses a successful generateContent body. A response with no
/// candidates yields an empty result rather than an error; only a body
/// that is not the expected JSON shape fails.
pub(super) fn parse_generation(body: &str) -> Result<GenerationResult, serde_json::Error> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let Some(candidate) = response.candidates.first() else {
        return Ok(GenerationResult::default());
    };

    let text = candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .as_ref()
        .map(extract_sources)
        .unwrap_or_default();

    Ok(GenerationResult { text, sources })
}

/// Builds the source list from grounding metadata: chunks in first-seen
/// URL order, blank-titled or blank-URL chunks dropped, snippets
/// space-joined from every support referencing the chunk's index.
/// Supports reached through a later duplicate-URL chunk still
/// accumulate onto the first entry for that URL.
fn extract_sources(metadata: &GroundingMetadata) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();

    for (index, chunk) in metadata.grounding_chunks.iter().enumerate() {
        let Some(web) = chunk.web.as_ref() else {
            continue;
        };
        let (Some(url), Some(title)) = (non_blank(web.uri.as_deref()), non_blank(web.title.as_deref()))
        else {
            continue;
        };

        let position = match sources.iter().position(|source| source.url == url) {
            Some(existing) => existing,
            None => {
                sources.push(Source {
                    title: title.to_string(),
                    url: url.to_string(),
                    snippet: String::new(),
                });
                sources.len() - 1
            }
        };
        let entry = &mut sources[position];

        for support in &metadata.grounding_supports {
            if !support.grounding_chunk_indices.contains(&index) {
                continue;
            }
            let Some(text) = support
                .segment
                .as_ref()
                .and_then(|segment| non_blank(segment.text.as_deref()))
            else {
                continue;
            };
            if !entry.snippet.is_empty() {
                entry.snippet.push(' ');
            }
            entry.snippet.push_str(text);
        }
    }

    sources
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

static RETRY_IN_SECONDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)retry in\s+(\d+(?:\.\d+)?)s").expect("valid retry-in pattern"));

static RETRY_DELAY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)retryDelay"\s*:\s*"(\d+)s""#).expect("valid retryDelay pattern"));

/// Best-effort sniffing of a retry hint from a free-form 429 body.
/// Upstream error formats are not stable; the two observed patterns are
/// checked in priority order and anything else means no hint.
pub(super) fn extract_retry_after_seconds(body: &str) -> Option<u64> {
    if body.trim().is_empty() {
        return None;
    }

    // "Please retry in 16.028201274s." — round up to whole seconds.
    if let Some(captures) = RETRY_IN_SECONDS.captures(body)
        && let Ok(seconds) = captures[1].parse::<f64>()
    {
        return Some(seconds.ceil() as u64);
    }

    // Embedded detail like "\"retryDelay\":\"16s\"".
    if let Some(captures) = RETRY_DELAY_FIELD.captures(body)
        && let Ok(seconds) = captures[1].parse::<u64>()
    {
        return Some(seconds);
    }

    None
}
