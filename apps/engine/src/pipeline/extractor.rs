//! Structured-Field Extractor — turns raw résumé or JD text into skill and
//! project/responsibility lists.
//!
//! Primary path is one generative call per document; when that yields nothing
//! usable for a field, a deterministic section scan takes over: find the
//! labeled heading, capture up to the next ALL-CAPS heading or end of text,
//! split on separators. A field with no data from either path stays empty —
//! extraction failure is never fatal.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextCompletionService;
use crate::parser::{request_json, string_list};
use crate::pipeline::prompts::{JD_EXTRACT_PROMPT_TEMPLATE, RESUME_EXTRACT_PROMPT_TEMPLATE};

/// Structured fields pulled from one document.
///
/// `items` holds key projects for a résumé and responsibilities for a job
/// description. Both fields default to empty — never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub skills: Vec<String>,
    pub items: Vec<String>,
}

/// Extracts skills and key projects from résumé text.
///
/// `text` feeds the generative prompt and may be whitespace-normalized;
/// `raw_text` must keep the document's line structure — the section fallback
/// needs real newlines to find where one heading ends and the next begins.
pub async fn extract_resume_fields(
    service: &dyn TextCompletionService,
    text: &str,
    raw_text: &str,
) -> ExtractedFields {
    let prompt = RESUME_EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", text);
    let parsed = request_json(service, &prompt, JSON_ONLY_SYSTEM).await;

    let mut skills = string_list(&parsed, "skills");
    let mut items = string_list(&parsed, "projects");

    if skills.is_empty() {
        warn!("generative resume skill extraction yielded nothing, using section fallback");
        skills = section_fragments(raw_text, skills_section_re(), SplitOn::CommaAndLines);
    }
    if items.is_empty() {
        items = section_fragments(raw_text, projects_section_re(), SplitOn::LinesOnly);
    }

    ExtractedFields { skills, items }
}

/// Extracts skills and key responsibilities from job-description text.
///
/// Same contract as [`extract_resume_fields`]: `text` for the prompt,
/// `raw_text` (line structure intact) for the section fallback.
pub async fn extract_jd_fields(
    service: &dyn TextCompletionService,
    text: &str,
    raw_text: &str,
) -> ExtractedFields {
    let prompt = JD_EXTRACT_PROMPT_TEMPLATE.replace("{jd_text}", text);
    let parsed = request_json(service, &prompt, JSON_ONLY_SYSTEM).await;

    let mut skills = string_list(&parsed, "skills");
    let mut items = string_list(&parsed, "responsibilities");

    if skills.is_empty() {
        warn!("generative JD skill extraction yielded nothing, using section fallback");
        skills = section_fragments(raw_text, skills_section_re(), SplitOn::CommaAndLines);
    }
    if items.is_empty() {
        items = section_fragments(raw_text, responsibilities_section_re(), SplitOn::LinesOnly);
    }

    ExtractedFields { skills, items }
}

// ────────────────────────────────────────────────────────────────────────────
// Deterministic section fallback
// ────────────────────────────────────────────────────────────────────────────

/// Skill lines are comma-separated inventories; project and responsibility
/// bodies are free sentences where commas are punctuation, not separators.
#[derive(Clone, Copy)]
enum SplitOn {
    CommaAndLines,
    LinesOnly,
}

// Section regexes: case-insensitive label, then capture up to the next
// ALL-CAPS heading (case-sensitive by intent) or end of text.

fn skills_section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(?i:skills)\s*[:\-]?\s*(.*?)(?:\n[A-Z][A-Z ]{2,}|\z)")
            .expect("valid skills section regex")
    })
}

fn projects_section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(?i:projects)\s*[:\-]?\s*(.*?)(?:\n[A-Z][A-Z ]{2,}|\z)")
            .expect("valid projects section regex")
    })
}

fn responsibilities_section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(?i:responsibilities|requirements)\s*[:\-]?\s*(.*?)(?:\n[A-Z][A-Z ]{2,}|\z)")
            .expect("valid responsibilities section regex")
    })
}

/// Locates a labeled section and splits its body into trimmed, non-empty
/// fragments. Returns empty when the heading is absent — the caller treats
/// that the same as any other degraded extraction.
fn section_fragments(text: &str, section: &Regex, split: SplitOn) -> Vec<String> {
    let Some(captures) = section.captures(text) else {
        return Vec::new();
    };
    let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let separators: &[char] = match split {
        SplitOn::CommaAndLines => &[',', '\n', '•', '·'],
        SplitOn::LinesOnly => &['\n', '•', '·'],
    };

    body.split(separators)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}
