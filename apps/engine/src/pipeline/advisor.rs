//! Advisory Stage — realistic role suggestions, career tips, and skill
//! verdicts from one generative call over the raw, unextracted texts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::TextCompletionService;
use crate::parser::{request_json, string_list};
use crate::pipeline::prompts::{ADVISE_PROMPT_TEMPLATE, ADVISE_SYSTEM};

/// One suggested role with its justification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedRole {
    pub title: String,
    pub reason: String,
}

/// Advisory annotations for one résumé/JD pair. All sections default to
/// empty; an empty section means the call degraded, not that it was skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub suggested_roles: Vec<SuggestedRole>,
    pub advisor_suggestions: Vec<String>,
    pub career_tips: Vec<String>,
    pub verified_skill_verdicts: Vec<String>,
}

/// Runs the advisory call. Never fails — any degraded path yields an
/// `AdvisoryResult` with empty sections.
pub async fn advise(
    service: &dyn TextCompletionService,
    resume_text: &str,
    jd_text: &str,
) -> AdvisoryResult {
    let prompt = ADVISE_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", jd_text);
    let parsed = request_json(service, &prompt, ADVISE_SYSTEM).await;

    AdvisoryResult {
        suggested_roles: role_list(&parsed, "realistic_roles"),
        advisor_suggestions: string_list(&parsed, "advisor_suggestions"),
        career_tips: string_list(&parsed, "career_improvement_tips"),
        verified_skill_verdicts: string_list(&parsed, "verified_skill_verdicts"),
    }
}

/// Reads `value[key]` as a role list, tolerating both `{"title", "reason"}`
/// objects and bare title strings — models emit either shape. Anything else
/// is dropped; a missing or mistyped field yields an empty list.
pub fn role_list(value: &Value, key: &str) -> Vec<SuggestedRole> {
    let Some(Value::Array(items)) = value.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(title) => {
                let title = title.trim();
                (!title.is_empty()).then(|| SuggestedRole {
                    title: title.to_string(),
                    reason: String::new(),
                })
            }
            Value::Object(_) => {
                let title = item.get("title").and_then(Value::as_str)?.trim().to_string();
                let reason = item
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                (!title.is_empty()).then_some(SuggestedRole { title, reason })
            }
            _ => None,
        })
        .collect()
}
